//! # Payment page signature format
//!
//! The hosted payment page and its callbacks are authenticated with a shared-secret digest scheme. The merchant is
//! provisioned with two independent passwords: password #1 signs the outbound pay link (and the browser's success
//! redirect), password #2 signs the server-to-server result callback. The provider computes the inverse check, so
//! the canonical strings below must be reproduced byte for byte.
//!
//! ## Canonical strings
//!
//! Outbound (pay link):
//!
//! ```text
//!     MerchantLogin:OutSum:InvId:Password1[:Shp_key=value]*
//! ```
//!
//! Inbound result callback (checked with password #2) and success redirect (checked with password #1):
//!
//! ```text
//!     OutSum:InvId:Password[:Shp_key=value]*
//! ```
//!
//! where
//!   * `OutSum` is the amount with exactly two decimal digits ("1500.00"). Inbound checks use the amount string
//!     exactly as received — re-formatting it would change the digest.
//!   * `InvId` is the order id as a decimal string.
//!   * passthrough (`Shp_*`/`shp_*`) pairs are sorted bytewise by their full key and appended as `key=value`,
//!     joined by `:`. The provider echoes them back verbatim on the callback.
//!
//! The digest is MD5, rendered as hex. Inbound signatures are compared case-insensitively. The verify functions are
//! pure and answer only "valid or not" — they never reveal which part of the check failed.

use md5::{Digest, Md5};
use spg_common::{Rubles, Secret};
use url::Url;

use crate::db_types::OrderId;

pub const DEFAULT_PAYMENT_PAGE_URL: &str = "https://auth.robokassa.ru/Merchant/Index.aspx";

/// The merchant-side provisioning for the hosted payment page.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub merchant_login: String,
    /// Password #1: signs outbound pay links; checks the browser success redirect.
    pub password1: Secret<String>,
    /// Password #2: checks the server-to-server result callback.
    pub password2: Secret<String>,
    /// When set, generated links carry `IsTest=1` and the provider runs the payment against its sandbox.
    pub test_mode: bool,
    pub payment_page_url: Url,
}

impl ProviderCredentials {
    pub fn new(merchant_login: &str, password1: Secret<String>, password2: Secret<String>) -> Self {
        let payment_page_url = Url::parse(DEFAULT_PAYMENT_PAGE_URL).expect("default payment page URL is valid");
        Self { merchant_login: merchant_login.to_string(), password1, password2, test_mode: false, payment_page_url }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_payment_page_url(mut self, url: Url) -> Self {
        self.payment_page_url = url;
        self
    }
}

/// Builds the hosted-payment-page URL for an order.
///
/// The query string carries `MerchantLogin`, `OutSum`, `InvId`, `Description`, `SignatureValue`, every passthrough
/// pair verbatim, and `IsTest=1` in test mode.
pub fn payment_link(
    credentials: &ProviderCredentials,
    order_id: OrderId,
    amount: Rubles,
    description: &str,
    passthrough: &[(String, String)],
) -> Url {
    let out_sum = amount.to_out_sum();
    let mut canonical = format!(
        "{}:{}:{}:{}",
        credentials.merchant_login,
        out_sum,
        order_id.value(),
        credentials.password1.reveal()
    );
    if let Some(suffix) = passthrough_suffix(passthrough) {
        canonical.push(':');
        canonical.push_str(&suffix);
    }
    let signature = md5_hex(&canonical);

    let mut url = credentials.payment_page_url.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("MerchantLogin", &credentials.merchant_login);
        query.append_pair("OutSum", &out_sum);
        query.append_pair("InvId", &order_id.value().to_string());
        query.append_pair("Description", description);
        query.append_pair("SignatureValue", &signature);
        for (key, value) in passthrough {
            query.append_pair(key, value);
        }
        if credentials.test_mode {
            query.append_pair("IsTest", "1");
        }
    }
    url
}

/// Checks the signature of a server-to-server result callback against password #2.
///
/// `out_sum` and `inv_id` must be the strings exactly as received from the wire.
pub fn verify_result_signature(
    credentials: &ProviderCredentials,
    out_sum: &str,
    inv_id: &str,
    signature: &str,
    passthrough: &[(String, String)],
) -> bool {
    verify_with_secret(credentials.password2.reveal(), out_sum, inv_id, signature, passthrough)
}

/// Checks the signature of a browser success redirect against password #1.
///
/// The redirect is advisory only. A valid success signature must never mark an order paid on its own — only the
/// result callback (password #2) or an authorized operator does that.
pub fn verify_success_signature(
    credentials: &ProviderCredentials,
    out_sum: &str,
    inv_id: &str,
    signature: &str,
    passthrough: &[(String, String)],
) -> bool {
    verify_with_secret(credentials.password1.reveal(), out_sum, inv_id, signature, passthrough)
}

fn verify_with_secret(
    secret: &str,
    out_sum: &str,
    inv_id: &str,
    signature: &str,
    passthrough: &[(String, String)],
) -> bool {
    let mut canonical = format!("{out_sum}:{inv_id}:{secret}");
    if let Some(suffix) = passthrough_suffix(passthrough) {
        canonical.push(':');
        canonical.push_str(&suffix);
    }
    md5_hex(&canonical).eq_ignore_ascii_case(signature)
}

/// Sorts passthrough pairs bytewise by their full key (so `Shp_` keys come before `shp_` ones) and joins them as
/// `key=value` with `:`.
fn passthrough_suffix(passthrough: &[(String, String)]) -> Option<String> {
    if passthrough.is_empty() {
        return None;
    }
    let mut pairs = passthrough.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Some(pairs.into_iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(":"))
}

fn md5_hex(message: &str) -> String {
    hex::encode(Md5::digest(message.as_bytes()))
}
