use std::env;

use log::*;
use sim_payment_engine::helpers::ProviderCredentials;
use spg_common::{
    helpers::{parse_boolean_flag, parse_id_list},
    Secret,
};
use url::Url;

const DEFAULT_SPG_HOST: &str = "127.0.0.1";
const DEFAULT_SPG_PORT: u16 = 8460;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Buyer ids of the operators who may confirm or reject manual payments and who receive payment notifications.
    pub operator_ids: Vec<i64>,
    pub robokassa: RobokassaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SPG_HOST.to_string(),
            port: DEFAULT_SPG_PORT,
            database_url: String::default(),
            operator_ids: Vec::default(),
            robokassa: RobokassaConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SPG_HOST").ok().unwrap_or_else(|| DEFAULT_SPG_HOST.into());
        let port = env::var("SPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for SPG_PORT. {e} Using the default, {DEFAULT_SPG_PORT}, instead."
                    );
                    DEFAULT_SPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SPG_PORT);
        let database_url = env::var("SPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ SPG_DATABASE_URL is not set. Please set it to the URL for the orders database.");
            String::default()
        });
        let operator_ids = env::var("SPG_OPERATOR_IDS").map(|s| parse_id_list(&s)).unwrap_or_default();
        if operator_ids.is_empty() {
            warn!(
                "🚨️ SPG_OPERATOR_IDS is not set or empty. The server will run, but no one will be able to confirm \
                 manual payments, and payment notifications have no recipients."
            );
        }
        let robokassa = RobokassaConfig::from_env_or_default();
        Self { host, port, database_url, operator_ids, robokassa }
    }
}

//-----------------------------------------  RobokassaConfig  ---------------------------------------------------------
/// The merchant provisioning for the hosted payment page. Password #1 signs outbound links and checks the browser
/// success redirect; password #2 checks the server-to-server result callback. They are provisioned separately and
/// must never be swapped.
#[derive(Clone, Debug, Default)]
pub struct RobokassaConfig {
    pub merchant_login: String,
    pub password1: Secret<String>,
    pub password2: Secret<String>,
    pub test_mode: bool,
    /// Overrides the hosted payment page URL. Useful for pointing the link generator at a sandbox.
    pub base_url: Option<Url>,
}

impl RobokassaConfig {
    pub fn from_env_or_default() -> Self {
        let merchant_login = env::var("SPG_RK_MERCHANT_LOGIN").ok().unwrap_or_else(|| {
            error!("🪛️ SPG_RK_MERCHANT_LOGIN is not set. Please set it to your merchant identifier.");
            String::default()
        });
        let password1 = Secret::new(env::var("SPG_RK_PASSWORD1").ok().unwrap_or_else(|| {
            error!("🪛️ SPG_RK_PASSWORD1 is not set. Generated pay links will not verify.");
            String::default()
        }));
        let password2 = Secret::new(env::var("SPG_RK_PASSWORD2").ok().unwrap_or_else(|| {
            error!("🪛️ SPG_RK_PASSWORD2 is not set. Incoming payment callbacks will all be rejected.");
            String::default()
        }));
        let test_mode = parse_boolean_flag(env::var("SPG_RK_TEST_MODE").ok(), true);
        if test_mode {
            info!("🪛️ The payment provider runs in test mode. Set SPG_RK_TEST_MODE=0 to accept real payments.");
        }
        let base_url = env::var("SPG_RK_BASE_URL").ok().and_then(|s| {
            s.parse::<Url>()
                .map_err(|e| warn!("🪛️ Ignoring invalid SPG_RK_BASE_URL ({s}): {e}"))
                .ok()
        });
        Self { merchant_login, password1, password2, test_mode, base_url }
    }

    pub fn credentials(&self) -> ProviderCredentials {
        let mut credentials =
            ProviderCredentials::new(&self.merchant_login, self.password1.clone(), self.password2.clone())
                .with_test_mode(self.test_mode);
        if let Some(url) = &self.base_url {
            credentials = credentials.with_payment_page_url(url.clone());
        }
        credentials
    }
}
