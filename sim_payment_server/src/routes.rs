//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate
//! module. Keep this module neat and tidy 🙏
//!
//! The callback handler is generic over the storage backend so the endpoint tests can run it against a mock
//! database; the landing pages touch no state at all.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use sim_payment_engine::{
    db_types::OrderId,
    helpers::{verify_result_signature, verify_success_signature, ProviderCredentials},
    traits::OrderDatabase,
    OrderFlowApi,
    PaymentGatewayError,
};
use spg_common::Rubles;

use crate::{data_objects::CallbackParams, errors::ServerError};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//------------------------------------------   Result callback  ------------------------------------------------
/// The server-to-server payment notification (`Result URL`). The provider delivers it at least once, with no
/// ordering guarantee, over GET or POST.
///
/// The flow is exactly:
/// 1. Extract `OutSum`, `InvId`, `SignatureValue` and the passthrough parameters from the request.
/// 2. Verify the signature over the *received* strings with password #2 — reject with `bad sign` otherwise.
/// 3. Resolve the order; an unknown id is `bad order` (404), the provider will not usefully retry it.
/// 4. Cross-check the amount against the stored connection price — `bad amount` on a mismatch, even if the
///    signature over the tampered amount was valid.
/// 5. Apply the `paid` transition. A re-delivered callback for an already-paid order acknowledges without a
///    second transition or notification fan-out.
///
/// The provider polls for the exact `OK<InvId>` token; anything else makes it keep retrying.
pub async fn payment_result<B: OrderDatabase>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<OrderFlowApi<B>>,
    credentials: web::Data<ProviderCredentials>,
) -> Result<HttpResponse, ServerError> {
    let params = CallbackParams::from_request(&req, &body);
    info!("💻️ Payment result callback: InvId={}, OutSum={}", params.inv_id, params.out_sum);

    if !verify_result_signature(&credentials, &params.out_sum, &params.inv_id, &params.signature, &params.passthrough)
    {
        warn!("💻️ Invalid callback signature for order id '{}'", params.inv_id);
        return Err(ServerError::SignatureMismatch);
    }
    // From here on, the callback provably came from the provider. The amount is still cross-checked against the
    // stored order before it is trusted for anything beyond the signature itself.
    let order_id = params.inv_id.parse::<OrderId>().map_err(|_| {
        warn!("💻️ Callback carried a non-numeric order id '{}'", params.inv_id);
        ServerError::OrderNotFound
    })?;
    let amount = params
        .out_sum
        .parse::<Rubles>()
        .map_err(|e| ServerError::InvalidRequestBody(format!("unreadable OutSum: {e}")))?;

    match api.order_paid_from_callback(order_id, amount).await {
        Ok(order) => {
            info!("💻️ Order {} marked as paid", order.order_id);
            Ok(acknowledgement(order_id))
        },
        Err(PaymentGatewayError::OrderAlreadyPaid(_)) => {
            info!("💻️ Order {order_id} was already paid; acknowledging the re-delivery");
            Ok(acknowledgement(order_id))
        },
        Err(e) => {
            debug!("💻️ Could not process payment callback for {order_id}. {e}");
            Err(e.into())
        },
    }
}

/// The settlement token the provider polls for.
fn acknowledgement(order_id: OrderId) -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(format!("OK{}", order_id.value()))
}

//------------------------------------------   Browser redirects  ----------------------------------------------
/// The browser lands here after a completed payment (`Success URL`). Purely informational: it renders even for
/// unknown orders and never mutates state — only the result callback marks orders paid.
///
/// The redirect carries its own signature, checked against password #1. It only selects the page copy: a verified
/// redirect gets the full confirmation, anything else a neutral "payment is being processed".
pub async fn payment_success(req: HttpRequest, credentials: web::Data<ProviderCredentials>) -> HttpResponse {
    let params = CallbackParams::from_request(&req, &web::Bytes::new());
    let inv_id = if params.inv_id.is_empty() { "N/A".to_string() } else { params.inv_id.clone() };
    let verified =
        verify_success_signature(&credentials, &params.out_sum, &params.inv_id, &params.signature, &params.passthrough);
    debug!("💻️ Success redirect for order id '{inv_id}' (signature valid: {verified})");
    let body = if verified {
        render_page(
            "Payment successful",
            "✅",
            "#28a745",
            "Payment successful!",
            &format!("Order #{inv_id}"),
            "Thank you for your purchase! Return to the bot to follow your order.",
        )
    } else {
        render_page(
            "Payment received",
            "⏳",
            "#28a745",
            "Your payment is being processed",
            &format!("Order #{inv_id}"),
            "You will get a confirmation in the bot as soon as the payment settles.",
        )
    };
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

/// The browser lands here after an abandoned or declined payment (`Fail URL`). Informational only.
pub async fn payment_fail(req: HttpRequest) -> HttpResponse {
    let params = CallbackParams::from_request(&req, &web::Bytes::new());
    let inv_id = if params.inv_id.is_empty() { "N/A".to_string() } else { params.inv_id };
    debug!("💻️ Fail redirect for order id '{inv_id}'");
    let body = render_page(
        "Payment cancelled",
        "❌",
        "#dc3545",
        "Payment cancelled",
        &format!("Order #{inv_id}"),
        "No money was taken. You can retry the payment from the bot at any time.",
    );
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

fn render_page(title: &str, icon: &str, icon_color: &str, heading: &str, order_line: &str, hint: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; text-align: center; padding: 50px; }}
        .icon {{ color: {icon_color}; font-size: 48px; }}
        h1 {{ color: #333; }}
        p {{ color: #666; }}
    </style>
</head>
<body>
    <div class="icon">{icon}</div>
    <h1>{heading}</h1>
    <p>{order_line}</p>
    <p>{hint}</p>
</body>
</html>
"#
    )
}
