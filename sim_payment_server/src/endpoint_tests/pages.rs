//! Endpoint tests for the informational routes: landing pages and the health check.
use actix_web::{http::StatusCode, test, web, App};

use super::helpers::test_credentials;
use crate::routes::{health, payment_fail, payment_success};

async fn get_page(path_and_query: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_credentials()))
            .service(health)
            .route("/payment/success", web::get().to(payment_success))
            .route("/payment/fail", web::get().to(payment_fail)),
    )
    .await;
    let req = test::TestRequest::get().uri(path_and_query).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    (status, body)
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = get_page("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn verified_success_redirect_shows_the_confirmation() {
    // md5("1500.00:123456789:w1_secret") — the success redirect is checked against password #1
    let (status, body) = get_page(
        "/payment/success?OutSum=1500.00&InvId=123456789&SignatureValue=bfb4f1eb631a98832c7bce307f50dc60",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment successful"));
    assert!(body.contains("Order #123456789"));
}

#[actix_web::test]
async fn unverified_success_redirect_still_renders() {
    let (status, body) = get_page("/payment/success?InvId=123456789").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("being processed"));
    assert!(body.contains("Order #123456789"));
}

#[actix_web::test]
async fn a_result_signature_does_not_verify_the_success_redirect() {
    // md5("1500.00:123456789:w2_secret") — valid for the result callback, wrong secret for the redirect
    let (status, body) = get_page(
        "/payment/success?OutSum=1500.00&InvId=123456789&SignatureValue=7a3f20633cc22eee1512ec51c30ff1cb",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("being processed"));
}

#[actix_web::test]
async fn pages_render_for_unknown_or_missing_orders() {
    let (status, body) = get_page("/payment/success").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order #N/A"));

    let (status, body) = get_page("/payment/fail").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Order #N/A"));
}

#[actix_web::test]
async fn fail_page_is_informational() {
    let (status, body) = get_page("/payment/fail?InvId=42").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment cancelled"));
    assert!(body.contains("Order #42"));
}
