//! Endpoint tests for the provider result callback.
//!
//! Signatures below are fixed MD5 vectors for merchant "simshop" with passwords "w1_secret"/"w2_secret".
use actix_web::http::StatusCode;
use sim_payment_engine::db_types::OrderStatus;

use super::{
    helpers::{get_callback, order_fixture, post_callback},
    mocks::MockOrderDb,
};

// md5("1500.00:123456789:w2_secret")
const SIG_1500: &str = "7a3f20633cc22eee1512ec51c30ff1cb";

#[actix_web::test]
async fn valid_callback_marks_order_paid_and_acks() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Pending))));
    db.expect_confirm_order().times(1).returning(|_| Ok(true));
    let (status, body) =
        get_callback(db, &format!("OutSum=1500.00&InvId=123456789&SignatureValue={SIG_1500}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK123456789");
}

#[actix_web::test]
async fn callback_signature_compare_is_case_insensitive() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Pending))));
    db.expect_confirm_order().returning(|_| Ok(true));
    let sig = SIG_1500.to_uppercase();
    let (status, body) = get_callback(db, &format!("OutSum=1500.00&InvId=123456789&SignatureValue={sig}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK123456789");
}

#[actix_web::test]
async fn post_body_with_passthrough_parameters_is_accepted() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Pending))));
    db.expect_confirm_order().times(1).returning(|_| Ok(true));
    // md5("1500.00:123456789:w2_secret:Shp_tariff=42:Shp_user=777"); the form deliberately lists the
    // passthrough pairs out of order — canonicalization must sort them
    let form = "Shp_user=777&OutSum=1500.00&InvId=123456789&Shp_tariff=42\
                &SignatureValue=b3f54834818d4fe873c9fbe7311840fe";
    let (status, body) = post_callback(db, form).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK123456789");
}

#[actix_web::test]
async fn bad_signature_is_rejected_and_order_untouched() {
    let _ = env_logger::try_init();
    // No expectations: any store access would fail this test
    let db = MockOrderDb::new();
    let (status, body) =
        get_callback(db, "OutSum=1500.00&InvId=123456789&SignatureValue=00000000000000000000000000000000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "bad sign");
}

#[actix_web::test]
async fn passthrough_is_part_of_the_signed_payload() {
    let _ = env_logger::try_init();
    // A signature valid for the bare parameters must not verify once an extra Shp_ pair is smuggled in
    let db = MockOrderDb::new();
    let (status, body) =
        get_callback(db, &format!("OutSum=1500.00&InvId=123456789&SignatureValue={SIG_1500}&Shp_user=777")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "bad sign");

    // ...and the same pair signed properly does verify: md5("1500.00:123456789:w2_secret:Shp_user=777")
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Pending))));
    db.expect_confirm_order().returning(|_| Ok(true));
    let (status, body) = get_callback(
        db,
        "OutSum=1500.00&InvId=123456789&SignatureValue=531fcd48fccce0a3ea9004d5faed070d&Shp_user=777",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK123456789");
}

#[actix_web::test]
async fn unknown_order_is_a_client_error() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id().returning(|_| Ok(None));
    let (status, body) = get_callback(db, &format!("OutSum=1500.00&InvId=123456789&SignatureValue={SIG_1500}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "bad order");
}

#[actix_web::test]
async fn tampered_amount_fails_the_stored_price_cross_check() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    // The signature over the tampered amount is genuine (md5("999.00:123456789:w2_secret")), so only the
    // cross-check against the stored price can catch it. confirm_order has no expectation — it must not run.
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Pending))));
    let (status, body) = get_callback(
        db,
        "OutSum=999.00&InvId=123456789&SignatureValue=ff86dc82b807d5341c74488d665442f9",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "bad amount");
}

#[actix_web::test]
async fn redelivered_callback_acks_without_a_second_transition() {
    let _ = env_logger::try_init();
    let mut db = MockOrderDb::new();
    db.expect_fetch_order_by_order_id()
        .returning(|id| Ok(Some(order_fixture(id.value(), 1500, OrderStatus::Paid))));
    // The guarded update affects zero rows on a paid order
    db.expect_confirm_order().times(1).returning(|_| Ok(false));
    let (status, body) = get_callback(db, &format!("OutSum=1500.00&InvId=123456789&SignatureValue={SIG_1500}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK123456789");
}
