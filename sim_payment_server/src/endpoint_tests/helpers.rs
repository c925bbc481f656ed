use actix_web::{http::StatusCode, test, web, App};
use chrono::{TimeZone, Utc};
use sim_payment_engine::{
    db_types::{FulfilmentMode, Order, OrderId, OrderStatus},
    events::EventProducers,
    helpers::ProviderCredentials,
    OrderFlowApi,
};
use spg_common::{Rubles, Secret};

use super::mocks::MockOrderDb;
use crate::routes::payment_result;

pub fn test_credentials() -> ProviderCredentials {
    ProviderCredentials::new("simshop", Secret::new("w1_secret".into()), Secret::new("w2_secret".into()))
}

pub fn order_fixture(order_id: i64, price_rubles: i64, status: OrderStatus) -> Order {
    Order {
        id: 1,
        order_id: OrderId(order_id),
        buyer_id: 42,
        username: Some("ivan".to_string()),
        tariff_id: 10,
        tariff_name: "Smart".to_string(),
        operator_id: 1,
        operator_name: "MTS".to_string(),
        monthly_fee: Some(Rubles::from_rubles(450)),
        connection_price: Rubles::from_rubles(price_rubles),
        mode: FulfilmentMode::New,
        transfer_phone: None,
        full_name: "Ivanov Ivan".to_string(),
        region_city: "Moscow".to_string(),
        passport_photo_1: "file_1".to_string(),
        passport_photo_2: "file_2".to_string(),
        payment_receipt: None,
        payment_method_name: None,
        payment_confirmed_at: match status {
            OrderStatus::Paid => Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            _ => None,
        },
        status,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
    }
}

/// Sends a GET callback with the given query string and returns (status, body).
pub async fn get_callback(db: MockOrderDb, query: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OrderFlowApi::new(db, EventProducers::default(), &[])))
            .app_data(web::Data::new(test_credentials()))
            .route("/payment/result", web::route().to(payment_result::<MockOrderDb>)),
    )
    .await;
    let req = test::TestRequest::get().uri(&format!("/payment/result?{query}")).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    (status, body)
}

/// Sends a POST callback with an urlencoded form body and returns (status, body).
pub async fn post_callback(db: MockOrderDb, form: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(OrderFlowApi::new(db, EventProducers::default(), &[])))
            .app_data(web::Data::new(test_credentials()))
            .route("/payment/result", web::route().to(payment_result::<MockOrderDb>)),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/payment/result")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload(form.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body = String::from_utf8_lossy(&test::read_body(resp).await).to_string();
    (status, body)
}
