//! Callback-driven payment flow, order creation and the paid-event fan-out, exercised against a real SQLite store.
mod support;

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use sim_payment_engine::{
    db_types::{FulfilmentMode, NewOrder, OrderId, OrderStatus, TariffSnapshot},
    events::{EventHandlers, EventHooks, EventProducers},
    traits::{OrderDatabase, StoreError},
    OrderFlowApi,
    PaymentGatewayError,
};
use spg_common::Rubles;
use support::prepare_test_db;

const OPERATORS: [i64; 1] = [777];

fn smart_tariff() -> TariffSnapshot {
    TariffSnapshot {
        tariff_id: 10,
        tariff_name: "Smart".to_string(),
        operator_id: 1,
        operator_name: "MTS".to_string(),
        monthly_fee: Some(Rubles::from_rubles(450)),
        connection_price: Rubles::from_rubles(1500),
    }
}

fn valid_order(buyer_id: i64) -> NewOrder {
    let mut order = NewOrder::new(buyer_id, smart_tariff(), FulfilmentMode::New);
    order.username = Some("ivan".to_string());
    order.full_name = "Ivanov Ivan Ivanovich".to_string();
    order.region_city = "Moscow".to_string();
    order.passport_photo_1 = "file_abc1".to_string();
    order.passport_photo_2 = "file_abc2".to_string();
    order
}

#[tokio::test]
async fn duplicate_order_id_is_a_constraint_level_conflict() {
    let db = prepare_test_db().await;
    let id = OrderId(123456789);
    db.insert_order(id, valid_order(1)).await.expect("first insert failed");
    let err = db.insert_order(id, valid_order(2)).await.expect_err("expected a conflict");
    assert!(matches!(err, StoreError::DuplicateOrder(dup) if dup == id));
}

#[tokio::test]
async fn create_order_assigns_id_and_pending_status() {
    let db = prepare_test_db().await;
    let api = OrderFlowApi::new(db, EventProducers::default(), &OPERATORS);
    let order = api.create_order(valid_order(42)).await.expect("create failed");
    assert_eq!(order.status, OrderStatus::Pending);
    assert!((0..1_000_000_000).contains(&order.order_id.value()));
    assert_eq!(order.connection_price, Rubles::from_rubles(1500));
    assert!(order.payment_confirmed_at.is_none());
    assert!(order.payment_receipt.is_none());
}

#[tokio::test]
async fn create_order_validates_required_fields() {
    let db = prepare_test_db().await;
    let api = OrderFlowApi::new(db, EventProducers::default(), &OPERATORS);

    let mut zero_price = valid_order(1);
    zero_price.connection_price = Rubles::from_rubles(0);
    assert!(matches!(
        api.create_order(zero_price).await,
        Err(PaymentGatewayError::ValidationError(_))
    ));

    let mut transfer_without_phone = valid_order(1);
    transfer_without_phone.mode = FulfilmentMode::Transfer;
    assert!(matches!(
        api.create_order(transfer_without_phone).await,
        Err(PaymentGatewayError::ValidationError(_))
    ));

    let mut no_passport = valid_order(1);
    no_passport.passport_photo_2 = String::new();
    assert!(matches!(api.create_order(no_passport).await, Err(PaymentGatewayError::ValidationError(_))));
}

#[tokio::test]
async fn verified_callback_pays_a_pending_order_exactly_once() {
    let db = prepare_test_db().await;
    let id = OrderId(123456789);
    db.insert_order(id, valid_order(7)).await.expect("insert failed");
    let api = OrderFlowApi::new(db, EventProducers::default(), &OPERATORS);

    let paid = api.order_paid_from_callback(id, Rubles::from_rubles(1500)).await.expect("callback flow failed");
    assert_eq!(paid.status, OrderStatus::Paid);
    let confirmed_at = paid.payment_confirmed_at.expect("confirmation timestamp missing");

    // At-least-once delivery: the second identical callback is a no-op that must not restamp the timestamp
    let err = api.order_paid_from_callback(id, Rubles::from_rubles(1500)).await.expect_err("expected no-op");
    assert!(matches!(err, PaymentGatewayError::OrderAlreadyPaid(dup) if dup == id));
    let after = api.order_by_id(id).await.unwrap().unwrap();
    assert_eq!(after.status, OrderStatus::Paid);
    assert_eq!(after.payment_confirmed_at, Some(confirmed_at));
}

#[tokio::test]
async fn tampered_amount_is_rejected_against_stored_price() {
    let db = prepare_test_db().await;
    let id = OrderId(555000111);
    db.insert_order(id, valid_order(7)).await.expect("insert failed");
    let api = OrderFlowApi::new(db, EventProducers::default(), &OPERATORS);

    let err = api.order_paid_from_callback(id, Rubles::from_rubles(1)).await.expect_err("expected mismatch");
    assert!(matches!(err, PaymentGatewayError::AmountMismatch { .. }));
    let order = api.order_by_id(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn callback_for_unknown_order_is_not_found() {
    let db = prepare_test_db().await;
    let api = OrderFlowApi::new(db, EventProducers::default(), &OPERATORS);
    let err = api.order_paid_from_callback(OrderId(1), Rubles::from_rubles(1500)).await.expect_err("expected 404");
    assert!(matches!(err, PaymentGatewayError::OrderNotFound(_)));
}

#[tokio::test]
async fn paid_hook_fires_exactly_once_for_duplicate_callbacks() {
    let db = prepare_test_db().await;
    let id = OrderId(900800700);
    db.insert_order(id, valid_order(3)).await.expect("insert failed");

    let counter = Arc::new(AtomicU32::new(0));
    let c = counter.clone();
    let mut hooks = EventHooks::default();
    hooks.on_order_paid(move |_ev| {
        let c = c.clone();
        Box::pin(async move {
            c.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(10, hooks);
    let api = OrderFlowApi::new(db, handlers.producers(), &OPERATORS);

    api.order_paid_from_callback(id, Rubles::from_rubles(1500)).await.expect("callback flow failed");
    let _ = api.order_paid_from_callback(id, Rubles::from_rubles(1500)).await;

    // Dropping the api releases the producers; the handler loop then drains and terminates
    drop(api);
    handlers.on_order_paid.expect("handler missing").start_handler().await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}
