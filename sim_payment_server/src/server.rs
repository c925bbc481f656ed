use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::{info, warn};
use sim_payment_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    notifier::Notifier,
    routes::{health, payment_fail, payment_result, payment_success},
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig, notifier: Arc<dyn Notifier>) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;

    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, notification_hooks(notifier));
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let credentials = config.robokassa.credentials();
    let operator_ids = config.operator_ids.clone();
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone(), &operator_ids);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("spg::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(credentials.clone()))
            .service(health)
            .service(
                web::scope("/payment")
                    // The provider may call the result URL with GET or POST; accept any method
                    .route("/result", web::route().to(payment_result::<SqliteDatabase>))
                    .route("/success", web::get().to(payment_success))
                    .route("/fail", web::get().to(payment_fail)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Wires the injected notifier capability into the engine's event hooks.
///
/// Each notification gets a single attempt; failures are logged and swallowed. By the time these run, the state
/// transition has already been committed, so a dead messenger can neither fail the HTTP response nor the order.
pub fn notification_hooks(notifier: Arc<dyn Notifier>) -> EventHooks {
    let mut hooks = EventHooks::default();
    let on_paid = Arc::clone(&notifier);
    hooks.on_order_paid(move |event| {
        let notifier = Arc::clone(&on_paid);
        Box::pin(async move {
            let order = event.order;
            info!("📨️ Payment received for order {}. Notifying the buyer and the operator set.", order.order_id);
            if let Err(e) = notifier.notify_buyer(&order).await {
                warn!("📨️ Could not notify buyer {} about order {}: {e}", order.buyer_id, order.order_id);
            }
            if let Err(e) = notifier.notify_operators(&order).await {
                warn!("📨️ Could not notify the operator set about order {}: {e}", order.order_id);
            }
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let on_receipt = notifier;
    hooks.on_receipt_submitted(move |event| {
        let notifier = Arc::clone(&on_receipt);
        Box::pin(async move {
            let order = event.order;
            info!("📨️ Receipt submitted for order {}. Prompting the operator set to review.", order.order_id);
            if let Err(e) = notifier.notify_operators(&order).await {
                warn!("📨️ Could not notify the operator set about order {}: {e}", order.order_id);
            }
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}
