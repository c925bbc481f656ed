//! The outbound notification capability.
//!
//! The callback endpoint never talks to a messenger directly, and there is no process-global "current bot"
//! anywhere: whoever boots the server hands it a [`Notifier`] and the event hooks call it. Notifications are
//! best-effort with a single attempt per recipient — the order's state transition is the source of truth and has
//! already been committed by the time a notifier runs.
use futures::future::BoxFuture;
use log::info;
use sim_payment_engine::db_types::Order;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Could not deliver notification: {0}")]
pub struct NotificationError(pub String);

/// Delivers human-readable payment updates. Message formatting and transport are the implementor's business.
pub trait Notifier: Send + Sync {
    /// Tell the buyer their payment settled.
    fn notify_buyer(&self, order: &Order) -> BoxFuture<'_, Result<(), NotificationError>>;

    /// Tell the operator set about an order that needs attention (a settled payment or a receipt to review).
    fn notify_operators(&self, order: &Order) -> BoxFuture<'_, Result<(), NotificationError>>;
}

/// A notifier that only writes to the log. Stands in wherever no messenger is wired up (local runs, tests).
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_buyer(&self, order: &Order) -> BoxFuture<'_, Result<(), NotificationError>> {
        let line = format!(
            "Order {} for buyer {} is now {} ({})",
            order.order_id, order.buyer_id, order.status, order.connection_price
        );
        Box::pin(async move {
            info!("📨️ [buyer] {line}");
            Ok(())
        })
    }

    fn notify_operators(&self, order: &Order) -> BoxFuture<'_, Result<(), NotificationError>> {
        let line = format!(
            "Order {} ({} / {}) from {} is now {}",
            order.order_id, order.operator_name, order.tariff_name, order.full_name, order.status
        );
        Box::pin(async move {
            info!("📨️ [operators] {line}");
            Ok(())
        })
    }
}
