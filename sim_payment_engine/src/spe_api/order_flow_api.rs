use std::{collections::HashSet, fmt::Debug};

use log::*;
use spg_common::Rubles;

use crate::{
    db_types::{FulfilmentMode, NewOrder, Order, OrderId, OrderStatus},
    events::{EventProducers, OrderPaidEvent, ReceiptSubmittedEvent},
    helpers::order_id::{generate_order_id, generate_order_id_with_jitter},
    spe_api::PaymentGatewayError,
    traits::{OrderDatabase, StoreError},
};

/// How many fresh ids to try when order creation runs into an id collision.
const MAX_ORDER_ID_ATTEMPTS: usize = 5;

/// `OrderFlowApi` is the authoritative driver of the order state machine.
///
/// Both payment flows go through it: the callback endpoint calls [`Self::order_paid_from_callback`], the manual
/// flow calls [`Self::submit_receipt`] / [`Self::confirm_order`] / [`Self::reject_order`]. The state table:
///
/// | From                    | Event                        | To                      |
/// |-------------------------|------------------------------|-------------------------|
/// | (none)                  | buyer completes collection   | `pending`               |
/// | `pending`               | buyer submits receipt        | `awaiting_confirmation` |
/// | `awaiting_confirmation` | operator approves            | `paid`                  |
/// | `awaiting_confirmation` | operator rejects             | `payment_rejected`      |
/// | `payment_rejected`      | buyer resubmits receipt      | `awaiting_confirmation` |
/// | `pending`               | verified provider callback   | `paid`                  |
///
/// `paid` is terminal. Every transition bottoms out in one guarded SQL statement, so concurrent drivers cannot
/// double-apply a transition; this API adds the flow-level guards (operator authorization, amount cross-checks,
/// receipt presence) and the event fan-out.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
    authorized_operators: HashSet<i64>,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers, authorized_operators: &[i64]) -> Self {
        Self { db, producers, authorized_operators: authorized_operators.iter().copied().collect() }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderDatabase
{
    /// Creates a new order in `pending` status and assigns its provider-facing id.
    ///
    /// The id is derived from the millisecond clock; on a collision (the store's UNIQUE constraint fires) a fresh
    /// jittered id is tried, up to [`MAX_ORDER_ID_ATTEMPTS`] times. A collision is therefore always retryable and
    /// never a silent overwrite.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, PaymentGatewayError> {
        validate_new_order(&order)?;
        let mut candidate = generate_order_id();
        for attempt in 1..=MAX_ORDER_ID_ATTEMPTS {
            match self.db.insert_order(candidate, order.clone()).await {
                Ok(order) => {
                    debug!("🔄️📦️ Order {} created for buyer {}", order.order_id, order.buyer_id);
                    return Ok(order);
                },
                Err(StoreError::DuplicateOrder(id)) => {
                    warn!("🔄️📦️ Order id {id} collided on attempt {attempt}. Retrying with a fresh id.");
                    candidate = generate_order_id_with_jitter();
                },
                Err(e) => return Err(e.into()),
            }
        }
        Err(PaymentGatewayError::OrderIdExhausted(MAX_ORDER_ID_ATTEMPTS))
    }

    /// The verified-callback driver of the `paid` transition.
    ///
    /// The signature has already been checked by the endpoint; this method cross-checks the callback amount
    /// against the *stored* connection price (never the other way around) and applies the transition. A
    /// re-delivered callback for an already-paid order returns [`PaymentGatewayError::OrderAlreadyPaid`] so the
    /// caller can acknowledge idempotently — no second event fan-out happens.
    pub async fn order_paid_from_callback(
        &self,
        order_id: OrderId,
        amount: Rubles,
    ) -> Result<Order, PaymentGatewayError> {
        let order = self
            .db
            .fetch_order_by_order_id(order_id)
            .await?
            .ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        if amount != order.connection_price {
            warn!(
                "🔄️💰️ Callback for order {order_id} carried {amount} but the recorded price is {}. Rejecting.",
                order.connection_price
            );
            return Err(PaymentGatewayError::AmountMismatch {
                order_id,
                expected: order.connection_price,
                received: amount,
            });
        }
        if !self.db.confirm_order(order_id).await? {
            info!("🔄️💰️ Order {order_id} was already paid. Callback re-delivery acknowledged as a no-op.");
            return Err(PaymentGatewayError::OrderAlreadyPaid(order_id));
        }
        let paid = self.fetch_existing(order_id).await?;
        debug!("🔄️💰️ Order {order_id} marked as paid by provider callback");
        self.call_order_paid_hook(&paid).await;
        Ok(paid)
    }

    /// Records an uploaded transfer receipt and moves the order to `awaiting_confirmation`.
    ///
    /// Allowed from `pending` (first submission) and `payment_rejected` (resubmission after a rejection).
    pub async fn submit_receipt(
        &self,
        order_id: OrderId,
        receipt_ref: &str,
        method_name: &str,
    ) -> Result<Order, PaymentGatewayError> {
        if receipt_ref.trim().is_empty() {
            return Err(PaymentGatewayError::ValidationError("A receipt reference is required".into()));
        }
        let order = self
            .db
            .fetch_order_by_order_id(order_id)
            .await?
            .ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        match order.status {
            OrderStatus::Pending | OrderStatus::PaymentRejected => {
                if !self.db.attach_receipt(order_id, receipt_ref, method_name).await? {
                    // The guarded update missed: the order changed status under us
                    let current = self.fetch_existing(order_id).await?;
                    return Err(PaymentGatewayError::OrderModificationForbidden(order_id, current.status));
                }
                let updated = self.fetch_existing(order_id).await?;
                debug!("🔄️🧾️ Receipt attached to order {order_id} via {method_name}");
                self.call_receipt_submitted_hook(&updated).await;
                Ok(updated)
            },
            status => Err(PaymentGatewayError::OrderModificationForbidden(order_id, status)),
        }
    }

    /// Operator approval of an uploaded receipt: `awaiting_confirmation` → `paid`.
    ///
    /// Approving an already-paid order is a success no-op — the stored confirmation timestamp is left untouched
    /// and no events fire. Approving an order that never got a receipt (`pending`) is rejected.
    pub async fn confirm_order(&self, order_id: OrderId, operator_id: i64) -> Result<Order, PaymentGatewayError> {
        self.check_operator(operator_id)?;
        let order = self
            .db
            .fetch_order_by_order_id(order_id)
            .await?
            .ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        match order.status {
            OrderStatus::Paid => {
                info!("🔄️✅️ Order {order_id} is already paid. Confirmation by operator {operator_id} is a no-op.");
                Ok(order)
            },
            OrderStatus::AwaitingConfirmation => {
                if self.db.confirm_order(order_id).await? {
                    let paid = self.fetch_existing(order_id).await?;
                    info!("🔄️✅️ Order {order_id} confirmed as paid by operator {operator_id}");
                    self.call_order_paid_hook(&paid).await;
                    Ok(paid)
                } else {
                    // A provider callback won the race; the order is paid either way
                    info!("🔄️✅️ Order {order_id} was paid concurrently. Operator confirmation is a no-op.");
                    self.fetch_existing(order_id).await
                }
            },
            status => Err(PaymentGatewayError::OrderModificationForbidden(order_id, status)),
        }
    }

    /// Operator rejection of an uploaded receipt: `awaiting_confirmation` → `payment_rejected`.
    ///
    /// The receipt reference is cleared so a resubmission is unambiguous. `payment_rejected` is not terminal.
    pub async fn reject_order(&self, order_id: OrderId, operator_id: i64) -> Result<Order, PaymentGatewayError> {
        self.check_operator(operator_id)?;
        let order = self
            .db
            .fetch_order_by_order_id(order_id)
            .await?
            .ok_or(PaymentGatewayError::OrderNotFound(order_id))?;
        match order.status {
            OrderStatus::AwaitingConfirmation => {
                if !self.db.reject_order(order_id).await? {
                    let current = self.fetch_existing(order_id).await?;
                    return Err(PaymentGatewayError::OrderModificationForbidden(order_id, current.status));
                }
                info!("🔄️❌️ Receipt for order {order_id} rejected by operator {operator_id}");
                self.fetch_existing(order_id).await
            },
            status => Err(PaymentGatewayError::OrderModificationForbidden(order_id, status)),
        }
    }

    pub async fn order_by_id(&self, order_id: OrderId) -> Result<Option<Order>, PaymentGatewayError> {
        Ok(self.db.fetch_order_by_order_id(order_id).await?)
    }

    pub async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, PaymentGatewayError> {
        Ok(self.db.fetch_orders_for_buyer(buyer_id).await?)
    }

    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, PaymentGatewayError> {
        Ok(self.db.fetch_recent_orders(limit).await?)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    fn check_operator(&self, operator_id: i64) -> Result<(), PaymentGatewayError> {
        if self.authorized_operators.contains(&operator_id) {
            Ok(())
        } else {
            warn!("🔄️🚫️ Operator {operator_id} is not in the authorized set");
            Err(PaymentGatewayError::UnauthorizedOperator(operator_id))
        }
    }

    async fn fetch_existing(&self, order_id: OrderId) -> Result<Order, PaymentGatewayError> {
        self.db.fetch_order_by_order_id(order_id).await?.ok_or(PaymentGatewayError::OrderNotFound(order_id))
    }

    async fn call_order_paid_hook(&self, order: &Order) {
        for producer in &self.producers.order_paid_producer {
            trace!("🔄️📦️ Notifying order-paid hook subscribers for {}", order.order_id);
            producer.publish_event(OrderPaidEvent::new(order.clone())).await;
        }
    }

    async fn call_receipt_submitted_hook(&self, order: &Order) {
        for producer in &self.producers.receipt_submitted_producer {
            trace!("🔄️📦️ Notifying receipt-submitted hook subscribers for {}", order.order_id);
            producer.publish_event(ReceiptSubmittedEvent::new(order.clone())).await;
        }
    }
}

fn validate_new_order(order: &NewOrder) -> Result<(), PaymentGatewayError> {
    if !order.connection_price.is_positive() {
        return Err(PaymentGatewayError::ValidationError(format!(
            "The connection price must be positive, got {}",
            order.connection_price
        )));
    }
    if order.full_name.trim().is_empty() {
        return Err(PaymentGatewayError::ValidationError("The buyer's full name is required".into()));
    }
    if order.region_city.trim().is_empty() {
        return Err(PaymentGatewayError::ValidationError("The buyer's region/city is required".into()));
    }
    if order.passport_photo_1.trim().is_empty() || order.passport_photo_2.trim().is_empty() {
        return Err(PaymentGatewayError::ValidationError("Both identity document references are required".into()));
    }
    if order.mode == FulfilmentMode::Transfer
        && order.transfer_phone.as_deref().map(|p| p.trim().is_empty()).unwrap_or(true)
    {
        return Err(PaymentGatewayError::ValidationError(
            "A phone number is required when transferring an existing number".into(),
        ));
    }
    Ok(())
}
