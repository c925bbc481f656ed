use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Fired exactly once per order, on its first transition to `paid` — whether the transition came from a verified
/// provider callback or from an operator approving a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    pub order: Order,
}

impl OrderPaidEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Fired when a buyer uploads a transfer receipt and the order enters `awaiting_confirmation`. Used to prompt the
/// operator set to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSubmittedEvent {
    pub order: Order,
}

impl ReceiptSubmittedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
