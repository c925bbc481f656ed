use spg_common::Rubles;
use thiserror::Error;

use crate::{
    db_types::{OrderId, OrderStatus},
    traits::StoreError,
};

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid order: {0}")]
    ValidationError(String),
    #[error("Order {0} already exists")]
    OrderAlreadyExists(OrderId),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order {0} is already paid")]
    OrderAlreadyPaid(OrderId),
    #[error("Order {0} cannot make the requested transition from status {1}")]
    OrderModificationForbidden(OrderId, OrderStatus),
    #[error("Callback amount {received} does not match the recorded price {expected} of order {order_id}")]
    AmountMismatch { order_id: OrderId, expected: Rubles, received: Rubles },
    #[error("Operator {0} is not authorized to resolve payments")]
    UnauthorizedOperator(i64),
    #[error("Could not allocate a unique order id after {0} attempts")]
    OrderIdExhausted(usize),
}

impl From<StoreError> for PaymentGatewayError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DatabaseError(s) => Self::DatabaseError(s),
            StoreError::DuplicateOrder(id) => Self::OrderAlreadyExists(id),
            StoreError::OrderNotFound(id) => Self::OrderNotFound(id),
        }
    }
}
