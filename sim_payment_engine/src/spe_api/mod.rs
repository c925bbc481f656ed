//! The payment engine public API.
//!
//! [`OrderFlowApi`] is the only component that drives order state transitions. The two payment flows (verified
//! provider callbacks and operator-mediated receipt confirmation) are thin drivers of it, not separate systems.
mod errors;
mod order_flow_api;

pub use errors::PaymentGatewayError;
pub use order_flow_api::OrderFlowApi;
