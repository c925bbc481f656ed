//! # SIM Payment Engine
//!
//! The core of the SIM payment gateway: the order store, the order state machine, and the payment-page signature
//! protocol. It is HTTP-agnostic — the server crate and the operator tooling are thin drivers of the API exposed
//! here.
//!
//! The library splits into:
//! 1. Database management ([`mod@sqlite`]). SQLite is the supported backend; access goes through the
//!    [`traits::OrderDatabase`] contract, never through raw queries, so the guarded single-statement updates that
//!    make callbacks idempotent stay in one place.
//! 2. The public API ([`OrderFlowApi`]): order creation, the manual receipt flow and the verified-callback flow,
//!    all converging on one state machine.
//! 3. Pure helpers ([`mod@helpers`]): the two-secret signature protocol and the order id generator.
//!
//! Events fired on state transitions can be subscribed to through the hook system in [`mod@events`] — this is how
//! buyer/operator notifications are wired in without the engine knowing anything about messaging.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

mod spe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{db::db_url, SqliteDatabase, MIGRATOR};
pub use spe_api::{OrderFlowApi, PaymentGatewayError};
