//! Product catalog for the SIM payment gateway.
//!
//! The catalog owns the operators, tariffs and manual payment methods that the order flows sell against. It is
//! deliberately a dumb collaborator: one JSON file on disk, loaded once, queried read-only. Prices read from the
//! catalog are authoritative *at order-creation time* — an order snapshots them and never looks back, so edits to
//! the file never retro-actively change an order's charge amount.
mod catalog;
mod error;

mod data_objects;

pub use catalog::Catalog;
pub use data_objects::{Operator, PaymentMethod, Tariff};
pub use error::CatalogError;
