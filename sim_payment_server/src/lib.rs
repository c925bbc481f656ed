//! # SIM payment gateway server
//!
//! This crate hosts the HTTP surface of the gateway. It is responsible for:
//! * Listening for server-to-server payment result callbacks from the hosted payment page, verifying their
//!   signatures and driving the order state machine idempotently.
//! * Serving the buyer-facing success/fail landing pages (informational only — they never mutate order state).
//! * Fanning out best-effort buyer/operator notifications on the first transition of an order to `paid`, through a
//!   [`notifier::Notifier`] capability injected at startup.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: liveness check, returns a 200 OK response.
//! * `/payment/result`: the provider callback (any method; query string or form body).
//! * `/payment/success`, `/payment/fail`: browser redirect landing pages.
pub mod cli;
pub mod config;
pub mod errors;

pub mod data_objects;
pub mod notifier;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
