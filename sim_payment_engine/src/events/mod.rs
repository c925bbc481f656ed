//! Simple stateless pub-sub event handling.
//!
//! Components subscribe to payment gateway events (an order getting paid, a receipt arriving for review) and react
//! to them without access to any internal state — all a handler receives is the event itself. Handlers are async
//! and run detached, so a slow or failing notification can never hold up the flow that published the event.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OrderPaidEvent, ReceiptSubmittedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
