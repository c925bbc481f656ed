use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::db_types::OrderId;

/// Order ids live in `[0, 10^9)` so they stay comfortably inside the provider's `InvId` integer range.
pub const ORDER_ID_RANGE: i64 = 1_000_000_000;

/// Derives a candidate order id from the millisecond epoch clock, reduced into [`ORDER_ID_RANGE`].
///
/// This is best-effort uniqueness only. The store's UNIQUE constraint on `order_id` is the actual guard; a
/// collision surfaces as a retryable conflict, never as a silent overwrite.
pub fn generate_order_id() -> OrderId {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or_default();
    OrderId(millis.rem_euclid(ORDER_ID_RANGE))
}

/// A fresh candidate for retrying after an id collision. The clock may not have advanced between two attempts, so
/// a random offset is mixed in.
pub fn generate_order_id_with_jitter() -> OrderId {
    let offset = rand::thread_rng().gen_range(1..ORDER_ID_RANGE);
    OrderId((generate_order_id().value() + offset).rem_euclid(ORDER_ID_RANGE))
}
