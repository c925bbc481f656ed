use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::StoreError,
};

/// The storage contract for the payment gateway core.
///
/// Implementations own the `orders` table exclusively; nothing else holds a mutable copy of an order. Each write
/// method below must execute as a single atomic statement against the row identified by `order_id` — the guarded
/// `UPDATE`s are what turn racing writers into a well-defined final state.
#[allow(async_fn_in_trait)]
pub trait OrderDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Inserts a new order with the given provider-facing id and `pending` status.
    ///
    /// The backend must enforce id uniqueness at the constraint level, not in application logic; a collision is
    /// reported as [`StoreError::DuplicateOrder`] so the caller can regenerate the id and retry.
    async fn insert_order(&self, order_id: OrderId, order: NewOrder) -> Result<Order, StoreError>;

    async fn fetch_order_by_order_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Unconditional status overwrite. Returns whether a row was affected. Reserved for paths where a human has
    /// already disambiguated the transition; the flow API never uses it for callback processing.
    async fn set_order_status(&self, order_id: OrderId, status: OrderStatus) -> Result<bool, StoreError>;

    /// Records a payment receipt and forces the order into `awaiting_confirmation`. Only orders currently in
    /// `pending` or `payment_rejected` are affected; the returned flag reports whether the guarded update hit.
    async fn attach_receipt(
        &self,
        order_id: OrderId,
        receipt_ref: &str,
        method_name: &str,
    ) -> Result<bool, StoreError>;

    /// Marks the order `paid` and stamps `payment_confirmed_at`, unless it is already `paid`. Returns whether the
    /// row transitioned — `false` means a duplicate delivery (or a lost race), and the confirmation timestamp of
    /// the first transition is left untouched.
    async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError>;

    /// Marks an `awaiting_confirmation` order as `payment_rejected` and clears the receipt reference, so that a
    /// later resubmission is unambiguous.
    async fn reject_order(&self, order_id: OrderId) -> Result<bool, StoreError>;

    /// All orders for one buyer, newest first.
    async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError>;

    /// The most recent orders across all buyers, newest first.
    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<Order>, StoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
