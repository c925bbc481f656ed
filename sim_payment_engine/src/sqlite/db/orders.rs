use log::{debug, trace};
use sqlx::{error::ErrorKind, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::StoreError,
};

/// Inserts a new order with the given provider-facing id.
///
/// The `orders.order_id` column carries a UNIQUE constraint; the constraint, not this function, is what guarantees
/// id uniqueness. A violation maps to [`StoreError::DuplicateOrder`] so the caller can retry with a fresh id.
pub async fn insert_order(
    order_id: OrderId,
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<Order, StoreError> {
    let inserted: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                buyer_id,
                username,
                tariff_id,
                tariff_name,
                operator_id,
                operator_name,
                monthly_fee,
                connection_price,
                mode,
                transfer_phone,
                full_name,
                region_city,
                passport_photo_1,
                passport_photo_2,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(order.buyer_id)
    .bind(order.username)
    .bind(order.tariff_id)
    .bind(order.tariff_name)
    .bind(order.operator_id)
    .bind(order.operator_name)
    .bind(order.monthly_fee)
    .bind(order.connection_price)
    .bind(order.mode)
    .bind(order.transfer_phone)
    .bind(order.full_name)
    .bind(order.region_city)
    .bind(order.passport_photo_1)
    .bind(order.passport_photo_2)
    .bind(order.created_at)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if matches!(de.kind(), ErrorKind::UniqueViolation) => {
            StoreError::DuplicateOrder(order_id)
        },
        _ => StoreError::from(e),
    })?;
    debug!("🗃️ Order {order_id} inserted with row id {}", inserted.id);
    Ok(inserted)
}

pub async fn fetch_order_by_order_id(
    order_id: OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, StoreError> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Unconditional status overwrite. Returns whether a row was affected.
pub async fn set_order_status(
    order_id: OrderId,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE order_id = $1")
        .bind(order_id)
        .bind(status)
        .execute(conn)
        .await?;
    trace!("🗃️ set_order_status({order_id}, {status}) affected {} row(s)", result.rows_affected());
    Ok(result.rows_affected() > 0)
}

/// Attaches a receipt and forces the order into `awaiting_confirmation`.
///
/// Guarded so that only `pending` and `payment_rejected` orders are touched — an order that got paid in the
/// meantime (e.g. by a racing provider callback) is left alone and `false` is returned.
pub async fn attach_receipt(
    order_id: OrderId,
    receipt_ref: &str,
    method_name: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET payment_receipt = $2, payment_method_name = $3, status = 'awaiting_confirmation'
        WHERE order_id = $1 AND status IN ('pending', 'payment_rejected')
        "#,
    )
    .bind(order_id)
    .bind(receipt_ref)
    .bind(method_name)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// The one transition both payment flows converge on. A single guarded statement: the first writer moves the order
/// to `paid` and stamps the confirmation time; every later writer (duplicate callback delivery, an operator racing
/// the callback) affects zero rows and leaves the original timestamp in place.
pub async fn confirm_order(order_id: OrderId, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = 'paid', payment_confirmed_at = CURRENT_TIMESTAMP
        WHERE order_id = $1 AND status <> 'paid'
        "#,
    )
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Rejects an uploaded receipt. Clearing `payment_receipt` makes a later resubmission unambiguous.
pub async fn reject_order(order_id: OrderId, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = 'payment_rejected', payment_receipt = NULL
        WHERE order_id = $1 AND status = 'awaiting_confirmation'
        "#,
    )
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_orders_for_buyer(buyer_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(buyer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub async fn fetch_recent_orders(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, StoreError> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC LIMIT $1")
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}
