//! `SqliteDatabase` is the concrete SQLite implementation of the [`OrderDatabase`] contract.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::{
    db::{new_pool, orders},
    MIGRATOR,
};
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::{OrderDatabase, StoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database connection pool with `max_connections` connections.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await.map_err(|e| StoreError::DatabaseError(e.to_string()))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order_id: OrderId, order: NewOrder) -> Result<Order, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order_id, order, &mut conn).await
    }

    async fn fetch_order_by_order_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_order_id(order_id, &mut conn).await
    }

    async fn set_order_status(&self, order_id: OrderId, status: OrderStatus) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::set_order_status(order_id, status, &mut conn).await
    }

    async fn attach_receipt(
        &self,
        order_id: OrderId,
        receipt_ref: &str,
        method_name: &str,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::attach_receipt(order_id, receipt_ref, method_name, &mut conn).await
    }

    async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::confirm_order(order_id, &mut conn).await
    }

    async fn reject_order(&self, order_id: OrderId) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::reject_order(order_id, &mut conn).await
    }

    async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_buyer(buyer_id, &mut conn).await
    }

    async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<Order>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_recent_orders(limit, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}
