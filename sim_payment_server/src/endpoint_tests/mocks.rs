use mockall::mock;
use sim_payment_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatus},
    traits::{OrderDatabase, StoreError},
};

mock! {
    pub OrderDb {}
    impl OrderDatabase for OrderDb {
        fn url(&self) -> &str;
        async fn insert_order(&self, order_id: OrderId, order: NewOrder) -> Result<Order, StoreError>;
        async fn fetch_order_by_order_id(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;
        async fn set_order_status(&self, order_id: OrderId, status: OrderStatus) -> Result<bool, StoreError>;
        async fn attach_receipt(&self, order_id: OrderId, receipt_ref: &str, method_name: &str) -> Result<bool, StoreError>;
        async fn confirm_order(&self, order_id: OrderId) -> Result<bool, StoreError>;
        async fn reject_order(&self, order_id: OrderId) -> Result<bool, StoreError>;
        async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, StoreError>;
        async fn fetch_recent_orders(&self, limit: i64) -> Result<Vec<Order>, StoreError>;
        async fn close(&mut self) -> Result<(), StoreError>;
    }
    impl Clone for OrderDb {
        fn clone(&self) -> Self;
    }
}
