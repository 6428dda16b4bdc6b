use crate::{
    api::order_objects::FullOrder,
    db_types::{Order, OrderItem, OrderNumber},
    traits::OrderFlowError,
};

/// Read access to the order ledger. All mutation goes through [`crate::traits::StorefrontDatabase`].
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderFlowError>;

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError>;

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderFlowError>;

    async fn fetch_order_with_items(&self, order_id: i64) -> Result<Option<FullOrder>, OrderFlowError>;

    /// All orders placed by the given user, most recent first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError>;
}
