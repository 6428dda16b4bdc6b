use std::fmt::Debug;

use log::*;

use crate::{
    api::order_objects::FullOrder,
    db_types::{Order, OrderItem, OrderStatusType},
    traits::{OrderFlowError, StorefrontDatabase},
};

/// `OrderFlowApi` is the primary API for converting carts into orders and driving the order lifecycle
/// afterwards.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: StorefrontDatabase
{
    /// Convert the user's cart into a new `Pending` order.
    ///
    /// The whole operation is atomic: either the order exists and the cart is empty, or neither happened. See
    /// [`StorefrontDatabase::checkout_cart`] for the validation sequence. Nothing is retried here; a failed
    /// checkout leaves the cart untouched and the caller decides whether to try again.
    pub async fn checkout(&self, user_id: i64) -> Result<FullOrder, OrderFlowError> {
        trace!("🛒️ Checkout requested for user {user_id}");
        match self.db.checkout_cart(user_id).await {
            Ok(result) => {
                info!(
                    "🛒️ Order [{}] created for user {user_id}: {} lines, total {}",
                    result.order.order_number,
                    result.items.len(),
                    result.order.total_amount
                );
                Ok(result)
            },
            Err(e) if e.is_client_fault() => {
                debug!("🛒️ Checkout rejected for user {user_id}: {e}");
                Err(e)
            },
            Err(e) => {
                error!("🛒️ Checkout for user {user_id} failed and was rolled back: {e}");
                Err(e)
            },
        }
    }

    /// Apply an administrator-requested status transition and return the updated order.
    ///
    /// Terminal orders (`Completed`, `Cancelled`) reject every transition. Transitions out of non-terminal
    /// states are deliberately unrestricted; the validity rule lives in
    /// [`OrderStatusType::can_transition_to`] should a stricter table ever be wanted.
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatusType) -> Result<Order, OrderFlowError> {
        let changed = self.db.update_order_status(order_id, new_status).await?;
        info!(
            "📦️ Order [{}] status changed: {} ➡️ {}",
            changed.order.order_number, changed.old_status, changed.order.status
        );
        Ok(changed.order)
    }

    /// Delete an order and its line items. Completed orders are immutable and cannot be deleted.
    pub async fn delete_order(&self, order_id: i64) -> Result<Order, OrderFlowError> {
        let order = self.db.delete_order(order_id).await?;
        warn!("📦️ Order [{}] deleted (id {order_id})", order.order_number);
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderFlowError> {
        self.db.fetch_order(order_id).await
    }

    pub async fn fetch_order_with_items(&self, order_id: i64) -> Result<Option<FullOrder>, OrderFlowError> {
        self.db.fetch_order_with_items(order_id).await
    }

    pub async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderFlowError> {
        self.db.fetch_order_items(order_id).await
    }

    pub async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        self.db.fetch_orders_for_user(user_id).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
