use thiserror::Error;

use crate::{
    api::order_objects::{FullOrder, OrderChanged},
    db_types::{ConversionError, Order, OrderNumber, OrderStatusType},
    traits::{CartError, CartManagement, CatalogManagement, OrderManagement},
};

/// The top-level behaviour contract for storefront backends. Implementations own the transaction boundaries for
/// the flows below; callers never see a half-applied checkout or status change.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase: Clone + CatalogManagement + CartManagement + OrderManagement {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Converts the user's cart into a new `Pending` order, as a single atomic unit.
    ///
    /// Validation runs against one consistent read of the cart joined with the catalog, fail-fast and in this
    /// order: empty cart, missing game, unavailable game, insufficient stock. Only when every line passes does
    /// any write begin: the order and its line items are inserted (unit price and quantity copied verbatim from
    /// the cart, subtotals recomputed, a fresh redemption key minted per line), stock is decremented with a
    /// re-check under the same transaction, and the cart is cleared.
    ///
    /// Any failure after validation rolls the entire transaction back: no order exists and the cart is exactly
    /// as it was. Two concurrent checkouts against the same cart cannot both succeed; the loser sees the cleared
    /// cart (`EmptyCart`) or a serialization failure, never a duplicate order.
    async fn checkout_cart(&self, user_id: i64) -> Result<FullOrder, OrderFlowError>;

    /// Applies a status transition requested by an administrator.
    ///
    /// The order must exist and must not be in a terminal state (`Completed` or `Cancelled`); terminal orders
    /// reject every transition, including to their current status. Transitions out of non-terminal states are
    /// unrestricted. Returns the order before and after the change.
    async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatusType,
    ) -> Result<OrderChanged, OrderFlowError>;

    /// Deletes an order and its line items. `Completed` orders cannot be deleted. Returns the deleted order.
    async fn delete_order(&self, order_id: i64) -> Result<Order, OrderFlowError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderFlowError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Cannot create an order from an empty cart")]
    EmptyCart,
    #[error("The requested game {0} does not exist")]
    GameNotFound(i64),
    #[error("'{title}' is no longer available")]
    GameUnavailable { game_id: i64, title: String },
    #[error("Insufficient stock for '{title}': requested {requested}, but only {available} available")]
    InsufficientStock { game_id: i64, title: String, requested: i64, available: i64 },
    #[error("{0}")]
    InvalidStatus(#[from] ConversionError),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order {order_id} is {status} and can no longer be modified")]
    TerminalState { order_id: i64, status: OrderStatusType },
    #[error("Completed orders cannot be deleted (order {0})")]
    CannotDeleteCompletedOrder(i64),
    #[error("Order number {0} already exists")]
    OrderNumberCollision(OrderNumber),
    #[error("{0}")]
    CartError(#[from] CartError),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

impl OrderFlowError {
    /// Validation and conflict errors are client faults: no state was mutated and a retry with the same input
    /// will fail the same way. Everything else is a server fault worth retrying from scratch.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, OrderFlowError::DatabaseError(_) | OrderFlowError::OrderNumberCollision(_))
    }
}
