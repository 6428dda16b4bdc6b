use nas_common::Money;
use thiserror::Error;

use crate::db_types::{CartItem, CartLine};

/// Per-user cart management.
///
/// A cart holds at most one line per (user, game). Every mutation keeps `subtotal = price * quantity` and
/// `quantity >= 1`; a quantity of zero is expressed by removing the line. The unit price on a line is frozen when
/// the line is first added and does not track later catalog price changes.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Returns the user's cart joined with the catalog columns checkout validation needs (title, availability,
    /// current stock), in a single read. Lines whose game has been removed from the catalog come back with
    /// `None` in the catalog columns.
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError>;

    async fn fetch_cart_item(&self, user_id: i64, game_id: i64) -> Result<Option<CartItem>, CartError>;

    /// Adds `quantity` units of a game to the cart. If the game is already in the cart the existing line's
    /// quantity is increased instead, and the stock check covers the combined quantity. The game must exist and
    /// be available for sale.
    async fn add_to_cart(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError>;

    /// Sets the quantity on an existing cart line. The new quantity must be at least 1 and covered by stock.
    async fn update_cart_quantity(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError>;

    /// Removes a single line. Returns `false` if the game was not in the cart.
    async fn remove_from_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError>;

    /// Empties the cart, returning the number of lines removed.
    async fn clear_cart(&self, user_id: i64) -> Result<u64, CartError>;

    /// The sum of the line subtotals currently in the cart.
    async fn cart_total(&self, user_id: i64) -> Result<Money, CartError>;

    /// The total quantity of items in the cart, summed across lines.
    async fn cart_item_count(&self, user_id: i64) -> Result<i64, CartError>;

    /// Whether the given game is in the user's cart.
    async fn game_in_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError>;
}

#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("The requested game {0} does not exist")]
    GameNotFound(i64),
    #[error("'{title}' is not available for purchase")]
    GameUnavailable { game_id: i64, title: String },
    #[error("Insufficient stock for '{title}': requested {requested}, but only {available} available")]
    InsufficientStock { game_id: i64, title: String, requested: i64, available: i64 },
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    #[error("Game {0} is not in the cart")]
    ItemNotInCart(i64),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CartError {
    fn from(e: sqlx::Error) -> Self {
        CartError::DatabaseError(e.to_string())
    }
}
