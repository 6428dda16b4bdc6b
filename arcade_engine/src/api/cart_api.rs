use std::fmt::Debug;

use log::*;
use nas_common::Money;

use crate::{
    db_types::{CartItem, CartLine},
    traits::{CartError, CartManagement},
};

/// API for reading and mutating a user's cart outside of checkout.
pub struct CartApi<B> {
    db: B,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    pub async fn cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError> {
        self.db.fetch_cart(user_id).await
    }

    pub async fn cart_total(&self, user_id: i64) -> Result<Money, CartError> {
        self.db.cart_total(user_id).await
    }

    pub async fn cart_item_count(&self, user_id: i64) -> Result<i64, CartError> {
        self.db.cart_item_count(user_id).await
    }

    pub async fn game_in_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError> {
        self.db.game_in_cart(user_id, game_id).await
    }

    /// Add a game to the cart, folding into an existing line if the game is already there.
    pub async fn add_to_cart(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        let item = self.db.add_to_cart(user_id, game_id, quantity).await?;
        info!("🛍️ User {user_id} added {quantity}x game {game_id} to cart (line quantity now {})", item.quantity);
        Ok(item)
    }

    /// Set the quantity on an existing cart line.
    pub async fn update_quantity(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        let item = self.db.update_cart_quantity(user_id, game_id, quantity).await?;
        info!("🛍️ User {user_id} set game {game_id} quantity to {quantity} in cart");
        Ok(item)
    }

    /// Remove a single line from the cart. Returns `false` if the game was not in the cart.
    pub async fn remove_from_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError> {
        let removed = self.db.remove_from_cart(user_id, game_id).await?;
        if removed {
            info!("🛍️ User {user_id} removed game {game_id} from cart");
        }
        Ok(removed)
    }

    /// Empty the cart. Returns the number of lines removed.
    pub async fn clear_cart(&self, user_id: i64) -> Result<u64, CartError> {
        let removed = self.db.clear_cart(user_id).await?;
        info!("🛍️ User {user_id} cleared their cart ({removed} lines)");
        Ok(removed)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
