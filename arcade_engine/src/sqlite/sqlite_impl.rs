//! `SqliteDatabase` is a concrete implementation of a NeonArcade storefront backend.
//!
//! Unsurprisingly, it uses SQLite and implements all the traits defined in the [`crate::traits`] module. The
//! multi-step flows (checkout, status transitions, cart mutations) each run inside a single transaction owned
//! here; the low-level [`super::db`] functions never open transactions of their own.
use std::fmt::Debug;

use log::*;
use nas_common::Money;
use sqlx::SqlitePool;

use super::db::{cart, catalog, db_url, new_pool, orders};
use crate::{
    api::{
        catalog_objects::GameQueryFilter,
        order_objects::{FullOrder, OrderChanged},
    },
    db_types::{CartItem, CartLine, Game, GameUpdate, NewGame, NewOrderItem, Order, OrderItem, OrderNumber, OrderStatusType},
    helpers::new_order_number,
    traits::{CartError, CartManagement, CatalogError, CatalogManagement, OrderFlowError, OrderManagement, StorefrontDatabase},
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
    /// Creates a new database pool using the URL from the `NAS_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_game(&self, game_id: i64) -> Result<Option<Game>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_game_by_id(game_id, &mut conn).await?)
    }

    async fn search_games(&self, filter: GameQueryFilter) -> Result<Vec<Game>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::search_games(filter, &mut conn).await?)
    }

    async fn game_in_stock(&self, game_id: i64, quantity: i64) -> Result<bool, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        catalog::game_in_stock(game_id, quantity, &mut conn).await?.ok_or(CatalogError::GameNotFound(game_id))
    }

    async fn insert_game(&self, game: NewGame) -> Result<Game, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::insert_game(game, &mut conn).await?)
    }

    async fn update_game(&self, game_id: i64, update: GameUpdate) -> Result<Game, CatalogError> {
        if update.is_empty() {
            return Err(CatalogError::UpdateNoOp);
        }
        let mut conn = self.pool.acquire().await?;
        catalog::update_game(game_id, update, &mut conn).await?.ok_or(CatalogError::GameNotFound(game_id))
    }

    async fn delete_game(&self, game_id: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let deleted = catalog::delete_game(game_id, &mut conn).await?;
        if deleted == 0 {
            return Err(CatalogError::GameNotFound(game_id));
        }
        Ok(())
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::fetch_cart_lines(user_id, &mut conn).await?)
    }

    async fn fetch_cart_item(&self, user_id: i64, game_id: i64) -> Result<Option<CartItem>, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::fetch_cart_item(user_id, game_id, &mut conn).await?)
    }

    async fn add_to_cart(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let mut tx = self.pool.begin().await?;
        let game =
            catalog::fetch_game_by_id(game_id, &mut tx).await?.ok_or(CartError::GameNotFound(game_id))?;
        if !game.is_available {
            return Err(CartError::GameUnavailable { game_id, title: game.title });
        }
        let existing = cart::fetch_cart_item(user_id, game_id, &mut tx).await?;
        let combined = existing
            .as_ref()
            .map(|i| i.quantity)
            .unwrap_or(0)
            .checked_add(quantity)
            .ok_or(CartError::InvalidQuantity(quantity))?;
        if game.stock_quantity < combined {
            return Err(CartError::InsufficientStock {
                game_id,
                title: game.title,
                requested: combined,
                available: game.stock_quantity,
            });
        }
        // The line subtotal must stay representable, or the arithmetic invariant breaks.
        if game.price.checked_mul(combined).is_none() {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let item = match existing {
            Some(_) => cart::set_cart_item_quantity(user_id, game_id, combined, &mut tx)
                .await?
                .ok_or(CartError::ItemNotInCart(game_id))?,
            None => cart::insert_cart_item(user_id, game_id, game.price, quantity, &mut tx).await?,
        };
        tx.commit().await?;
        Ok(item)
    }

    async fn update_cart_quantity(&self, user_id: i64, game_id: i64, quantity: i64) -> Result<CartItem, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let mut tx = self.pool.begin().await?;
        if cart::fetch_cart_item(user_id, game_id, &mut tx).await?.is_none() {
            return Err(CartError::ItemNotInCart(game_id));
        }
        let game =
            catalog::fetch_game_by_id(game_id, &mut tx).await?.ok_or(CartError::GameNotFound(game_id))?;
        if game.stock_quantity < quantity {
            return Err(CartError::InsufficientStock {
                game_id,
                title: game.title,
                requested: quantity,
                available: game.stock_quantity,
            });
        }
        if game.price.checked_mul(quantity).is_none() {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let item = cart::set_cart_item_quantity(user_id, game_id, quantity, &mut tx)
            .await?
            .ok_or(CartError::ItemNotInCart(game_id))?;
        tx.commit().await?;
        Ok(item)
    }

    async fn remove_from_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError> {
        let mut conn = self.pool.acquire().await?;
        let removed = cart::delete_cart_item(user_id, game_id, &mut conn).await?;
        Ok(removed > 0)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<u64, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::clear_cart(user_id, &mut conn).await?)
    }

    async fn cart_total(&self, user_id: i64) -> Result<Money, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::cart_total(user_id, &mut conn).await?)
    }

    async fn cart_item_count(&self, user_id: i64) -> Result<i64, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::cart_item_count(user_id, &mut conn).await?)
    }

    async fn game_in_cart(&self, user_id: i64, game_id: i64) -> Result<bool, CartError> {
        let mut conn = self.pool.acquire().await?;
        Ok(cart::fetch_cart_item(user_id, game_id, &mut conn).await?.is_some())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_id(order_id, &mut conn).await?)
    }

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_by_number(number, &mut conn).await?)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_items(order_id, &mut conn).await?)
    }

    async fn fetch_order_with_items(&self, order_id: i64) -> Result<Option<FullOrder>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        match order {
            Some(order) => {
                let items = orders::fetch_order_items(order.id, &mut conn).await?;
                Ok(Some(FullOrder { order, items }))
            },
            None => Ok(None),
        }
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_user(user_id, &mut conn).await?)
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn checkout_cart(&self, user_id: i64) -> Result<FullOrder, OrderFlowError> {
        let mut tx = self.pool.begin().await?;

        // One consistent read of cart + catalog; every check below runs against this snapshot, and the
        // guarded stock decrement re-validates it at write time under the same transaction.
        let lines = cart::fetch_cart_lines(user_id, &mut tx).await?;
        if lines.is_empty() {
            return Err(OrderFlowError::EmptyCart);
        }
        for line in &lines {
            let title = match &line.title {
                Some(t) => t.clone(),
                None => return Err(OrderFlowError::GameNotFound(line.game_id)),
            };
            if !line.is_available.unwrap_or(false) {
                return Err(OrderFlowError::GameUnavailable { game_id: line.game_id, title });
            }
            let available = line.stock_quantity.unwrap_or(0);
            if available < line.quantity {
                return Err(OrderFlowError::InsufficientStock {
                    game_id: line.game_id,
                    title,
                    requested: line.quantity,
                    available,
                });
            }
        }

        let new_items: Vec<NewOrderItem> = lines.iter().map(NewOrderItem::from_cart_line).collect();
        let total: Money = new_items.iter().map(|i| i.subtotal).sum();
        let order_number = OrderNumber::from(new_order_number());
        let order = orders::insert_order(&order_number, user_id, total, &mut tx).await.map_err(|e| {
            if orders::is_unique_violation(&e) {
                OrderFlowError::OrderNumberCollision(order_number.clone())
            } else {
                OrderFlowError::from(e)
            }
        })?;

        let mut items = Vec::with_capacity(new_items.len());
        for new_item in new_items {
            let (game_id, quantity) = (new_item.game_id, new_item.quantity);
            if !catalog::decrement_stock(game_id, quantity, &mut tx).await? {
                // Stock moved under us between the snapshot read and this write. Abort; the transaction
                // rollback restores the cart and removes the order row.
                let line = lines.iter().find(|l| l.game_id == game_id);
                return Err(OrderFlowError::InsufficientStock {
                    game_id,
                    title: line.and_then(|l| l.title.clone()).unwrap_or_default(),
                    requested: quantity,
                    available: line.and_then(|l| l.stock_quantity).unwrap_or(0),
                });
            }
            items.push(orders::insert_order_item(order.id, new_item, &mut tx).await?);
        }

        cart::clear_cart(user_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] committed for user {user_id}: cart consumed and stock adjusted", order.order_number);
        Ok(FullOrder { order, items })
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatusType,
    ) -> Result<OrderChanged, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order_by_id(order_id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if !order.status.can_transition_to(new_status) {
            return Err(OrderFlowError::TerminalState { order_id, status: order.status });
        }
        let updated = orders::update_order_status(order_id, new_status, &mut tx)
            .await?
            .ok_or(OrderFlowError::OrderNotFound(order_id))?;
        tx.commit().await?;
        Ok(OrderChanged { old_status: order.status, order: updated })
    }

    async fn delete_order(&self, order_id: i64) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::fetch_order_by_id(order_id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        if order.status == OrderStatusType::Completed {
            return Err(OrderFlowError::CannotDeleteCompletedOrder(order_id));
        }
        orders::delete_order(order_id, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), OrderFlowError> {
        self.pool.close().await;
        Ok(())
    }
}
