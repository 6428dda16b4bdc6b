use std::fmt::Debug;

use log::*;
use nas_common::Money;

use crate::{
    api::catalog_objects::GameQueryFilter,
    db_types::{Game, GameUpdate, NewGame},
    traits::{CatalogError, CatalogManagement},
};

/// API for browsing and administering the game catalog.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub async fn game(&self, game_id: i64) -> Result<Option<Game>, CatalogError> {
        self.db.fetch_game(game_id).await
    }

    pub async fn search(&self, filter: GameQueryFilter) -> Result<Vec<Game>, CatalogError> {
        self.db.search_games(filter).await
    }

    pub async fn in_stock(&self, game_id: i64, quantity: i64) -> Result<bool, CatalogError> {
        self.db.game_in_stock(game_id, quantity).await
    }

    pub async fn add_game(&self, game: NewGame) -> Result<Game, CatalogError> {
        validate_price_and_stock(game.price, game.stock_quantity)?;
        if game.title.trim().is_empty() {
            return Err(CatalogError::InvalidGame("Title cannot be empty".to_string()));
        }
        let game = self.db.insert_game(game).await?;
        info!("🎮️ Game '{}' added to the catalog with id {}", game.title, game.id);
        Ok(game)
    }

    pub async fn update_game(&self, game_id: i64, update: GameUpdate) -> Result<Game, CatalogError> {
        if update.is_empty() {
            debug!("🎮️ No fields to update for game {game_id}. Update request skipped.");
            return Err(CatalogError::UpdateNoOp);
        }
        if let Some(price) = update.price {
            validate_price_and_stock(price, update.stock_quantity.unwrap_or(0))?;
        } else if let Some(stock) = update.stock_quantity {
            validate_price_and_stock(Money::default(), stock)?;
        }
        let game = self.db.update_game(game_id, update).await?;
        info!("🎮️ Game '{}' (id {game_id}) updated", game.title);
        Ok(game)
    }

    pub async fn remove_game(&self, game_id: i64) -> Result<(), CatalogError> {
        self.db.delete_game(game_id).await?;
        warn!("🎮️ Game {game_id} removed from the catalog");
        Ok(())
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn validate_price_and_stock(price: Money, stock: i64) -> Result<(), CatalogError> {
    if price.value() < 0 {
        return Err(CatalogError::InvalidGame(format!("Price cannot be negative, got {price}")));
    }
    if stock < 0 {
        return Err(CatalogError::InvalidGame(format!("Stock quantity cannot be negative, got {stock}")));
    }
    Ok(())
}
