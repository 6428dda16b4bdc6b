use thiserror::Error;

use crate::{
    api::catalog_objects::GameQueryFilter,
    db_types::{Game, GameUpdate, NewGame},
};

/// Read and write access to the game catalog.
///
/// Checkout itself never calls these methods; it gets its catalog snapshot through the cart join (see
/// [`crate::traits::CartManagement::fetch_cart`]) so that validation runs off a single consistent read.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_game(&self, game_id: i64) -> Result<Option<Game>, CatalogError>;

    /// Fetches games according to the criteria in the filter, ordered by title. Results are paginated; the
    /// filter caps the page size.
    async fn search_games(&self, filter: GameQueryFilter) -> Result<Vec<Game>, CatalogError>;

    /// Whether the game currently has at least `quantity` units in stock.
    async fn game_in_stock(&self, game_id: i64, quantity: i64) -> Result<bool, CatalogError>;

    async fn insert_game(&self, game: NewGame) -> Result<Game, CatalogError>;

    /// Applies a partial update. An update with no populated fields is rejected as a no-op.
    async fn update_game(&self, game_id: i64, update: GameUpdate) -> Result<Game, CatalogError>;

    async fn delete_game(&self, game_id: i64) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("The requested game {0} does not exist")]
    GameNotFound(i64),
    #[error("Invalid game data. {0}")]
    InvalidGame(String),
    #[error("The requested catalog change would result in a no-op.")]
    UpdateNoOp,
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}
