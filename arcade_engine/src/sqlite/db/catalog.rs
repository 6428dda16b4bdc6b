use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    api::catalog_objects::GameQueryFilter,
    db_types::{Game, GameUpdate, NewGame},
};

pub async fn insert_game(game: NewGame, conn: &mut SqliteConnection) -> Result<Game, sqlx::Error> {
    let game = sqlx::query_as(
        r#"
            INSERT INTO games (title, description, price, stock_quantity, is_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(game.title)
    .bind(game.description)
    .bind(game.price)
    .bind(game.stock_quantity)
    .bind(game.is_available)
    .fetch_one(conn)
    .await?;
    Ok(game)
}

pub async fn fetch_game_by_id(game_id: i64, conn: &mut SqliteConnection) -> Result<Option<Game>, sqlx::Error> {
    let game = sqlx::query_as("SELECT * FROM games WHERE id = $1").bind(game_id).fetch_optional(conn).await?;
    Ok(game)
}

/// Fetches games according to the criteria in the filter.
///
/// Results are ordered by title in ascending order and paginated.
pub async fn search_games(filter: GameQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Game>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM games
    "#,
    );
    // `available_only: Some(false)` is a no-op criterion, so it must not trigger a WHERE on its own.
    let available_only = filter.available_only.unwrap_or(false);
    let has_criteria =
        filter.search_term.is_some() || filter.min_price.is_some() || filter.max_price.is_some() || available_only;
    if has_criteria {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(term) = &filter.search_term {
        where_clause.push("title LIKE ");
        where_clause.push_bind_unseparated(format!("%{term}%"));
    }
    if let Some(min_price) = filter.min_price {
        where_clause.push("price >= ");
        where_clause.push_bind_unseparated(min_price);
    }
    if let Some(max_price) = filter.max_price {
        where_clause.push("price <= ");
        where_clause.push_bind_unseparated(max_price);
    }
    if available_only {
        where_clause.push("is_available = 1");
    }
    builder.push(" ORDER BY title ASC LIMIT ");
    builder.push_bind(filter.limit());
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset());

    trace!("🎮️ Executing query: {}", builder.sql());
    let games = builder.build_query_as::<Game>().fetch_all(conn).await?;
    trace!("🎮️ Result of search_games: {} rows", games.len());
    Ok(games)
}

/// Returns whether the game has at least `quantity` units in stock, or `None` if the game does not exist.
pub async fn game_in_stock(
    game_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<bool>, sqlx::Error> {
    let in_stock: Option<bool> = sqlx::query_scalar("SELECT stock_quantity >= $1 FROM games WHERE id = $2")
        .bind(quantity)
        .bind(game_id)
        .fetch_optional(conn)
        .await?;
    Ok(in_stock)
}

pub async fn update_game(
    game_id: i64,
    update: GameUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Game>, sqlx::Error> {
    let mut builder = QueryBuilder::new("UPDATE games SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(title) = update.title {
        set_clause.push("title = ");
        set_clause.push_bind_unseparated(title);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    if let Some(stock) = update.stock_quantity {
        set_clause.push("stock_quantity = ");
        set_clause.push_bind_unseparated(stock);
    }
    if let Some(available) = update.is_available {
        set_clause.push("is_available = ");
        set_clause.push_bind_unseparated(available);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(game_id);
    builder.push(" RETURNING *");
    trace!("🎮️ Executing query: {}", builder.sql());
    let game = builder.build_query_as::<Game>().fetch_optional(conn).await?;
    Ok(game)
}

pub async fn delete_game(game_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM games WHERE id = $1").bind(game_id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Decrements the stock counter for a game, re-checking availability of stock under the caller's transaction.
/// Returns `false` (and changes nothing) if fewer than `quantity` units remain, which serialises concurrent
/// checkouts racing for the same stock.
pub async fn decrement_stock(game_id: i64, quantity: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE games SET stock_quantity = stock_quantity - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND stock_quantity >= $1
        "#,
    )
    .bind(quantity)
    .bind(game_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
