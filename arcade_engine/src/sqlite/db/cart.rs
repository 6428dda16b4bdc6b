use log::trace;
use nas_common::Money;
use sqlx::SqliteConnection;

use crate::db_types::{CartItem, CartLine};

/// Returns the user's cart lines joined with the catalog columns needed for checkout validation. The LEFT JOIN
/// means a line whose game row has disappeared still comes back, with NULLs in the catalog columns.
pub async fn fetch_cart_lines(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
    let lines = sqlx::query_as(
        r#"
        SELECT
            cart_items.id as id,
            user_id,
            game_id,
            cart_items.price as price,
            quantity,
            subtotal,
            games.title as title,
            games.is_available as is_available,
            games.stock_quantity as stock_quantity
        FROM cart_items LEFT JOIN games ON cart_items.game_id = games.id
        WHERE user_id = $1
        ORDER BY cart_items.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    trace!("🛍️ Fetched {} cart lines for user {user_id}", lines.len());
    Ok(lines)
}

pub async fn fetch_cart_item(
    user_id: i64,
    game_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, sqlx::Error> {
    let item = sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 AND game_id = $2")
        .bind(user_id)
        .bind(game_id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

/// Inserts a brand-new cart line, capturing the unit price at add time. `subtotal` is computed here and kept in
/// sync by every subsequent mutation.
pub async fn insert_cart_item(
    user_id: i64,
    game_id: i64,
    price: Money,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<CartItem, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO cart_items (user_id, game_id, price, quantity, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(game_id)
    .bind(price)
    .bind(quantity)
    .bind(price * quantity)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

/// Sets the quantity on an existing line, recomputing the subtotal from the frozen unit price.
pub async fn set_cart_item_quantity(
    user_id: i64,
    game_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartItem>, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
            UPDATE cart_items
            SET quantity = $1, subtotal = price * $1, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $2 AND game_id = $3
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(user_id)
    .bind(game_id)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

pub async fn delete_cart_item(user_id: i64, game_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND game_id = $2")
        .bind(user_id)
        .bind(game_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn clear_cart(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    trace!("🛍️ Cleared {} cart lines for user {user_id}", result.rows_affected());
    Ok(result.rows_affected())
}

/// The total quantity across all of the user's cart lines.
pub async fn cart_item_count(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn cart_total(user_id: i64, conn: &mut SqliteConnection) -> Result<Money, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(subtotal), 0) FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(Money::from(total))
}
