use chrono::Utc;
use log::debug;
use nas_common::Money;
use sqlx::SqliteConnection;

use crate::db_types::{NewOrderItem, Order, OrderItem, OrderNumber, OrderStatusType};

/// Inserts a new order row. The unique index on `order_number` makes a collision fail loudly rather than
/// overwrite; callers should treat that as a retryable persistence failure.
pub async fn insert_order(
    order_number: &OrderNumber,
    user_id: i64,
    total_amount: Money,
    conn: &mut SqliteConnection,
) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (order_number, user_id, status, order_date, total_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order_number.as_str())
    .bind(user_id)
    .bind(OrderStatusType::Pending)
    .bind(Utc::now())
    .bind(total_amount)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{order_number}] inserted with id {}", order.id);
    Ok(order)
}

pub async fn insert_order_item(
    order_id: i64,
    item: NewOrderItem,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, game_id, price, quantity, subtotal, game_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(item.game_id)
    .bind(item.price)
    .bind(item.quantity)
    .bind(item.subtotal)
    .bind(item.game_key)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE order_number = $1")
        .bind(number.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Returns all orders for the user, most recent first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY order_date DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub async fn update_order_status(
    order_id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(order_id)
            .fetch_optional(conn)
            .await?;
    Ok(order)
}

/// Removes an order and its line items. Line items are deleted explicitly so the operation does not depend on
/// the connection having foreign-key enforcement switched on.
pub async fn delete_order(order_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM order_items WHERE order_id = $1").bind(order_id).execute(&mut *conn).await?;
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(order_id).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Whether the given error is a unique-constraint violation, e.g. an order-number collision.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
