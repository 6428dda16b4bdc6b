//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are async and never block the worker thread; all I/O goes through the engine APIs. Authentication
//! happens in the [`JwtClaims`](crate::auth::JwtClaims) extractor, so a handler that takes a `JwtClaims`
//! argument only ever runs for a caller with a valid token. Admin-only handlers call
//! [`JwtClaims::require_admin`] before touching the backend.
use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use arcade_engine::{
    db_types::{GameUpdate, NewGame, OrderStatusType},
    CartApi,
    CartError,
    CatalogApi,
    GameQueryFilter,
    OrderFlowApi,
    OrderFlowError,
    SqliteDatabase,
};
use log::*;
use serde_json::json;

use crate::{
    auth::JwtClaims,
    data_objects::{AddToCartRequest, JsonResponse, UpdateCartItemRequest, UpdateOrderStatusRequest},
    errors::ServerError,
};

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
#[get("/games")]
pub async fn get_games(
    query: web::Query<GameQueryFilter>,
    api: web::Data<CatalogApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let filter = query.into_inner();
    debug!("💻️ GET games with filter {filter:?}");
    let games = api.search(filter).await?;
    Ok(HttpResponse::Ok().json(games))
}

#[get("/games/{id}")]
pub async fn get_game(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let game_id = path.into_inner();
    debug!("💻️ GET game {game_id}");
    match api.game(game_id).await? {
        Some(game) => Ok(HttpResponse::Ok().json(game)),
        None => Err(arcade_engine::CatalogError::GameNotFound(game_id).into()),
    }
}

#[post("/games")]
pub async fn post_game(
    claims: JwtClaims,
    body: web::Json<NewGame>,
    api: web::Data<CatalogApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let game = api.add_game(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(game))
}

#[put("/games/{id}")]
pub async fn put_game(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<GameUpdate>,
    api: web::Data<CatalogApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let game = api.update_game(path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(game))
}

#[delete("/games/{id}")]
pub async fn delete_game(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let game_id = path.into_inner();
    api.remove_game(game_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Game {game_id} removed from the catalog."))))
}

//----------------------------------------------   Cart  ----------------------------------------------------
#[get("/cart")]
pub async fn get_cart(
    claims: JwtClaims,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET cart for user {}", claims.user_id);
    let cart = api.cart(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

#[get("/cart/total")]
pub async fn cart_total(
    claims: JwtClaims,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let total = api.cart_total(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "total": total })))
}

#[get("/cart/count")]
pub async fn cart_count(
    claims: JwtClaims,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let count = api.cart_item_count(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[get("/cart/check/{game_id}")]
pub async fn cart_contains(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let game_id = path.into_inner();
    let in_cart = api.game_in_cart(claims.user_id, game_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "game_id": game_id, "in_cart": in_cart })))
}

#[post("/cart")]
pub async fn add_to_cart(
    claims: JwtClaims,
    body: web::Json<AddToCartRequest>,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let AddToCartRequest { game_id, quantity } = body.into_inner();
    let item = api.add_to_cart(claims.user_id, game_id, quantity).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[put("/cart/{game_id}")]
pub async fn update_cart_item(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<UpdateCartItemRequest>,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let item = api.update_quantity(claims.user_id, path.into_inner(), body.quantity).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[delete("/cart/{game_id}")]
pub async fn remove_cart_item(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let game_id = path.into_inner();
    if !api.remove_from_cart(claims.user_id, game_id).await? {
        return Err(CartError::ItemNotInCart(game_id).into());
    }
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Game {game_id} removed from the cart."))))
}

#[delete("/cart")]
pub async fn clear_cart(
    claims: JwtClaims,
    api: web::Data<CartApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let removed = api.clear_cart(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Removed {removed} lines from the cart."))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
#[post("/orders/checkout")]
pub async fn checkout(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST checkout for user {}", claims.user_id);
    let order = api.checkout(claims.user_id).await?;
    Ok(HttpResponse::Created().json(order))
}

#[get("/orders")]
pub async fn my_orders(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for user {}", claims.user_id);
    let orders = api.fetch_orders_for_user(claims.user_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Users may only read their own orders. Admins may read any order.
#[get("/orders/{id}")]
pub async fn order_by_id(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let order = api.fetch_order_with_items(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
    if order.order.user_id != claims.user_id && !claims.is_admin() {
        return Err(ServerError::InsufficientPermissions("You may only view your own orders.".to_string()));
    }
    Ok(HttpResponse::Ok().json(order))
}

#[put("/orders/{id}/status")]
pub async fn update_order_status(
    claims: JwtClaims,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderStatusRequest>,
    api: web::Data<OrderFlowApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let order_id = path.into_inner();
    let new_status =
        OrderStatusType::from_str(&body.status).map_err(|e| ServerError::from(OrderFlowError::InvalidStatus(e)))?;
    let order = api.update_status(order_id, new_status).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[delete("/orders/{id}")]
pub async fn delete_order(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<SqliteDatabase>>,
) -> Result<HttpResponse, ServerError> {
    claims.require_admin()?;
    let order = api.delete_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order [{}] deleted.", order.order_number))))
}
