use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer, Scope};
use arcade_engine::{CartApi, CatalogApi, OrderFlowApi, SqliteDatabase};

use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        add_to_cart,
        cart_contains,
        cart_count,
        cart_total,
        checkout,
        clear_cart,
        delete_game,
        delete_order,
        get_cart,
        get_game,
        get_games,
        health,
        my_orders,
        order_by_id,
        post_game,
        put_game,
        remove_cart_item,
        update_cart_item,
        update_order_status,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let cart_api = CartApi::new(db.clone());
        let catalog_api = CatalogApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("nas::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(jwt_signer))
            .service(health)
            .service(api_scope())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// The `/api` routes. Shared between the server proper and the endpoint tests.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(get_games)
        .service(get_game)
        .service(post_game)
        .service(put_game)
        .service(delete_game)
        .service(get_cart)
        .service(cart_total)
        .service(cart_count)
        .service(cart_contains)
        .service(add_to_cart)
        .service(update_cart_item)
        .service(remove_cart_item)
        .service(clear_cart)
        .service(checkout)
        .service(my_orders)
        .service(order_by_id)
        .service(update_order_status)
        .service(delete_order)
}
