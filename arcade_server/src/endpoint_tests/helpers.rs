use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use arcade_engine::{
    db_types::NewGame,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CartApi,
    CatalogApi,
    OrderFlowApi,
    SqliteDatabase,
};
use nas_common::{Money, Secret};
use serde::Serialize;

use crate::{
    auth::{Role, TokenIssuer},
    config::AuthConfig,
    routes::health,
    server::api_scope,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("an-endpoint-test-secret-that-is-long-enough".to_string()) }
}

pub fn user_token(user_id: i64) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(user_id, vec![Role::User], None)
}

pub fn admin_token(user_id: i64) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(user_id, vec![Role::User, Role::Admin], None)
}

pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn seed_game(db: &SqliteDatabase, title: &str, price_cents: i64, stock: i64) -> i64 {
    CatalogApi::new(db.clone())
        .add_game(NewGame::new(title, Money::from_cents(price_cents), stock))
        .await
        .expect("Error seeding game")
        .id
}

/// Builds the full app around the given database and sends one request through it.
pub async fn send(db: &SqliteDatabase, req: TestRequest) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(OrderFlowApi::new(db.clone())))
        .app_data(web::Data::new(CartApi::new(db.clone())))
        .app_data(web::Data::new(CatalogApi::new(db.clone())))
        .app_data(web::Data::new(TokenIssuer::new(&test_auth_config())))
        .service(health)
        .service(api_scope());
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn get(path: &str, token: &str) -> TestRequest {
    with_auth(TestRequest::get().uri(path), token)
}

pub fn post<T: Serialize>(path: &str, token: &str, body: &T) -> TestRequest {
    with_auth(TestRequest::post().uri(path).set_json(body), token)
}

pub fn post_empty(path: &str, token: &str) -> TestRequest {
    with_auth(TestRequest::post().uri(path), token)
}

pub fn put<T: Serialize>(path: &str, token: &str, body: &T) -> TestRequest {
    with_auth(TestRequest::put().uri(path).set_json(body), token)
}

pub fn delete(path: &str, token: &str) -> TestRequest {
    with_auth(TestRequest::delete().uri(path), token)
}

fn with_auth(req: TestRequest, token: &str) -> TestRequest {
    if token.is_empty() {
        req
    } else {
        req.insert_header(("Authorization", format!("Bearer {token}")))
    }
}
