use actix_web::{http::StatusCode, test::TestRequest};
use chrono::Duration;

use super::helpers::{get, new_test_db, send, test_auth_config, user_token};
use crate::auth::{Role, TokenIssuer};

#[actix_web::test]
async fn health_needs_no_auth() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let (status, body) = send(&db, get("/health", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let (status, body) = send(&db, get("/api/cart", "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"));
}

#[actix_web::test]
async fn non_bearer_header_is_rejected() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let req = TestRequest::get().uri("/api/cart").insert_header(("Authorization", "Basic dXNlcjpwdw=="));
    let (status, _) = send(&db, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn tampered_token_is_unauthorized() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let mut token = user_token(1);
    let n = token.len();
    token.replace_range(n - 6..n - 1, "AAAAA");
    let (status, _) = send(&db, get("/api/cart", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_token_is_unauthorized() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let token = TokenIssuer::new(&test_auth_config()).issue_token(1, vec![Role::User], Some(Duration::seconds(-5)));
    let (status, body) = send(&db, get("/api/cart", &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("expired"));
}
