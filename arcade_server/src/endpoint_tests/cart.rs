use actix_web::http::StatusCode;
use serde_json::{json, Value};

use super::helpers::{delete, get, new_test_db, post, put, seed_game, send, user_token};

#[actix_web::test]
async fn cart_crud_over_http() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let game = seed_game(&db, "Circuit Breaker", 12_50, 10).await;
    let token = user_token(1);

    let (status, body) = send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    let item: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["subtotal"], 2500);

    let (status, body) = send(&db, get("/api/cart", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let cart: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(cart.as_array().unwrap().len(), 1);

    let (status, body) = send(&db, put(&format!("/api/cart/{game}"), &token, &json!({"quantity": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    let item: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(item["subtotal"], 6250);

    let (status, _) = send(&db, delete(&format!("/api/cart/{game}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&db, delete(&format!("/api/cart/{game}"), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 1}))).await;
    let (status, body) = send(&db, delete("/api/cart", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Removed 1 lines"));
    let (_, body) = send(&db, get("/api/cart", &token)).await;
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn cart_rollups_over_http() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let game = seed_game(&db, "Tally Up", 10_00, 10).await;
    let other = seed_game(&db, "Side Quest", 5_00, 10).await;
    let token = user_token(1);
    send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 2}))).await;
    send(&db, post("/api/cart", &token, &json!({"game_id": other, "quantity": 1}))).await;

    let (status, body) = send(&db, get("/api/cart/total", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let total: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(total["total"], 2500);

    let (status, body) = send(&db, get("/api/cart/count", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let count: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(count["count"], 3);

    let (status, body) = send(&db, get(&format!("/api/cart/check/{game}"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    let check: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(check["game_id"], game);
    assert_eq!(check["in_cart"], true);
    let (_, body) = send(&db, get("/api/cart/check/999", &token)).await;
    let check: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(check["in_cart"], false);

    // The rollups are per-user and authenticated like the rest of the cart.
    let (status, _) = send(&db, get("/api/cart/count", "")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, body) = send(&db, get("/api/cart/total", &user_token(2))).await;
    let total: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(total["total"], 0);
}

#[actix_web::test]
async fn cart_validation_over_http() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let game = seed_game(&db, "Hidden Gem", 14_00, 3).await;
    let token = user_token(1);

    let (status, _) = send(&db, post("/api/cart", &token, &json!({"game_id": 999, "quantity": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Quantity must be at least 1"));

    let (status, body) = send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 4}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Insufficient stock"));
}

#[actix_web::test]
async fn carts_are_scoped_to_the_token() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let game = seed_game(&db, "Split Screen", 22_00, 10).await;
    send(&db, post("/api/cart", &user_token(1), &json!({"game_id": game, "quantity": 1}))).await;

    let (status, body) = send(&db, get("/api/cart", &user_token(2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}
