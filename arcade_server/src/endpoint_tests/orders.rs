use actix_web::http::StatusCode;
use arcade_engine::SqliteDatabase;
use serde_json::{json, Value};

use super::helpers::{admin_token, delete, get, new_test_db, post, post_empty, put, seed_game, send, user_token};

async fn checkout_order(db: &SqliteDatabase, user_id: i64) -> i64 {
    let game = seed_game(db, &format!("Test Game {user_id}"), 19_99, 10).await;
    let token = user_token(user_id);
    send(db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 1}))).await;
    let (status, body) = send(db, post_empty("/api/orders/checkout", &token)).await;
    assert_eq!(status, StatusCode::CREATED);
    let order: Value = serde_json::from_str(&body).unwrap();
    order["order"]["id"].as_i64().unwrap()
}

#[actix_web::test]
async fn checkout_and_order_history() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let game = seed_game(&db, "Neon Drift", 59_99, 5).await;
    let token = user_token(1);
    send(&db, post("/api/cart", &token, &json!({"game_id": game, "quantity": 2}))).await;

    let (status, body) = send(&db, post_empty("/api/orders/checkout", &token)).await;
    assert_eq!(status, StatusCode::CREATED);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["order"]["status"], "Pending");
    assert_eq!(order["order"]["total_amount"], 11998);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    let (status, body) = send(&db, get("/api/orders", &token)).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.as_array().unwrap().len(), 1);

    // A second checkout finds an empty cart.
    let (status, body) = send(&db, post_empty("/api/orders/checkout", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("empty cart"));
}

#[actix_web::test]
async fn orders_are_private_to_their_owner() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let order_id = checkout_order(&db, 1).await;

    let (status, _) = send(&db, get(&format!("/api/orders/{order_id}"), &user_token(1))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&db, get(&format!("/api/orders/{order_id}"), &user_token(2))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&db, get(&format!("/api/orders/{order_id}"), &admin_token(100))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&db, get("/api/orders/999", &admin_token(100))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn status_updates_are_admin_only() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let order_id = checkout_order(&db, 1).await;
    let path = format!("/api/orders/{order_id}/status");

    let (status, _) = send(&db, put(&path, &user_token(1), &json!({"status": "Processing"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&db, put(&path, &admin_token(100), &json!({"status": "Processing"}))).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["status"], "Processing");

    let (status, body) = send(&db, put(&path, &admin_token(100), &json!({"status": "Paid"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Paid"));

    send(&db, put(&path, &admin_token(100), &json!({"status": "Completed"}))).await;
    let (status, body) = send(&db, put(&path, &admin_token(100), &json!({"status": "Pending"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("can no longer be modified"));
}

#[actix_web::test]
async fn deletion_rules_over_http() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let order_id = checkout_order(&db, 1).await;
    let path = format!("/api/orders/{order_id}");

    let (status, _) = send(&db, delete(&path, &user_token(1))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    send(&db, put(&format!("{path}/status"), &admin_token(100), &json!({"status": "Completed"}))).await;
    let (status, _) = send(&db, delete(&path, &admin_token(100))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let cancelled = checkout_order(&db, 2).await;
    send(&db, put(&format!("/api/orders/{cancelled}/status"), &admin_token(100), &json!({"status": "Cancelled"})))
        .await;
    let (status, body) = send(&db, delete(&format!("/api/orders/{cancelled}"), &admin_token(100))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("deleted"));

    let (status, _) = send(&db, delete("/api/orders/999", &admin_token(100))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
