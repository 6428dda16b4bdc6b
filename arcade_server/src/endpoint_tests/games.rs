use actix_web::http::StatusCode;
use serde_json::{json, Value};

use super::helpers::{admin_token, delete, get, new_test_db, post, put, seed_game, send, user_token};

#[actix_web::test]
async fn catalog_is_public() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let neon = seed_game(&db, "Neon Drift", 59_99, 5).await;
    seed_game(&db, "Pixel Siege", 25_00, 10).await;

    let (status, body) = send(&db, get("/api/games", "")).await;
    assert_eq!(status, StatusCode::OK);
    let games: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(games.as_array().unwrap().len(), 2);

    let (status, body) = send(&db, get(&format!("/api/games/{neon}"), "")).await;
    assert_eq!(status, StatusCode::OK);
    let game: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(game["title"], "Neon Drift");
    assert_eq!(game["price"], 5999);

    let (status, _) = send(&db, get("/api/games/999", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn catalog_search_filters_by_title() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    seed_game(&db, "Neon Drift", 59_99, 5).await;
    seed_game(&db, "Pixel Siege", 25_00, 10).await;

    let (status, body) = send(&db, get("/api/games?search_term=neon", "")).await;
    assert_eq!(status, StatusCode::OK);
    let games: Value = serde_json::from_str(&body).unwrap();
    let games = games.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["title"], "Neon Drift");
}

#[actix_web::test]
async fn catalog_mutation_requires_admin() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let new_game = json!({
        "title": "Mod Tools",
        "description": "",
        "price": 12_00,
        "stock_quantity": 3,
        "is_available": true,
    });

    let (status, _) = send(&db, post("/api/games", "", &new_game)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&db, post("/api/games", &user_token(1), &new_game)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&db, post("/api/games", &admin_token(100), &new_game)).await;
    assert_eq!(status, StatusCode::CREATED);
    let game: Value = serde_json::from_str(&body).unwrap();
    let id = game["id"].as_i64().unwrap();

    let (status, body) = send(&db, put(&format!("/api/games/{id}"), &admin_token(100), &json!({"price": 9_99}))).await;
    assert_eq!(status, StatusCode::OK);
    let game: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(game["price"], 999);

    let (status, _) = send(&db, delete(&format!("/api/games/{id}"), &user_token(1))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&db, delete(&format!("/api/games/{id}"), &admin_token(100))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&db, get(&format!("/api/games/{id}"), "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_games_are_rejected() {
    let _ = env_logger::try_init();
    let db = new_test_db().await;
    let bad = json!({
        "title": "  ",
        "description": "",
        "price": 10_00,
        "stock_quantity": 1,
        "is_available": true,
    });
    let (status, body) = send(&db, post("/api/games", &admin_token(100), &bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Title cannot be empty"));

    let negative = json!({"price": -100});
    let game = seed_game(&db, "Priced Right", 10_00, 1).await;
    let (status, _) = send(&db, put(&format!("/api/games/{game}"), &admin_token(100), &negative)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
