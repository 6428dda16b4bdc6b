use arcade_engine::{
    db_types::NewGame,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CatalogApi,
    SqliteDatabase,
};
use nas_common::Money;

/// Creates a throwaway SQLite database with the full schema applied.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn seed_game(db: &SqliteDatabase, title: &str, price_cents: i64, stock: i64) -> i64 {
    let api = CatalogApi::new(db.clone());
    let game = api
        .add_game(NewGame::new(title, Money::from_cents(price_cents), stock))
        .await
        .expect("Error seeding game");
    game.id
}
