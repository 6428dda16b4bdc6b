//! Construction helpers for order numbers and per-line redemption keys.

use chrono::Utc;
use rand::Rng;

/// Generate a new order number in the form `ORD-<yyyyMMdd>-<8 uppercase hex chars>`, with the date taken in UTC.
///
/// The random suffix makes collisions vanishingly unlikely within a day, but the database's unique index on
/// `order_number` is the actual guarantee. An insert that does collide fails loudly and the caller may retry the
/// whole checkout, which generates a fresh number.
pub fn new_order_number() -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("ORD-{}-{suffix:08X}", Utc::now().format("%Y%m%d"))
}

/// Mint a redemption key for an order line: `<game_id>-<32 uppercase hex chars>`.
///
/// The key stands in for an activation code, so it must be unguessable; 128 bits of randomness from the thread
/// RNG covers that. Uniqueness per line is backed by a unique index.
pub fn new_game_key(game_id: i64) -> String {
    let token: u128 = rand::thread_rng().gen();
    format!("{game_id}-{token:032X}")
}
