pub mod connection;
pub mod history;
pub mod reservations;
pub mod rooms;
pub mod seed;
pub mod users;

pub use connection::{init_db, Database};

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generate a record id like `reservation_1756100000_k3f9x2m1q`:
/// prefix, creation time, random suffix so ids can't collide.
pub fn fresh_id(prefix: &str, now: i64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("{prefix}_{now}_{}", suffix.to_lowercase())
}
