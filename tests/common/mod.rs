#![allow(dead_code)]

use club_hub::db;
use diesel_async::{AsyncConnection, AsyncPgConnection};
use std::sync::Once;

const KEY_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

static MIGRATE: Once = Once::new();

/// The database these tests run against, or `None` to skip them.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => {
            MIGRATE.call_once(|| {
                let migrate_url = url.clone();
                std::thread::spawn(move || db::run_migrations_blocking(&migrate_url))
                    .join()
                    .expect("migration thread panicked")
                    .expect("failed to migrate test database");
            });
            Some(url)
        }
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping");
            None
        }
    }
}

/// A connection whose writes are rolled back when it is dropped.
pub async fn test_connection() -> Option<AsyncPgConnection> {
    let url = database_url()?;
    let mut conn = AsyncPgConnection::establish(&url)
        .await
        .expect("failed to connect to test database");
    conn.begin_test_transaction()
        .await
        .expect("failed to begin test transaction");
    Some(conn)
}

/// A short random key for names and emails that must not collide.
pub fn unique() -> String {
    nanoid::nanoid!(10, &KEY_ALPHABET)
}
