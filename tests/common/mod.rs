#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use finance_dashboard::database::db::{migrate::run_migrations, queries::sessions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use uuid::Uuid;

/// Fresh in-memory database with the schema applied. One connection keeps every query on
/// the same memory store for the whole test.
pub async fn pool() -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn user(pool: &Pool<Sqlite>, email: &str) -> Uuid {
    sessions::find_or_create_user(pool, email, email, Utc::now())
        .await
        .unwrap()
}

/// Wednesday, mid-month.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 18, 12, 0, 0).unwrap()
}
