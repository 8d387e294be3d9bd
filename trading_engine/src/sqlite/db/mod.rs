//! # SQLite database methods
//!
//! Low-level SQLite interactions, kept as simple functions that accept a `&mut SqliteConnection`.
//! Callers obtain a connection from the pool (or open a transaction) and call through without any
//! other ceremony.
//!
//! The schema is created idempotently when the pool is built; there is no separate migration step
//! for a store this small.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod data_points;
pub mod trades;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS data_points (\
        id INTEGER PRIMARY KEY AUTOINCREMENT,\
        value REAL NOT NULL,\
        timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\
    )",
    "CREATE TABLE IF NOT EXISTS trades (\
        id INTEGER PRIMARY KEY AUTOINCREMENT,\
        user_id TEXT NOT NULL,\
        price REAL NOT NULL,\
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\
    )",
];

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
