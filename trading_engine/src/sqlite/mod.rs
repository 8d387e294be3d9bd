//! SQLite backend for the trading gateway engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
