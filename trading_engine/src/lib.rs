//! Simple Trading Gateway engine
//!
//! This library contains the transport-agnostic core of the trading gateway:
//! 1. Token signing and verification ([`jwt`]) and machine-credential validation ([`credentials`]).
//!    These are pure, CPU-bound components shared by every service in the deployment.
//! 2. Storage management ([`traits`] and the SQLite backend). You should never need to touch the
//!    database directly; use the API structs ([`DataApi`], [`TradeApi`]) instead. The exception is
//!    the record types, which live in [`db_types`] and are public.
//!
//! Nothing in this crate knows about HTTP. The server crate wires these pieces onto its routes.

pub mod credentials;
pub mod db_types;
pub mod jwt;
pub mod traits;

mod api;
mod sqlite;

pub use api::{DataApi, TradeApi};
pub use sqlite::SqliteDatabase;
