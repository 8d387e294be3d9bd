//! # Simple Trading Gateway server
//! This crate hosts the HTTP surface of the trading gateway. It is responsible for:
//! * Issuing bearer tokens: machine tokens via HTTP Basic client credentials, and human login
//!   tokens via the Google OAuth2 flow.
//! * Guarding the data and trade endpoints with a bearer-token gate.
//! * Running the trade validation workflow (machine token → floor price → price rule) against the
//!   configured peer services.
//! * Generating synthetic market readings in the background.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! * `/health`: a health check that returns a 200 OK response.
//! * `/auth/token`, `/auth/google`, `/auth/google/callback`: token issuance.
//! * `/data`, `/data/lowest`: bearer-guarded readings.
//! * `/trade`: bearer-guarded trade placement.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod generator;
pub mod helpers;
pub mod middleware;
pub mod oauth;
pub mod routes;
pub mod server;
pub mod workflow;

#[cfg(test)]
mod endpoint_tests;
