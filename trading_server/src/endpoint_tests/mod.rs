mod auth;
mod data;
mod helpers;
mod mocks;
mod trade;
