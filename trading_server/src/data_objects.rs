//! Wire types for the REST endpoints.

use serde::{Deserialize, Serialize};

/// Body of a successful machine token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Body of a successful human login (OAuth callback).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of a successful floor price query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LowestPriceResult {
    pub lowest: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DataQueryParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TradeParams {
    pub amount: f64,
}

/// Query parameters the identity provider appends to the callback redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    pub status: String,
}
