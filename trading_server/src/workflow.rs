//! The trade validation workflow: a three-hop capability chain.
//!
//! 1. Acquire a machine token from the peer auth service (HTTP Basic client credentials).
//! 2. Present it to the peer data service and fetch the floor price.
//! 3. Enforce the price rule: a trade must be at least half the floor.
//!
//! Identity is re-established on every hop, the hops run strictly in sequence, and a failure at
//! any hop short-circuits with its own reason: a failed token acquisition never reaches the data
//! service. Every outbound call carries a bounded deadline; hitting it counts as a fetch failure.
//! There are no retries: every failure is terminal for the invocation.

use log::debug;
use reqwest::Client;
use st_common::Secret;
use thiserror::Error;

use crate::{
    config::{MachineCredentialConfig, PeerConfig},
    data_objects::{LowestPriceResult, TokenResponse},
};

const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
    #[error("Could not authenticate with the auth service. {0}")]
    AuthenticationFailed(String),
    #[error("Could not fetch the floor price from the data service. {0}")]
    DataFetchFailed(String),
    #[error("The data service response could not be decoded. {0}")]
    DataDecodeFailed(String),
    #[error("Trade price too low; must be at least {minimum:.2}")]
    TradeRejected { minimum: f64 },
}

pub struct TradeValidator {
    client: Client,
    peers: PeerConfig,
    client_id: String,
    client_secret: Secret<String>,
}

impl TradeValidator {
    pub fn new(peers: PeerConfig, machine: MachineCredentialConfig) -> Self {
        let client = Client::builder()
            .user_agent("Simple Trading Gateway")
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to create reqwest client");
        Self { client, peers, client_id: machine.client_id, client_secret: machine.client_secret }
    }

    /// Run the full chain for a candidate trade amount. Returns the floor price the amount was
    /// checked against, so callers can log it.
    pub async fn validate(&self, amount: f64) -> Result<f64, WorkflowError> {
        let token = self.acquire_machine_token().await?;
        let floor = self.fetch_floor_price(&token).await?;
        let minimum = floor / 2.0;
        if amount < minimum {
            return Err(WorkflowError::TradeRejected { minimum });
        }
        Ok(floor)
    }

    pub async fn acquire_machine_token(&self) -> Result<String, WorkflowError> {
        let res = self
            .client
            .get(&self.peers.auth_url)
            .basic_auth(&self.client_id, Some(self.client_secret.reveal()))
            .send()
            .await
            .map_err(|e| WorkflowError::AuthenticationFailed(e.to_string()))?;
        if !res.status().is_success() {
            return Err(WorkflowError::AuthenticationFailed(format!("auth service returned {}", res.status())));
        }
        let token =
            res.json::<TokenResponse>().await.map_err(|e| WorkflowError::AuthenticationFailed(e.to_string()))?;
        debug!("📈️ Acquired machine token for client '{}'", self.client_id);
        Ok(token.access_token)
    }

    pub async fn fetch_floor_price(&self, token: &str) -> Result<f64, WorkflowError> {
        let res = self
            .client
            .get(&self.peers.data_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| WorkflowError::DataFetchFailed(e.to_string()))?;
        if !res.status().is_success() {
            return Err(WorkflowError::DataFetchFailed(format!("data service returned {}", res.status())));
        }
        let quote =
            res.json::<LowestPriceResult>().await.map_err(|e| WorkflowError::DataDecodeFailed(e.to_string()))?;
        debug!("📈️ Floor price over the trailing window is {:.2}", quote.lowest);
        Ok(quote.lowest)
    }
}
