//! Bridge to the third-party identity provider (Google OAuth2).
//!
//! The provider configuration is an explicit object handed to the bridge at construction; there
//! is no process-global OAuth state. The code exchange performs two sequential outbound calls
//! with no retry: a transient provider failure surfaces immediately to the caller.

use std::env;

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use st_common::Secret;
use thiserror::Error;
use url::Url;

pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

// https://developers.google.com/identity/protocols/oauth2/scopes#oauth2
const SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.profile https://www.googleapis.com/auth/userinfo.email";

const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Clone, Error)]
pub enum OAuthError {
    #[error("Code exchange with the identity provider failed. {0}")]
    ExchangeFailed(String),
    #[error("Could not fetch the user profile from the identity provider. {0}")]
    ProfileFetchFailed(String),
    #[error("The identity provider's profile document carries no email address.")]
    ProfileMissingEmail,
    #[error("Invalid identity provider configuration. {0}")]
    Configuration(String),
}

#[derive(Clone, Debug)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub redirect_uri: String,
    /// Provider endpoints. These default to Google's and only change in tests.
    pub auth_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
}

impl Default for OAuthProviderConfig {
    fn default() -> Self {
        Self {
            client_id: String::default(),
            client_secret: Secret::default(),
            redirect_uri: String::default(),
            auth_endpoint: GOOGLE_AUTH_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            userinfo_endpoint: GOOGLE_USERINFO_ENDPOINT.to_string(),
        }
    }
}

impl OAuthProviderConfig {
    pub fn from_env_or_default() -> Self {
        let client_id = env::var("ST_GOOGLE_CLIENT_ID").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_GOOGLE_CLIENT_ID is not set. The Google login flow will not work.");
            String::default()
        });
        let client_secret = env::var("ST_GOOGLE_CLIENT_SECRET").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_GOOGLE_CLIENT_SECRET is not set. The Google login flow will not work.");
            String::default()
        });
        let redirect_uri = env::var("ST_GOOGLE_REDIRECT_URI").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_GOOGLE_REDIRECT_URI is not set. The Google login flow will not work.");
            String::default()
        });
        Self { client_id, client_secret: Secret::new(client_secret), redirect_uri, ..Default::default() }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderToken {
    access_token: String,
}

pub struct GoogleOAuthBridge {
    client: Client,
    config: OAuthProviderConfig,
}

impl GoogleOAuthBridge {
    pub fn new(config: OAuthProviderConfig) -> Self {
        let client = Client::builder()
            .user_agent("Simple Trading Gateway")
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to create reqwest client");
        Self { client, config }
    }

    /// The provider authorization URL for this deployment. Deterministic; performs no I/O.
    pub fn authorization_url(&self, state: &str) -> Result<Url, OAuthError> {
        let mut url =
            Url::parse(&self.config.auth_endpoint).map_err(|e| OAuthError::Configuration(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPES)
            .append_pair("access_type", "offline")
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for the user's email address.
    ///
    /// Two blocking round trips, in order: the code-for-access-token exchange, then the profile
    /// fetch. An incomplete profile is an error; an empty identity is never substituted.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.reveal().as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let res = self
            .client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;
        if !res.status().is_success() {
            return Err(OAuthError::ExchangeFailed(format!("provider returned {}", res.status())));
        }
        let token =
            res.json::<ProviderToken>().await.map_err(|e| OAuthError::ExchangeFailed(e.to_string()))?;
        debug!("🔑️ Code exchange succeeded, fetching user profile");

        let res = self
            .client
            .get(&self.config.userinfo_endpoint)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::ProfileFetchFailed(e.to_string()))?;
        if !res.status().is_success() {
            return Err(OAuthError::ProfileFetchFailed(format!("provider returned {}", res.status())));
        }
        let profile =
            res.json::<serde_json::Value>().await.map_err(|e| OAuthError::ProfileFetchFailed(e.to_string()))?;
        profile
            .get("email")
            .and_then(|v| v.as_str())
            .filter(|email| !email.is_empty())
            .map(String::from)
            .ok_or(OAuthError::ProfileMissingEmail)
    }
}
