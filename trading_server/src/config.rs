use std::env;

use log::*;
use st_common::Secret;

use crate::oauth::OAuthProviderConfig;

const DEFAULT_ST_HOST: &str = "127.0.0.1";
const DEFAULT_ST_PORT: u16 = 8080;
const DEFAULT_ST_DATABASE_URL: &str = "sqlite://trading.db";
const DEFAULT_CLIENT_ID: &str = "myclientid";
const DEFAULT_CLIENT_SECRET: &str = "myclientsecret";
const DEFAULT_AUTH_URL: &str = "http://localhost:8080/auth/token";
const DEFAULT_DATA_URL: &str = "http://localhost:8080/data/lowest";
const DEFAULT_GENERATOR_INTERVAL_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// The one machine identity this deployment recognises. It doubles as the credential the
    /// trade workflow presents to the peer auth service.
    pub machine: MachineCredentialConfig,
    pub oauth: OAuthProviderConfig,
    pub peers: PeerConfig,
    /// How often the synthetic data generator inserts a reading.
    pub generator_interval: std::time::Duration,
}

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// The shared secret used to sign and verify bearer tokens. An empty value makes the signer
    /// fall back to its built-in (weak, documented) default.
    pub jwt_secret: Secret<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MachineCredentialConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

/// Base URLs of the peer services the trade workflow calls.
#[derive(Clone, Debug, Default)]
pub struct PeerConfig {
    pub auth_url: String,
    pub data_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ST_HOST.to_string(),
            port: DEFAULT_ST_PORT,
            database_url: DEFAULT_ST_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            machine: MachineCredentialConfig {
                client_id: DEFAULT_CLIENT_ID.to_string(),
                client_secret: Secret::new(DEFAULT_CLIENT_SECRET.to_string()),
            },
            oauth: OAuthProviderConfig::default(),
            peers: PeerConfig { auth_url: DEFAULT_AUTH_URL.to_string(), data_url: DEFAULT_DATA_URL.to_string() },
            generator_interval: std::time::Duration::from_secs(DEFAULT_GENERATOR_INTERVAL_SECS),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ST_HOST").ok().unwrap_or_else(|| DEFAULT_ST_HOST.into());
        let port = env::var("ST_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for ST_PORT. {e} Using the default, {DEFAULT_ST_PORT}, instead.");
                    DEFAULT_ST_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ST_PORT);
        let database_url = env::var("ST_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ST_DATABASE_URL is not set. Using the default, {DEFAULT_ST_DATABASE_URL}.");
            DEFAULT_ST_DATABASE_URL.to_string()
        });
        let jwt_secret = env::var("ST_JWT_SECRET").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_JWT_SECRET is not set. The token signer will fall back to its built-in default.");
            String::default()
        });
        let machine = MachineCredentialConfig::from_env_or_default();
        let oauth = OAuthProviderConfig::from_env_or_default();
        let peers = PeerConfig::from_env_or_default();
        let generator_interval = env::var("ST_GENERATOR_INTERVAL_SECS")
            .map_err(|_| {
                info!(
                    "🪛️ ST_GENERATOR_INTERVAL_SECS is not set. Using the default value of \
                     {DEFAULT_GENERATOR_INTERVAL_SECS} seconds."
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for ST_GENERATOR_INTERVAL_SECS. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_GENERATOR_INTERVAL_SECS);
        Self {
            host,
            port,
            database_url,
            auth: AuthConfig { jwt_secret: Secret::new(jwt_secret) },
            machine,
            oauth,
            peers,
            generator_interval: std::time::Duration::from_secs(generator_interval),
        }
    }
}

impl MachineCredentialConfig {
    pub fn from_env_or_default() -> Self {
        let client_id = env::var("ST_CLIENT_ID").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_CLIENT_ID is not set. Using the default, {DEFAULT_CLIENT_ID}.");
            DEFAULT_CLIENT_ID.to_string()
        });
        let client_secret = env::var("ST_CLIENT_SECRET").ok().unwrap_or_else(|| {
            warn!("🪛️ ST_CLIENT_SECRET is not set. Using the default. DO NOT do this in production.");
            DEFAULT_CLIENT_SECRET.to_string()
        });
        Self { client_id, client_secret: Secret::new(client_secret) }
    }
}

impl PeerConfig {
    pub fn from_env_or_default() -> Self {
        let auth_url = env::var("ST_AUTH_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ST_AUTH_URL is not set. Using the default, {DEFAULT_AUTH_URL}.");
            DEFAULT_AUTH_URL.to_string()
        });
        let data_url = env::var("ST_DATA_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ST_DATA_URL is not set. Using the default, {DEFAULT_DATA_URL}.");
            DEFAULT_DATA_URL.to_string()
        });
        Self { auth_url, data_url }
    }
}
