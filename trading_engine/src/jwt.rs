//! Bearer-token signing and verification.
//!
//! Tokens are standard three-segment JWTs signed with HMAC-SHA256 under a single process-wide
//! shared secret. There is no revocation and no refresh; a token is valid until its expiry and
//! not a second longer (verification runs with zero leeway).
//!
//! Verification distinguishes four failure modes so that callers (and tests) can tell them apart,
//! even though the HTTP layer collapses all of them into one generic 401.

use base64::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode,
    encode,
    errors::ErrorKind,
    Algorithm,
    DecodingKey,
    EncodingKey,
    Header,
    Validation,
};
use log::warn;
use serde::{Deserialize, Serialize};
use st_common::Secret;
use thiserror::Error;

/// Fallback signing secret used when no secret has been configured. Deliberately weak; the server
/// logs a loud warning when it is in play.
pub const DEFAULT_JWT_SECRET: &str = "mysecret";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token signature is invalid.")]
    InvalidSignature,
    #[error("Token asserts an unsupported signing algorithm.")]
    UnsupportedAlgorithm,
    #[error("Token has expired.")]
    Expired,
    #[error("Token is not in the correct format. {0}")]
    MalformedToken(String),
}

/// The claims carried by every token issued by this deployment. `client_id` is only present on
/// machine tokens; human login tokens carry the subject (an email address) alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Clone)]
pub struct TokenSigner {
    secret: Secret<String>,
}

impl TokenSigner {
    pub fn new(secret: Secret<String>) -> Self {
        if secret.reveal().is_empty() {
            warn!(
                "🚨️🚨️🚨️ The JWT signing secret has not been set. Falling back to the built-in \
                 default, which every copy of this software knows. DO NOT run a production \
                 instance like this. 🚨️🚨️🚨️"
            );
            return Self { secret: Secret::new(DEFAULT_JWT_SECRET.to_string()) };
        }
        Self { secret }
    }

    /// Issue a signed token for `subject`, valid for `ttl` from now. Machine tokens additionally
    /// carry the client id as a claim.
    pub fn issue(&self, subject: &str, client_id: Option<&str>, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            client_id: client_id.map(String::from),
        };
        let key = EncodingKey::from_secret(self.secret.reveal().as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| TokenError::MalformedToken(e.to_string()))
    }

    /// Validate a token string and return its claims.
    ///
    /// The algorithm check happens before any cryptography: a token whose header asserts anything
    /// other than HS256 is rejected outright, even if it carries a signature that would verify
    /// under that algorithm. This closes the classic algorithm-substitution hole.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let alg = peek_algorithm(token)?;
        if alg != "HS256" {
            return Err(TokenError::UnsupportedAlgorithm);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let key = DecodingKey::from_secret(self.secret.reveal().as_bytes());
        let data = decode::<TokenClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::UnsupportedAlgorithm,
            other => TokenError::MalformedToken(format!("{other:?}")),
        })?;
        Ok(data.claims)
    }
}

/// Read the `alg` field out of the (unverified) token header.
fn peek_algorithm(token: &str) -> Result<String, TokenError> {
    let header_segment = token
        .split('.')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TokenError::MalformedToken("token is empty".to_string()))?;
    let header = base64::decode_config(header_segment, URL_SAFE_NO_PAD)
        .map_err(|e| TokenError::MalformedToken(format!("header is not base64url: {e}")))?;
    let header: serde_json::Value = serde_json::from_slice(&header)
        .map_err(|e| TokenError::MalformedToken(format!("header is not JSON: {e}")))?;
    header
        .get("alg")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| TokenError::MalformedToken("header has no alg field".to_string()))
}
