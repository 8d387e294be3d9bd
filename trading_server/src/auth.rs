//! The verified identity attached to authenticated requests.
//!
//! The bearer middleware inserts a [`VerifiedIdentity`] into the request's extensions after a
//! successful verification. The binding is scoped to the request; handlers pull it out through
//! the [`FromRequest`] impl, so an unguarded handler that asks for an identity fails closed.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorUnauthorized, FromRequest, HttpMessage, HttpRequest};
use trading_engine::jwt::TokenClaims;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// The token subject: an email address for humans, a client id for machines.
    pub sub: String,
    /// Present on machine tokens only.
    pub client_id: Option<String>,
}

impl From<TokenClaims> for VerifiedIdentity {
    fn from(claims: TokenClaims) -> Self {
        Self { sub: claims.sub, client_id: claims.client_id }
    }
}

impl FromRequest for VerifiedIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<VerifiedIdentity>().cloned().ok_or_else(|| {
            log::warn!("🔐️ No verified identity found in request extensions");
            ErrorUnauthorized("Unauthorized")
        }))
    }
}
