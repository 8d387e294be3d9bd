//! Bearer-token gate for Actix Web.
//!
//! Wrap any route or service with this middleware to require a valid bearer token. The gate runs
//! a fixed sequence per request: extract the `Authorization` header, require the exact `Bearer `
//! scheme prefix, verify the token with the app's [`TokenSigner`]. A header that holds the raw
//! token without the prefix is rejected, not silently accepted.
//!
//! Every rejection is a 401 with the same generic body; the specific reason only goes to the
//! debug log so the response cannot be used as a verification oracle.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorInternalServerError, ErrorUnauthorized},
    http::header,
    web,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, error, trace};
use trading_engine::jwt::TokenSigner;

use crate::auth::VerifiedIdentity;

pub struct BearerAuthMiddlewareFactory;

impl BearerAuthMiddlewareFactory {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        BearerAuthMiddlewareFactory
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = BearerAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddlewareService { service: Rc::new(service) }))
    }
}

pub struct BearerAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            trace!("🔐️ Checking bearer token for request");
            let signer = req.app_data::<web::Data<TokenSigner>>().cloned().ok_or_else(|| {
                error!("🔐️ No token signer registered on the app. Cannot verify bearer tokens.");
                ErrorInternalServerError("internal server error")
            })?;
            let header = req.headers().get(header::AUTHORIZATION).ok_or_else(|| {
                debug!("🔐️ Missing Authorization header. Denying access.");
                ErrorUnauthorized("Unauthorized")
            })?;
            let header = header.to_str().map_err(|_| {
                debug!("🔐️ Authorization header is not valid UTF-8. Denying access.");
                ErrorUnauthorized("Unauthorized")
            })?;
            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                debug!("🔐️ Authorization header does not use the Bearer scheme. Denying access.");
                ErrorUnauthorized("Unauthorized")
            })?;
            let claims = signer.verify(token).map_err(|e| {
                debug!("🔐️ Token verification failed ({e}). Denying access.");
                ErrorUnauthorized("Unauthorized")
            })?;
            trace!("🔐️ Bearer token for {} ✅️", claims.sub);
            req.extensions_mut().insert(VerifiedIdentity::from(claims));
            service.call(req).await
        })
    }
}
