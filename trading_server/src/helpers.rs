use actix_web::{http::header, HttpRequest};
use log::debug;

/// Extract a client id and secret from an HTTP Basic `Authorization` header.
///
/// Returns `None` on any malformation (missing header, wrong scheme, invalid base64, no colon).
/// Callers treat `None` as an authentication failure, never as an anonymous request.
pub fn basic_credentials(req: &HttpRequest) -> Option<(String, String)> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = base64::decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .or_else(|| {
            debug!("💻️ Basic auth payload is not valid base64-encoded UTF-8");
            None
        })?;
    let (id, secret) = decoded.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}
