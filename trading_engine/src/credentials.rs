//! Machine (client-credentials) authentication.
//!
//! A deployment recognises exactly one machine identity, loaded from configuration at startup and
//! immutable for the process lifetime. A multi-machine variant would turn the single pair into a
//! map keyed by client id with the same per-entry contract.

use st_common::Secret;

#[derive(Clone, Debug)]
pub struct MachineCredentialStore {
    client_id: String,
    client_secret: Secret<String>,
}

impl MachineCredentialStore {
    pub fn new<S: Into<String>>(client_id: S, client_secret: Secret<String>) -> Self {
        Self { client_id: client_id.into(), client_secret }
    }

    /// Check a submitted id/secret pair against the configured credential. Fails closed: any
    /// mismatch returns `false`, and empty values (submitted or configured) never authenticate.
    pub fn authenticate(&self, client_id: &str, client_secret: &str) -> bool {
        if client_id.is_empty() || client_secret.is_empty() {
            return false;
        }
        if self.client_id.is_empty() || self.client_secret.reveal().is_empty() {
            return false;
        }
        client_id == self.client_id && client_secret == self.client_secret.reveal()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}
