//! Bearer credential storage and request augmentation (client side).

use crate::session::Augment;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the opaque bearer token, when one exists.
///
/// Single source of truth for the client credential: login stores it, logout
/// clears it, and every outbound API call is decorated through [`Augment`].
/// Without a token, requests go out unmodified; a 401 from the backend is
/// surfaced to the caller as-is (no silent refresh).
#[derive(Clone, Debug, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<SecretString>>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token.
    pub fn store(&self, token: SecretString) {
        *self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the stored token.
    pub fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Augment for CredentialStore {
    fn augment(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}
