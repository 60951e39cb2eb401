//! Session verification against the backend identity endpoint.

use crate::session::{
    types::{AuthResponse, ErrorMessage, LoginRequest},
    Augment, CredentialStore, SessionStore, User,
};
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

const ME_ENDPOINT: &str = "/v1/auth/me";
const LOGIN_ENDPOINT: &str = "/v1/auth/login";
const LOGOUT_ENDPOINT: &str = "/v1/auth/logout";

/// Public view users land on after logout.
pub const LANDING_PATH: &str = "/home";

/// Why a verification attempt did not produce an identity.
///
/// Decoded at the boundary; `check_auth` folds these into its boolean result
/// and never raises them to callers.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("identity endpoint rejected the session: {0}")]
    Rejected(StatusCode),
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("undecodable identity payload: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Validates the current session against the backend and keeps the
/// [`SessionStore`] in sync with the outcome.
///
/// Credentials are attached through an optional [`CredentialStore`] (bearer
/// token) and an optional extra [`Augment`] (cookie relay during server-side
/// rendering). The verifier itself holds no session state; repeated calls are
/// idempotent.
#[derive(Clone)]
pub struct SessionVerifier {
    client: Client,
    base_url: Url,
    store: SessionStore,
    credentials: Option<CredentialStore>,
    augmenter: Option<Arc<dyn Augment>>,
}

impl SessionVerifier {
    #[must_use]
    pub fn new(client: Client, base_url: Url, store: SessionStore) -> Self {
        Self {
            client,
            base_url,
            store,
            credentials: None,
            augmenter: None,
        }
    }

    /// Attach a bearer credential store (client runtime).
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Attach an extra request augmenter (cookie relay during rendering).
    #[must_use]
    pub fn with_augmenter(mut self, augmenter: Arc<dyn Augment>) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Validate the current session with a single "who am I" request.
    ///
    /// On success the store is set to the returned identity and `true` comes
    /// back; on any failure (rejection, transport, undecodable payload) the
    /// store is cleared atomically and `false` comes back. Never raises.
    pub async fn check_auth(&self) -> bool {
        match self.identity().await {
            Ok(user) => {
                self.store.set(user);
                true
            }
            Err(err) => {
                debug!("Session verification failed: {err}");
                self.store.clear();
                false
            }
        }
    }

    /// Authenticate against the backend.
    ///
    /// On 200 the returned access token is stored in the credential store
    /// (when one is attached) and the session store is refreshed through
    /// [`check_auth`](Self::check_auth). Any failure clears credential and
    /// store and resolves to `false`; the backend's `{ message }` is only
    /// logged.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let url = match self.base_url.join(LOGIN_ENDPOINT) {
            Ok(url) => url,
            Err(err) => {
                debug!("Invalid login URL: {err}");
                self.reset();
                return false;
            }
        };

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match self.augment(self.client.post(url).json(&body)).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!("Login transport failure: {err}");
                self.reset();
                return false;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorMessage>()
                .await
                .map_or_else(|_| "no message".to_string(), |body| body.message);
            debug!("Login rejected ({status}): {message}");
            self.reset();
            return false;
        }

        match response.json::<AuthResponse>().await {
            Ok(tokens) => {
                if let Some(credentials) = &self.credentials {
                    credentials.store(SecretString::from(tokens.access_token));
                }
                self.check_auth().await
            }
            Err(err) => {
                debug!("Undecodable login payload: {err}");
                self.reset();
                false
            }
        }
    }

    /// Clear the backend session (best effort), then the local one.
    ///
    /// Returns the public landing path callers should navigate to.
    pub async fn logout(&self) -> &'static str {
        match self.base_url.join(LOGOUT_ENDPOINT) {
            Ok(url) => {
                if let Err(err) = self.augment(self.client.post(url)).send().await {
                    debug!("Logout request failed: {err}");
                }
            }
            Err(err) => debug!("Invalid logout URL: {err}"),
        }

        self.reset();

        LANDING_PATH
    }

    /// Fetch the current identity from the backend, decoded at the boundary.
    ///
    /// This is the typed surface under [`check_auth`](Self::check_auth); the
    /// store is not touched here.
    ///
    /// # Errors
    /// Returns the kind of failure: rejection, transport, or undecodable
    /// payload.
    pub async fn identity(&self) -> Result<User, VerifyError> {
        let url = self.base_url.join(ME_ENDPOINT)?;

        let response = self
            .augment(self.client.get(url))
            .send()
            .await
            .map_err(VerifyError::Transport)?;

        if !response.status().is_success() {
            return Err(VerifyError::Rejected(response.status()));
        }

        response.json::<User>().await.map_err(VerifyError::Decode)
    }

    // Failure cleanup: credential and store are dropped together so no path
    // leaves a stale token behind an unauthenticated session.
    fn reset(&self) {
        if let Some(credentials) = &self.credentials {
            credentials.clear();
        }
        self.store.clear();
    }

    fn augment(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = match &self.credentials {
            Some(credentials) => credentials.augment(request),
            None => request,
        };

        match &self.augmenter {
            Some(augmenter) => augmenter.augment(request),
            None => request,
        }
    }
}
