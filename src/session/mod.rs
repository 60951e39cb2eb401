//! Session gateway: store, verifier, guard, and request augmenters.
//!
//! The components here implement the portal's session boundary:
//!
//! - [`SessionStore`] holds the current verdict (authenticated + identity) and
//!   notifies subscribers on change.
//! - [`SessionVerifier`] refreshes the store against the backend's
//!   `/v1/auth/me` endpoint and carries the login/logout flows.
//! - [`RouteGuard`] decides whether a navigation may proceed, given an
//!   explicit execution environment.
//! - [`CredentialStore`] (bearer token) and [`RenderAugmenter`] (cookie relay
//!   for server-side rendering) attach credentials to outbound requests
//!   through the [`Augment`] seam.

use reqwest::RequestBuilder;

pub mod credentials;
pub mod guard;
pub mod relay;
pub mod store;
pub mod types;
pub mod verifier;

pub use credentials::CredentialStore;
pub use guard::{Environment, GuardVerdict, RouteGuard, LOGIN_PATH};
pub use relay::RenderAugmenter;
pub use store::{Session, SessionStore, User};
pub use verifier::{SessionVerifier, VerifyError, LANDING_PATH};

/// Attaches credentials to an outbound API request.
///
/// A request leaves unmodified when no credential is available; augmenters
/// never fail, they only decorate.
pub trait Augment: Send + Sync {
    fn augment(&self, request: RequestBuilder) -> RequestBuilder;
}
