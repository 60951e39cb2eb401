//! Navigation gatekeeping for protected views.

use crate::session::SessionVerifier;
use url::form_urlencoded;

/// View the guard redirects unauthenticated navigations to.
pub const LOGIN_PATH: &str = "/login";

/// Where a guarded navigation is being evaluated.
///
/// Passed explicitly by the caller; the guard never introspects global state
/// to discover its environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// A user agent is present and policy must be enforced.
    Interactive,
    /// Non-interactive rendering pass producing a page shell; no user agent.
    Prerender,
}

/// Outcome of a guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    Allow,
    Redirect { location: String },
}

/// Consulted before entering a protected view.
///
/// Prerender passes are always allowed: the goal there is to produce a page
/// shell, and the real check runs again in the interactive environment. This
/// means protected page structure can appear in a prerendered shell; strict
/// server-side authorization is a deliberate non-goal of hybrid rendering.
#[derive(Clone)]
pub struct RouteGuard {
    verifier: SessionVerifier,
}

impl RouteGuard {
    #[must_use]
    pub fn new(verifier: SessionVerifier) -> Self {
        Self { verifier }
    }

    /// Decide whether a navigation to `requested_path` may proceed.
    ///
    /// Interactive evaluations await the verifier; a failed verification
    /// cancels the navigation and redirects to the login view, carrying the
    /// originally requested path as `returnUrl` so login can forward the user
    /// back afterwards.
    pub async fn evaluate(&self, environment: Environment, requested_path: &str) -> GuardVerdict {
        if environment == Environment::Prerender {
            return GuardVerdict::Allow;
        }

        if self.verifier.check_auth().await {
            GuardVerdict::Allow
        } else {
            GuardVerdict::Redirect {
                location: login_redirect(requested_path),
            }
        }
    }
}

/// Login location carrying the originally requested path.
#[must_use]
pub fn login_redirect(requested_path: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("returnUrl", requested_path)
        .finish();

    format!("{LOGIN_PATH}?{query}")
}
