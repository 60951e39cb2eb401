//! Cookie relay and URL resolution for server-side rendering.

use crate::session::Augment;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    RequestBuilder,
};
use url::Url;

/// Request augmenter for the rendering shell.
///
/// During server-side page generation no browser is present, so two things the
/// browser would normally do must happen here: relative API paths are resolved
/// against the real backend base URL, and the inbound page request's `Cookie`
/// header is copied onto outbound API calls so the backend sees the same
/// session the browser holds. Built per inbound request; never shared across
/// concurrently rendered pages.
#[derive(Clone, Debug)]
pub struct RenderAugmenter {
    base_url: Url,
    cookie: Option<HeaderValue>,
}

impl RenderAugmenter {
    /// Augmenter with no inbound cookie (anonymous render).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cookie: None,
        }
    }

    /// Capture the `Cookie` header from an inbound page request.
    #[must_use]
    pub fn from_headers(base_url: Url, headers: &HeaderMap) -> Self {
        Self {
            base_url,
            cookie: headers.get(COOKIE).cloned(),
        }
    }

    /// Resolve a relative API path against the backend base URL.
    ///
    /// # Errors
    /// Returns an error if the path does not join into a valid URL.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    #[must_use]
    pub fn cookie(&self) -> Option<&HeaderValue> {
        self.cookie.as_ref()
    }
}

impl Augment for RenderAugmenter {
    fn augment(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }
}
