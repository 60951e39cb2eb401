//! Reverse proxy for browser-initiated API calls.

use crate::pordisto::ShellState;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{header, HeaderMap, HeaderName, Request, Response, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

/// Forward a `/v1/...` request to the backend and return its response
/// verbatim (status, headers, body). Cookies ride along untouched, so the
/// backend sees the same session the browser holds. Bodies are streamed in
/// both directions; the proxy never buffers or caps a payload.
pub async fn forward(
    state: Extension<Arc<ShellState>>,
    request: Request<Body>,
) -> axum::response::Response {
    match relay(&state, request).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            error!("Failed to proxy request to backend: {err}");

            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

async fn relay(state: &ShellState, request: Request<Body>) -> Result<Response<Body>> {
    let (parts, body) = request.into_parts();

    let mut target = state
        .config()
        .backend_url()
        .join(parts.uri.path())
        .context("Failed to resolve backend target")?;
    target.set_query(parts.uri.query());

    let upstream = state
        .client()
        .request(parts.method, target)
        .headers(forwardable(&parts.headers))
        .body(reqwest::Body::wrap_stream(body.into_data_stream()))
        .send()
        .await
        .context("Backend request failed")?;

    let status = upstream.status();
    let headers = forwardable(upstream.headers());

    let mut builder = Response::builder().status(status);
    if let Some(response_headers) = builder.headers_mut() {
        *response_headers = headers;
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .context("Failed to build proxied response")
}

/// Copy of `headers` without hop-by-hop and transport-managed entries.
fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut copied = HeaderMap::new();

    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            copied.append(name.clone(), value.clone());
        }
    }

    copied
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::CONNECTION
        || *name == header::TE
        || *name == header::TRAILER
        || *name == header::TRANSFER_ENCODING
        || *name == header::UPGRADE
        || *name == header::PROXY_AUTHENTICATE
        || *name == header::PROXY_AUTHORIZATION
        || *name == header::HOST
        || *name == header::CONTENT_LENGTH
        || name.as_str().eq_ignore_ascii_case("keep-alive")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_and_content_headers_survive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=abc123"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::HOST, HeaderValue::from_static("shell.local"));

        let copied = forwardable(&headers);

        assert_eq!(
            copied.get(header::COOKIE),
            Some(&HeaderValue::from_static("sid=abc123"))
        );
        assert_eq!(
            copied.get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert!(copied.get(header::CONNECTION).is_none());
        assert!(copied.get(header::HOST).is_none());
    }

    #[test]
    fn test_repeated_headers_are_kept() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let copied = forwardable(&headers);

        assert_eq!(copied.get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
