//! Rendering shell: axum server, reverse proxy, and page shells.

use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{any, get},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use url::Url;

pub(crate) mod handlers;

/// Externally configured knobs of the shell.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    backend_url: Url,
}

impl ShellConfig {
    #[must_use]
    pub fn new(backend_url: Url) -> Self {
        Self { backend_url }
    }

    #[must_use]
    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }
}

/// Shared, immutable state of the shell process.
///
/// Holds configuration and the outbound HTTP client only. Session state is
/// request-scoped and never lives here.
pub struct ShellState {
    config: ShellConfig,
    client: reqwest::Client,
}

impl ShellState {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ShellConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Build the shell router: `/health`, the `/v1` reverse proxy, and the page
/// shell fallback.
///
/// # Errors
/// Returns an error if the shell state cannot be constructed.
pub fn app(config: ShellConfig) -> Result<Router> {
    let state = Arc::new(ShellState::new(config)?);

    let router = Router::new()
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .route("/v1/*rest", any(handlers::proxy::forward))
        .fallback(handlers::pages::render)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        );

    Ok(router)
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, config: ShellConfig) -> Result<()> {
    let app = app(config)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
