//! Page-shell rendering for the portal's views.
//!
//! Every render gets its own session context (store, cookie relay, verifier,
//! guard); nothing session-scoped outlives the request. The guard runs in the
//! prerender environment, which always allows: the page shell is produced and
//! the interactive client re-checks policy after hydration.

use crate::pordisto::ShellState;
use crate::session::{
    Environment, GuardVerdict, RenderAugmenter, RouteGuard, Session, SessionStore, SessionVerifier,
    LANDING_PATH,
};
use axum::{
    extract::Extension,
    http::{HeaderMap, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Route table of the portal, mirroring the client router.
enum Route {
    Redirect(&'static str),
    Public(&'static str),
    Protected(&'static str),
}

fn resolve(path: &str) -> Route {
    match path {
        "/" => Route::Redirect(LANDING_PATH),
        "/home" => Route::Public("Home"),
        "/products" => Route::Public("Products"),
        "/about" => Route::Public("About"),
        "/login" => Route::Public("Sign in"),
        "/dashboard" => Route::Protected("Dashboard"),
        "/profile" => Route::Protected("Profile"),
        path if path == "/cities" || path.starts_with("/cities/") => Route::Protected("Cities"),
        // Wildcard: unknown views land on the public landing page
        _ => Route::Redirect(LANDING_PATH),
    }
}

pub async fn render(state: Extension<Arc<ShellState>>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path();

    match resolve(path) {
        Route::Redirect(to) => Redirect::temporary(to).into_response(),
        Route::Public(title) => Html(page_shell(title, path, &Session::default())).into_response(),
        Route::Protected(title) => {
            // Request-scoped session context; concurrent renders never share it.
            let store = SessionStore::new();
            let relay = Arc::new(RenderAugmenter::from_headers(
                state.config().backend_url().clone(),
                &headers,
            ));
            let verifier = SessionVerifier::new(
                state.client().clone(),
                state.config().backend_url().clone(),
                store.clone(),
            )
            .with_augmenter(relay);

            let guard = RouteGuard::new(verifier.clone());
            if let GuardVerdict::Redirect { location } =
                guard.evaluate(Environment::Prerender, path).await
            {
                return Redirect::temporary(&location).into_response();
            }

            // Hydrate the shell header with the cookie-forwarded identity.
            verifier.check_auth().await;

            Html(page_shell(title, path, &store.current())).into_response()
        }
    }
}

fn page_shell(title: &str, path: &str, session: &Session) -> String {
    let greeting = session.user.as_ref().map_or_else(
        || "<a href=\"/login\">Sign in</a>".to_string(),
        |user| {
            format!(
                "Signed in as {} &lt;{}&gt;",
                escape(&user.user_name),
                escape(&user.email)
            )
        },
    );

    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} · Pordisto</title></head>\n\
         <body data-path=\"{path}\">\n\
         <header>{greeting}</header>\n\
         <main id=\"shell\"><h1>{title}</h1></main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        path = escape(path),
        greeting = greeting,
    )
}

// Backend-supplied values end up in markup; escape the usual suspects.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
