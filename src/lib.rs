//! # Pordisto (Session Gateway & Rendering Shell)
//!
//! `pordisto` sits between a browser and a credit-product backend. It owns the
//! session boundary of the portal: deciding per navigation whether the current
//! session is valid, attaching credentials to outbound API calls, and relaying
//! browser-held session cookies to the backend when pages are produced without
//! a browser present (server-side rendering).
//!
//! ## Components
//!
//! - [`session`] — the gateway library: session store, verifier, route guard,
//!   and the two request augmenters (bearer credential and cookie relay).
//! - [`pordisto`] — the rendering shell: an axum server that proxies `/v1/*`
//!   to the backend verbatim and renders page shells for everything else.
//! - [`cli`] — clap command line, telemetry bootstrap, and action dispatch.
//!
//! ## Session Scoping
//!
//! The session store is never a process-wide singleton on the server side.
//! Every inbound page request gets its own store, verifier, and cookie relay,
//! so two concurrently rendered pages can never observe each other's session.
//! A long-lived store is only appropriate in a single-user client runtime.

pub mod cli;
pub mod pordisto;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
