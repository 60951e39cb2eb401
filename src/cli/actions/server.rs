use crate::cli::actions::Action;
use crate::pordisto::{self, ShellConfig};
use anyhow::{bail, Context, Result};
use url::Url;

/// Handle the server action
/// # Errors
/// Returns an error if the backend URL is invalid or the server fails to start
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, backend_url } => {
            let backend_url = Url::parse(&backend_url)
                .with_context(|| format!("Invalid backend URL: {backend_url}"))?;

            if backend_url.cannot_be_a_base() {
                bail!("Backend URL must include a scheme and host: {backend_url}");
            }

            pordisto::new(port, ShellConfig::new(backend_url)).await?;
        }
    }

    Ok(())
}
