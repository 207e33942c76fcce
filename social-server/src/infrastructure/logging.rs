use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Library targets that are noisy at `info`.
const QUIET_TARGETS: &[&str] = &["sqlx=warn", "tower_http=info"];

/// `RUST_LOG` wins when set; otherwise `default_level` applies to this crate
/// and the quiet list caps the libraries.
pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(default_level))
            .unwrap_or_else(|_| EnvFilter::new(default_directives("info"))),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn default_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| target.to_string()));
    directives.join(",")
}
