use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Accepts a bare level or any `EnvFilter` directive list such as
/// `warn,textgen_demo=debug`.
pub fn validate_log_level(level: &str) -> Result<()> {
    EnvFilter::try_new(level).map_err(|e| {
        Error::config(format!(
            "Invalid log filter: '{}' ({}). Use a level (error, warn, info, debug, trace) or target=level directives",
            level, e
        ))
    })?;
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
pub fn resolve_level(configured: &str) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| configured.to_string())
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// JSON lines on stdout, for the long-running host.
pub fn init_json(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .json()
        .init();
}

/// Compact lines on stderr, leaving stdout to the generated text.
pub fn init_compact(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
