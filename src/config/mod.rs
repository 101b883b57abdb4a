mod types;

pub use types::*;

use crate::Result;
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

pub const API_URL_VAR: &str = "TEXTGEN_API_URL";
pub const API_KEY_VAR: &str = "TEXTGEN_API_KEY";

/// Loads the YAML file named by `CONFIG_PATH` (default `config.yaml`) and
/// applies environment overrides on top.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;
    apply_overrides(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// A missing file yields the defaults; a file that exists must parse.
pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    match tokio::fs::read_to_string(path).await {
        Ok(config_str) => Ok(serde_yaml::from_str(&config_str)?),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No configuration file at {}, using defaults", path.display());
            Ok(Config::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Empty values are ignored so an exported-but-blank variable does not wipe
/// the configured value.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.is_empty()) {
        config.client.base_url = url;
    }
    if let Some(key) = lookup(API_KEY_VAR).filter(|v| !v.is_empty()) {
        config.client.api_key = key;
    }
}
