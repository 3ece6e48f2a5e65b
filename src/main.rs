//! CodeCamp API server
//!
//! Reads its configuration from `$CODECAMP_CONFIG`, falling back to
//! `config/codecamp.yaml` when that file exists and to built-in defaults
//! otherwise. `RUST_LOG` overrides the configured log filter.

use anyhow::Result;
use codecamp::prelude::*;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "CODECAMP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/codecamp.yaml";

fn load_config() -> Result<ConfigHandle> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => ConfigHandle::from_file(path),
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            ConfigHandle::from_file(DEFAULT_CONFIG_PATH)
        }
        Err(_) => Ok(ConfigHandle::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.current().logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match config.source() {
        Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
        None => tracing::info!("using default configuration"),
    }

    ServerBuilder::new().with_config(config).serve().await
}
