//! Logging setup for the CLI
//!
//! Verbosity flags map to a default level filter; the `YAMLATE_LOG`
//! environment variable takes precedence and accepts full tracing filter
//! directives.

use crate::error::{Error, Result};
use tracing_subscriber::EnvFilter;

const ENV_VAR: &str = "YAMLATE_LOG";

/// Initialize the global tracing subscriber
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = build_filter(verbosity, quiet)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::other(format!("failed to set logging subscriber: {}", e)))?;

    Ok(())
}

fn build_filter(verbosity: u8, quiet: bool) -> Result<EnvFilter> {
    if quiet {
        return Ok(EnvFilter::new("error"));
    }
    if std::env::var(ENV_VAR).is_ok() {
        return EnvFilter::try_from_env(ENV_VAR)
            .map_err(|e| Error::config(format!("invalid {} filter: {}", ENV_VAR, e)));
    }
    Ok(EnvFilter::new(default_level(verbosity)))
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
