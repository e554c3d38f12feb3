//! Client configuration with environment overrides.
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the HTTP transport and artifact persistence.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Global bound on each wire operation; a hung service surfaces as a
    /// transport failure instead of stalling the state machine.
    pub timeout: Duration,
    /// Where fetched care-plan artifacts are written.
    pub artifact_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            artifact_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `ORDER_INTAKE_BASE_URL`,
    /// `ORDER_INTAKE_TIMEOUT_SECS`, `ORDER_INTAKE_ARTIFACT_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        if let Ok(base_url) = env::var("ORDER_INTAKE_BASE_URL") {
            let trimmed = base_url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.to_string();
            }
        }
        if let Ok(raw) = env::var("ORDER_INTAKE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .context("parse ORDER_INTAKE_TIMEOUT_SECS")?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(dir) = env::var("ORDER_INTAKE_ARTIFACT_DIR") {
            if !dir.trim().is_empty() {
                config.artifact_dir = PathBuf::from(dir);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_the_wait() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.base_url, "http://localhost:8000");
    }
}
