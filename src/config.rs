//! Client and monitor configuration
//!
//! Values come from the process environment, after loading a `.env` file if
//! one is present.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const API_URL_ENV: &str = "CROSSCHAIN_API_URL";
pub const API_KEY_ENV: &str = "CROSSCHAIN_API_KEY";
pub const MAX_ATTEMPTS_ENV: &str = "MONITOR_MAX_ATTEMPTS";
pub const INTERVAL_MS_ENV: &str = "MONITOR_INTERVAL_MS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the swap API, without a trailing path
    pub api_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var(API_URL_ENV)
            .with_context(|| format!("{} must be set", API_URL_ENV))?;
        let api_key = env::var(API_KEY_ENV)
            .with_context(|| format!("{} must be set", API_KEY_ENV))?;

        Ok(Self { api_url, api_key })
    }
}

/// Attempt budget and pacing of the transaction monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_millis(5000),
        }
    }
}

impl MonitorConfig {
    /// Defaults, overridden by `MONITOR_MAX_ATTEMPTS` / `MONITOR_INTERVAL_MS`
    /// when set.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_ATTEMPTS_ENV) {
            config.max_attempts = raw
                .parse()
                .with_context(|| format!("Invalid {}: {}", MAX_ATTEMPTS_ENV, raw))?;
            if config.max_attempts == 0 {
                anyhow::bail!("{} must be at least 1", MAX_ATTEMPTS_ENV);
            }
        }
        if let Some(raw) = lookup(INTERVAL_MS_ENV) {
            let millis: u64 = raw
                .parse()
                .with_context(|| format!("Invalid {}: {}", INTERVAL_MS_ENV, raw))?;
            config.interval = Duration::from_millis(millis);
        }

        Ok(config)
    }
}
