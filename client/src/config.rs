use std::{env, fmt::Display, str::FromStr, time::Duration};

use reqwest::Url;
use thiserror::Error;
use tracing::{info, warn};

pub const API_URL_KEY: &str = "SENDS_API_URL";
pub const TIMEOUT_KEY: &str = "SENDS_API_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: &str = "10";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url: String = try_load(&lookup, API_URL_KEY, DEFAULT_API_URL)?;
        let timeout_secs: u64 = try_load(&lookup, TIMEOUT_KEY, DEFAULT_TIMEOUT_SECS)?;

        Url::parse(&api_url).map_err(|e| invalid(API_URL_KEY, e))?;

        if timeout_secs == 0 {
            return Err(invalid(TIMEOUT_KEY, "timeout must be at least one second"));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        Url::parse(api_url).map_err(|e| invalid(API_URL_KEY, e))?;
        self.api_url = api_url.trim_end_matches('/').to_string();

        Ok(self)
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            invalid(key, e)
        })
}

fn invalid(key: &'static str, message: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        message: message.to_string(),
    }
}
