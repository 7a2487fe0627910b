//! Connection settings for a `Store`.

use std::time::Duration;

use crate::error::ApiError;

pub const API_URL_VAR: &str = "API_URL";
pub const API_TIMEOUT_VAR: &str = "API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the collection service, e.g. `http://127.0.0.1:3000`.
    pub api_url: String,
    /// Per-request timeout. `None` lets requests run until the peer answers.
    pub timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `API_URL` and the optional `API_TIMEOUT_SECS` from the process
    /// environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{API_URL_VAR} is not set")))?;

        let timeout = match lookup(API_TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Config(format!(
                        "{API_TIMEOUT_VAR} must be whole seconds, got {raw:?}"
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self { api_url, timeout })
    }
}
