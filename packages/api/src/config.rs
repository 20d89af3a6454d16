//! Backend connection settings from environment variables.

use std::time::Duration;

use crate::error::ApiError;

/// Android emulator alias for the host machine's localhost.
pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Where the recipe backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `RECIPES_API_URL` and `RECIPES_API_TIMEOUT_SECS`, loading a
    /// `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("RECIPES_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match std::env::var("RECIPES_API_TIMEOUT_SECS") {
            Ok(secs) => secs.trim().parse::<u64>().map_err(|_| {
                ApiError::InvalidConfig(format!("RECIPES_API_TIMEOUT_SECS is not a number: {secs}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url).with_timeout(Duration::from_secs(timeout)).validated()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an absolute API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn validated(self) -> Result<Self, ApiError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(self)
        } else {
            Err(ApiError::InvalidConfig(format!(
                "RECIPES_API_URL must be an http(s) URL: {}",
                self.base_url
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = ApiConfig::new("http://localhost:8080/");
        assert_eq!(config.url("/api/favorites/ids"), "http://localhost:8080/api/favorites/ids");
        assert_eq!(ApiConfig::default().url("api/recipes"), "http://10.0.2.2:8080/api/recipes");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(ApiConfig::new("ftp://example.com").validated().is_err());
        assert!(ApiConfig::new("https://recipes.example.com").validated().is_ok());
    }
}
