//! Configuration options for the CityHall client

use std::time::Duration;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "CITYHALL_API_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Configuration options for the CityHall client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Resolve the API base URL from `CITYHALL_API_URL`.
    ///
    /// Env files are known to carry stray whitespace around the value, so
    /// it is trimmed before use. Falls back to the local development URL.
    pub fn base_url_from_env() -> String {
        match std::env::var(BASE_URL_ENV) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    DEFAULT_BASE_URL.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(_) => DEFAULT_BASE_URL.to_string(),
        }
    }
}
