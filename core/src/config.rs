//! Where the backend lives.

use std::env;

use crate::client::CarsClient;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "CARS_API_URL";

pub const DEFAULT_BASE_URL: &str = "https://backend-jscamp.saritasa-hosting.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `CARS_API_URL`, falling back to the default backend. A blank
    /// value counts as unset.
    pub fn from_env() -> Self {
        Self::from_value(env::var(BASE_URL_ENV).ok())
    }

    fn from_value(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(base_url) if !base_url.is_empty() => Self { base_url },
            _ => Self::default(),
        }
    }

    pub fn client(&self) -> CarsClient {
        CarsClient::new(&self.base_url)
    }
}
