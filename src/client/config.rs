use std::time::Duration;

use serde::Deserialize;

// Client configuration.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    // Base url every api path is resolved against.
    base_url: Option<String>,
    // Timeout for a single http request.
    timeout_milliseconds: Option<u64>,
    // Path of the credential refresh endpoint.
    refresh_path: Option<String>,
    // How long query responses are served from cache. 0 disables caching.
    cache_ttl_seconds: Option<u64>,
    // User-Agent header.
    user_agent: Option<String>,
}

impl Config {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api/v1";
    const DEFAULT_TIMEOUT_MILLISECONDS: u64 = 10_000;
    const DEFAULT_REFRESH_PATH: &'static str = "/auth/refresh";
    const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

    pub fn set_base_url(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.base_url = Some(val)
        }
    }
    pub fn set_timeout_milliseconds(&mut self, val: Option<u64>) {
        if let Some(val) = val {
            self.timeout_milliseconds = Some(std::cmp::max(val, 1));
        }
    }
    pub fn set_refresh_path(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.refresh_path = Some(val)
        }
    }
    pub fn set_cache_ttl_seconds(&mut self, val: Option<u64>) {
        if let Some(val) = val {
            self.cache_ttl_seconds = Some(val);
        }
    }
    pub fn set_user_agent(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.user_agent = Some(val)
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.set_base_url(&mut other.base_url);
        self.set_timeout_milliseconds(other.timeout_milliseconds);
        self.set_refresh_path(&mut other.refresh_path);
        self.set_cache_ttl_seconds(other.cache_ttl_seconds);
        self.set_user_agent(&mut other.user_agent);
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| Config::DEFAULT_BASE_URL.to_owned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeout_milliseconds
                .unwrap_or(Config::DEFAULT_TIMEOUT_MILLISECONDS),
        )
    }

    pub fn refresh_path(&self) -> &str {
        self.refresh_path
            .as_deref()
            .unwrap_or(Config::DEFAULT_REFRESH_PATH)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.cache_ttl_seconds
                .unwrap_or(Config::DEFAULT_CACHE_TTL_SECONDS),
        )
    }

    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(|| {
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        })
    }
}
