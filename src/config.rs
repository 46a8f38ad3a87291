//! 客户端配置：API Key、基础 URL、默认版本，支持环境变量与 YAML 文件。
//!
//! Client configuration.
//!
//! A [`ClientConfig`] is built once and owned by an [`OxClient`](crate::OxClient).
//! It can come from builder setters, the environment (`OXAPI_*`) or a YAML file.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.oxolo.com";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_MODEL_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OXAPI_KEY";
const KEYRING_SERVICE: &str = "oxapi";
const KEYRING_USER: &str = "default";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub default_api_version: String,
    pub default_model_version: String,
    pub timeout_secs: u64,
    pub log_level: String,
    /// Proxy for every request (`OXAPI_PROXY_URL`).
    pub proxy_url: Option<String>,
    /// Idle connections kept per host (`OXAPI_HTTP_POOL_MAX_IDLE_PER_HOST`).
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            default_api_version: DEFAULT_API_VERSION.to_string(),
            default_model_version: DEFAULT_MODEL_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            proxy_url: None,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_api_version", &self.default_api_version)
            .field("default_model_version", &self.default_model_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_level", &self.log_level)
            .field("proxy_url", &self.proxy_url)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .finish()
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `OXAPI_*` variables from the process environment.
    ///
    /// Falls back to the OS keyring when `OXAPI_KEY` is unset, and logs a
    /// warning when no key can be found at all. A missing key is not an
    /// error here; calls fail later with [`Error::InvalidApiKey`].
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok());
        if config.api_key.is_none() {
            config.api_key = Self::keyring_api_key();
        }
        if config.api_key.is_none() {
            warn!(
                "API Key not found in environment variable '{}', you should set it manually",
                API_KEY_ENV
            );
        }
        config
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable lookup and no keyring.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.api_key = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("OXAPI_BASE_URL") {
            config.base_url = url;
        }
        if let Some(v) = lookup("OXAPI_API_VERSION") {
            config.default_api_version = v;
        }
        if let Some(v) = lookup("OXAPI_MODEL_VERSION") {
            config.default_model_version = v;
        }
        if let Some(secs) = lookup("OXAPI_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.timeout_secs = secs;
        }
        if let Some(level) = lookup("OXAPI_LOG_LEVEL") {
            config.log_level = level;
        }
        config.proxy_url = lookup("OXAPI_PROXY_URL").filter(|p| !p.trim().is_empty());
        if let Some(n) = lookup("OXAPI_HTTP_POOL_MAX_IDLE_PER_HOST").and_then(|s| s.parse::<usize>().ok()) {
            config.pool_max_idle_per_host = n;
        }
        config
    }

    /// Load a YAML config file. Missing fields keep their defaults.
    ///
    /// ```yaml
    /// base_url: https://api.oxolo.com
    /// default_api_version: v1
    /// default_model_version: v1
    /// log_level: warn
    /// ```
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("config_loader"),
            )
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid YAML config: {}", e),
                ErrorContext::new().with_source("config_loader"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    fn keyring_api_key() -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
        entry.get_password().ok()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_default_api_version(mut self, version: impl Into<String>) -> Self {
        self.default_api_version = version.into();
        self
    }

    pub fn with_default_model_version(mut self, version: impl Into<String>) -> Self {
        self.default_model_version = version.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn with_pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = n;
        self
    }

    /// Base URL without trailing slashes, ready for path joining.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The API key, or [`Error::InvalidApiKey`] when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::invalid_api_key(format!(
                "API Key cannot be None: either set it on the client configuration, or set the {} environment variable",
                API_KEY_ENV
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        match url::Url::parse(self.base_url()) {
            Ok(u) if !u.cannot_be_a_base() => {}
            Ok(_) | Err(_) => {
                return Err(Error::configuration_with_context(
                    format!("Invalid base URL: {}", self.base_url),
                    ErrorContext::new()
                        .with_field_path("config.base_url")
                        .with_details("expected an absolute http(s) URL")
                        .with_source("config_validator"),
                ));
            }
        }
        if let Some(proxy) = &self.proxy_url {
            if url::Url::parse(proxy).is_err() {
                return Err(Error::configuration_with_context(
                    format!("Invalid proxy URL: {}", proxy),
                    ErrorContext::new()
                        .with_field_path("config.proxy_url")
                        .with_source("config_validator"),
                ));
            }
        }
        for (field, value) in [
            ("config.default_api_version", &self.default_api_version),
            ("config.default_model_version", &self.default_model_version),
        ] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(Error::configuration_with_context(
                    format!("Invalid version: {:?}", value),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_source("config_validator"),
                ));
            }
        }
        Ok(())
    }
}
