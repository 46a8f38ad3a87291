use crate::client::core::OxClient;
use crate::config::ClientConfig;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use std::sync::Arc;

/// Builder for creating clients with custom configuration.
///
/// Starts from [`ClientConfig::default`]; nothing is read from the
/// environment unless [`from_env`](Self::from_env) is used.
pub struct OxClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl OxClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Start from the `OXAPI_*` environment.
    pub fn from_env() -> Self {
        Self::new().config(ClientConfig::from_env())
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Override the base URL (also how tests point the client at a mock server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn default_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.default_api_version = version.into();
        self
    }

    pub fn default_model_version(mut self, version: impl Into<String>) -> Self {
        self.config.default_model_version = version.into();
        self
    }

    /// Request timeout of the default HTTP transport.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Proxy used by the default HTTP transport.
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    /// Inject a transport. Default is [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<OxClient> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.config)?),
        };
        Ok(OxClient {
            config: Arc::new(self.config),
            transport,
        })
    }
}

impl Default for OxClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
