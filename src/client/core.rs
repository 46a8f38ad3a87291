use crate::batch::CallPipe;
use crate::call::ModelCall;
use crate::catalog::{Capability, Model};
use crate::client::builder::OxClientBuilder;
use crate::config::ClientConfig;
use crate::nlp::{CompletionRequest, TextRequest};
use crate::transport::Transport;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for all OxAPI calls.
///
/// Cheap to clone: the configuration and the transport are shared.
#[derive(Clone)]
pub struct OxClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<dyn Transport>,
}

/// How a single call reacts to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Return non-200 responses as `Err`. When false the error is recorded
    /// on the call and logged as a warning.
    pub raise_exceptions: bool,
    /// Log URL, body and response code at info level.
    pub verbose: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            raise_exceptions: true,
            verbose: false,
        }
    }
}

impl OxClient {
    /// Client over the default HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        OxClientBuilder::new().config(config).build()
    }

    /// Client configured from `OXAPI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn builder() -> OxClientBuilder {
        OxClientBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn classification<I, S>(&self, model: impl Into<String>, texts: I) -> TextRequest<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextRequest::new(self, Capability::Classification, model, texts)
    }

    pub fn encoding<I, S>(&self, model: impl Into<String>, texts: I) -> TextRequest<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextRequest::new(self, Capability::Encoding, model, texts)
    }

    pub fn pipeline<I, S>(&self, model: impl Into<String>, texts: I) -> TextRequest<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextRequest::new(self, Capability::Pipeline, model, texts)
    }

    pub fn transformation<I, S>(&self, model: impl Into<String>, texts: I) -> TextRequest<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TextRequest::new(self, Capability::Transformation, model, texts)
    }

    pub fn completion(&self, model: impl Into<String>, prompt: impl Into<String>) -> CompletionRequest<'_> {
        CompletionRequest::new(self, model, prompt)
    }

    /// Bare call bound to this client's configuration, with the default
    /// versions and no body.
    pub fn call(&self, model: impl Into<Model>) -> ModelCall {
        ModelCall::new(
            self.config.clone(),
            model,
            self.config.default_api_version.clone(),
            self.config.default_model_version.clone(),
        )
    }

    /// Empty dispatcher sharing this client's transport.
    pub fn pipe(&self) -> CallPipe {
        CallPipe::new(self.clone())
    }

    /// Send one prepared call through this client's transport and record the
    /// outcome on it. The URL and key come from the call's own configuration.
    ///
    /// Fails with [`Error::InvalidApiKey`] before any I/O when the call has no key.
    /// Connection failures are returned as [`Error::Transport`]; API errors
    /// follow `options.raise_exceptions`.
    pub async fn execute(&self, call: &mut ModelCall, options: ExecOptions) -> Result<()> {
        let request = call.http_request()?;

        if options.verbose {
            info!(
                base_url = call.config().base_url(),
                api_version = call.api_version(),
                kind = call.api_kind().as_str(),
                model = call.model().as_str(),
                version = call.model_version(),
                "resolved endpoint"
            );
            info!(url = %request.url, body = %request.body, "sending request");
        }

        let response = self.transport.post_json(request).await?;
        if options.verbose {
            info!("Response code: {}", response.status);
        }

        if let Some(err) = call.record_response(response) {
            if options.raise_exceptions {
                return Err(Error::Api(err.clone()));
            }
            warn!("Request failed: {}, ERROR: {}", err.url, err.message());
        }
        Ok(())
    }
}

impl std::fmt::Debug for OxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OxClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
