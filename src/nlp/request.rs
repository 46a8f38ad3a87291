//! Request builders shared by the capability modules.
//!
//! `prepare` validates the model and builds an unsent [`ModelCall`];
//! `run` does the same and then sends it. Model validation always happens
//! first, so an unknown model name never reaches the credential check or
//! the network.

use crate::call::{CallInput, ModelCall};
use crate::catalog::{Capability, Model};
use crate::client::{ExecOptions, OxClient};
use crate::Result;
use serde_json::{json, Map, Value};

/// Per-call knobs. `None` versions fall back to the client defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    pub api_version: Option<String>,
    pub model_version: Option<String>,
    pub verbose: bool,
    pub raise_exceptions: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            api_version: None,
            model_version: None,
            verbose: false,
            raise_exceptions: true,
        }
    }
}

impl CallOptions {
    fn exec(&self) -> ExecOptions {
        ExecOptions {
            raise_exceptions: self.raise_exceptions,
            verbose: self.verbose,
        }
    }

    fn versions(&self, client: &OxClient) -> (String, String) {
        let config = client.config();
        (
            self.api_version
                .clone()
                .unwrap_or_else(|| config.default_api_version.clone()),
            self.model_version
                .clone()
                .unwrap_or_else(|| config.default_model_version.clone()),
        )
    }
}

macro_rules! option_setters {
    () => {
        pub fn api_version(mut self, version: impl Into<String>) -> Self {
            self.options.api_version = Some(version.into());
            self
        }

        pub fn model_version(mut self, version: impl Into<String>) -> Self {
            self.options.model_version = Some(version.into());
            self
        }

        /// Log the endpoint, body and response code at info level.
        pub fn verbose(mut self, verbose: bool) -> Self {
            self.options.verbose = verbose;
            self
        }

        /// When false, API errors are recorded on the returned call instead
        /// of being returned as `Err`.
        pub fn raise_exceptions(mut self, raise: bool) -> Self {
            self.options.raise_exceptions = raise;
            self
        }

        pub fn options(mut self, options: CallOptions) -> Self {
            self.options = options;
            self
        }
    };
}

/// Request for the capabilities taking a list of texts
/// (classification, encoding, pipeline, transformation).
#[derive(Debug, Clone)]
pub struct TextRequest<'a> {
    client: &'a OxClient,
    capability: Capability,
    model: String,
    texts: Vec<String>,
    options: CallOptions,
}

impl<'a> TextRequest<'a> {
    pub(crate) fn new<I, S>(
        client: &'a OxClient,
        capability: Capability,
        model: impl Into<String>,
        texts: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            client,
            capability,
            model: model.into(),
            texts: texts.into_iter().map(Into::into).collect(),
            options: CallOptions::default(),
        }
    }

    /// Append one more input text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    option_setters!();

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Validate the model and build the unsent call.
    pub fn prepare(self) -> Result<ModelCall> {
        let model = Model::parse(self.capability, &self.model)?;
        let (api_version, model_version) = self.options.versions(self.client);
        let body = json!({ "texts": &self.texts });
        Ok(ModelCall::new(self.client.config.clone(), model, api_version, model_version)
            .with_body(body, CallInput::Texts(self.texts)))
    }

    /// Validate, send and return the completed call.
    pub async fn run(self) -> Result<ModelCall> {
        let client = self.client;
        let exec = self.options.exec();
        let mut call = self.prepare()?;
        client.execute(&mut call, exec).await?;
        Ok(call)
    }
}

/// Completion request: a prompt plus free-form generation parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    client: &'a OxClient,
    model: String,
    prompt: String,
    params: Map<String, Value>,
    options: CallOptions,
}

impl<'a> CompletionRequest<'a> {
    pub(crate) fn new(
        client: &'a OxClient,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            prompt: prompt.into(),
            params: Map::new(),
            options: CallOptions::default(),
        }
    }

    /// Extra body field, e.g. `max_length` or `temperature`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params.extend(params);
        self
    }

    option_setters!();

    /// Validate the model and build the unsent call. A `prompt` key among
    /// the params is replaced by the prompt.
    pub fn prepare(self) -> Result<ModelCall> {
        let model = Model::parse(Capability::Completion, &self.model)?;
        let (api_version, model_version) = self.options.versions(self.client);
        let mut body = self.params;
        body.insert("prompt".to_string(), Value::String(self.prompt.clone()));
        Ok(ModelCall::new(self.client.config.clone(), model, api_version, model_version)
            .with_body(Value::Object(body), CallInput::Prompt(self.prompt)))
    }

    pub async fn run(self) -> Result<ModelCall> {
        let client = self.client;
        let exec = self.options.exec();
        let mut call = self.prepare()?;
        client.execute(&mut call, exec).await?;
        Ok(call)
    }
}
