//! Request descriptor: one call to an OxAPI model, prepared or completed.
//!
//! A [`ModelCall`] carries everything needed to send the request (the
//! configuration of the client that created it, model, versions, body) and,
//! once a response arrived, either the raw JSON result or the [`ApiError`]
//! record. Only the execution step writes those two fields.

use crate::catalog::{ApiKind, Capability, Model};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::format::{Formatted, ResultFormat};
use crate::nlp;
use crate::transport::{HttpRequest, HttpResponse};
use crate::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// The input echoed back for result formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallInput {
    Texts(Vec<String>),
    Prompt(String),
}

impl CallInput {
    pub fn texts(&self) -> Option<&[String]> {
        match self {
            CallInput::Texts(t) => Some(t),
            CallInput::Prompt(_) => None,
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        match self {
            CallInput::Prompt(p) => Some(p),
            CallInput::Texts(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelCall {
    config: Arc<ClientConfig>,
    model: Model,
    api_version: String,
    model_version: String,
    body: Option<Value>,
    input: Option<CallInput>,
    result: Option<Value>,
    error: Option<ApiError>,
}

impl ModelCall {
    /// Bare descriptor with no body and no input echo.
    ///
    /// The call is always sent to `config`'s base URL with `config`'s key,
    /// whichever client or pipe executes it.
    pub fn new(
        config: Arc<ClientConfig>,
        model: impl Into<Model>,
        api_version: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            config,
            model: model.into(),
            api_version: api_version.into(),
            model_version: model_version.into(),
            body: None,
            input: None,
            result: None,
            error: None,
        }
    }

    pub(crate) fn with_body(mut self, body: Value, input: CallInput) -> Self {
        self.body = Some(body);
        self.input = Some(input);
        self
    }

    /// Configuration this call was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn capability(&self) -> Capability {
        self.model.capability()
    }

    pub fn api_kind(&self) -> ApiKind {
        self.model.api_kind()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn input(&self) -> Option<&CallInput> {
        self.input.as_ref()
    }

    /// Raw JSON result of a successful call.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Error record of a failed call.
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// `{base_url}/{api_version}/model/{kind}/{model}/{model_version}/inference`
    pub fn url(&self) -> String {
        [
            self.config.base_url(),
            self.api_version.as_str(),
            "model",
            self.api_kind().as_str(),
            self.model.as_str(),
            self.model_version.as_str(),
            "inference",
        ]
        .join("/")
    }

    /// The request to send. Fails with
    /// [`Error::InvalidApiKey`](crate::Error::InvalidApiKey) when the call's
    /// configuration has no key.
    pub(crate) fn http_request(&self) -> Result<HttpRequest> {
        let api_key = self.config.require_api_key()?;
        let body = self
            .body
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()));
        Ok(HttpRequest::json_post(self.url(), body, api_key))
    }

    /// Store the outcome of a received response. A 200 sets the result; any
    /// other status sets the error record and leaves the result unset.
    pub(crate) fn record_response(&mut self, response: HttpResponse) -> Option<&ApiError> {
        match ApiError::from_response(&response) {
            None => {
                self.error = None;
                self.result = Some(response.body);
                None
            }
            Some(err) => {
                self.result = None;
                self.error = Some(err);
                self.error.as_ref()
            }
        }
    }

    /// Shape the raw result. Returns `Ok(None)` when the input echo or the
    /// result is not available yet.
    ///
    /// Unsupported formats fail with [`Error::InvalidFormat`](crate::Error::InvalidFormat)
    /// whether or not a result is present.
    pub fn format_result(&self, format: ResultFormat) -> Result<Option<Formatted>> {
        let capability = self.capability();
        if !capability.supported_formats().contains(&format) {
            return Err(capability.unsupported_format(format));
        }
        let Some(input) = &self.input else {
            warn!("Input texts are not defined");
            return Ok(None);
        };
        let Some(result) = &self.result else {
            warn!("Results are not available");
            return Ok(None);
        };

        let formatted = match (self.model, input) {
            (Model::Classification(m), CallInput::Texts(texts)) => {
                nlp::classification::format(m, texts, result, format)?
            }
            (Model::Completion(_), CallInput::Prompt(prompt)) => {
                nlp::completion::format(prompt, result, format)?
            }
            (Model::Encoding(_), CallInput::Texts(texts)) => {
                nlp::encoding::format(texts, result, format)?
            }
            (Model::Pipeline(_), CallInput::Texts(texts)) => {
                nlp::pipeline::format(texts, result, format)?
            }
            (Model::Transformation(_), CallInput::Texts(texts)) => {
                nlp::transformation::format(texts, result, format)?
            }
            _ => {
                warn!("Input texts are not defined");
                return Ok(None);
            }
        };
        Ok(Some(formatted))
    }

    /// [`format_result`](Self::format_result) with a format name such as `"pd"` or `"dict"`.
    pub fn format_result_str(&self, format: &str) -> Result<Option<Formatted>> {
        self.format_result(format.parse()?)
    }

    /// [`format_result`](Self::format_result) with the capability's default format.
    pub fn format_default(&self) -> Result<Option<Formatted>> {
        self.format_result(self.capability().default_format())
    }
}

impl fmt::Display for ModelCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self
            .result
            .as_ref()
            .map_or_else(|| "None".to_string(), |r| r.to_string());
        let error = self
            .error
            .as_ref()
            .map_or_else(|| "None".to_string(), |e| e.to_string());
        write!(
            f,
            "Model: {}, Type: {}, API version: {}, Version: {}, Result: {}, Error: {}",
            self.model,
            self.api_kind(),
            self.api_version,
            self.model_version,
            result,
            error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassificationModel, EncodingModel};
    use serde_json::json;

    fn config() -> Arc<ClientConfig> {
        Arc::new(ClientConfig::new().with_api_key("key-1"))
    }

    fn classification_call() -> ModelCall {
        ModelCall::new(config(), ClassificationModel::DialogContentFilter, "v1", "v1")
            .with_body(json!({"texts": ["x"]}), CallInput::Texts(vec!["x".into()]))
    }

    #[test]
    fn test_url_composition() {
        let call = ModelCall::new(config(), EncodingModel::AllMpnetBaseV2, "v2", "v3");
        assert_eq!(
            call.url(),
            "https://api.oxolo.com/v2/model/nlp/all-mpnet-base-v2/v3/inference"
        );

        let custom = Arc::new(ClientConfig::new().with_base_url("http://127.0.0.1:9000/"));
        let call = ModelCall::new(custom, EncodingModel::AllMpnetBaseV2, "v2", "v3");
        assert_eq!(
            call.url(),
            "http://127.0.0.1:9000/v2/model/nlp/all-mpnet-base-v2/v3/inference"
        );
    }

    #[test]
    fn test_display_with_nothing_set() {
        let call = ModelCall::new(config(), EncodingModel::AllMiniLmL6V2, "v1", "v1");
        assert_eq!(
            call.to_string(),
            "Model: all-minilm-l6-v2, Type: nlp, API version: v1, Version: v1, Result: None, Error: None"
        );
    }

    #[test]
    fn test_record_success_and_failure() {
        let mut call = classification_call();
        let url = call.url();

        let err = call
            .record_response(HttpResponse::new(&url, 500, json!({"message": "boom"})))
            .cloned();
        assert_eq!(err.map(|e| e.http_status), Some(500));
        assert!(call.result().is_none());
        assert!(call.to_string().contains("Error code: 500, Error message: boom"));

        assert!(call
            .record_response(HttpResponse::new(&url, 200, json!({"results": [["ok", 0.9]]})))
            .is_none());
        assert!(call.error().is_none());
        assert_eq!(call.result(), Some(&json!({"results": [["ok", 0.9]]})));
    }

    #[test]
    fn test_unavailable_sentinel() {
        let bare = ModelCall::new(config(), EncodingModel::AllMpnetBaseV2, "v1", "v1");
        assert_eq!(bare.format_default().unwrap(), None);

        let prepared = classification_call();
        assert_eq!(prepared.format_result_str("dict").unwrap(), None);
    }

    #[test]
    fn test_invalid_format_regardless_of_state() {
        let bare = ModelCall::new(config(), EncodingModel::AllMpnetBaseV2, "v1", "v1");
        assert!(bare.format_result_str("invalid-format-string").unwrap_err().is_invalid_format());
        assert!(bare.format_result(ResultFormat::Table).unwrap_err().is_invalid_format());

        let mut done = classification_call();
        let url = done.url();
        done.record_response(HttpResponse::new(url, 200, json!({"results": [["a", 1.0]]})));
        assert!(done.format_result_str("invalid-format-string").unwrap_err().is_invalid_format());
        assert!(done.format_result_str("np").unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_http_request_headers() {
        let call = classification_call();
        let req = call.http_request().unwrap();
        assert_eq!(req.header("authorization"), Some("key-1"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body, json!({"texts": ["x"]}));

        let bare = ModelCall::new(config(), EncodingModel::AllMpnetBaseV2, "v1", "v1");
        assert_eq!(bare.http_request().unwrap().body, json!({}));

        let keyless = ModelCall::new(Arc::new(ClientConfig::new()), EncodingModel::AllMpnetBaseV2, "v1", "v1");
        assert!(keyless.http_request().unwrap_err().is_invalid_credential());
    }

    #[test]
    fn test_input_echo_accessors() {
        let texts = CallInput::Texts(vec!["a".to_string()]);
        assert_eq!(texts.texts(), Some(&["a".to_string()][..]));
        assert_eq!(texts.prompt(), None);

        let prompt = CallInput::Prompt("go".to_string());
        assert_eq!(prompt.texts(), None);
        assert_eq!(prompt.prompt(), Some("go"));
        assert_eq!(classification_call().input().and_then(CallInput::texts).map(<[String]>::len), Some(1));
    }
}
