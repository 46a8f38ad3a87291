//! # oxapi
//!
//! OxAPI NLP 推理接口的 Rust 客户端：分类、补全、编码、管道与文本转换。
//!
//! Client SDK for the OxAPI NLP inference endpoints.
//!
//! ## Overview
//!
//! Every call goes to
//! `{base_url}/{api_version}/model/nlp/{model}/{model_version}/inference`
//! as a JSON POST with the API key in the `Authorization` header. A call is
//! represented by a [`ModelCall`]: it can be prepared without sending, sent
//! on its own, or queued in a [`CallPipe`] and sent concurrently with
//! others. Raw JSON results can be reshaped with
//! [`ModelCall::format_result`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oxapi::{OxClient, ResultFormat};
//!
//! #[tokio::main]
//! async fn main() -> oxapi::Result<()> {
//!     let client = OxClient::builder().api_key("your-api-key").build()?;
//!
//!     let call = client
//!         .classification("dialog-content-filter", ["I want to kill them."])
//!         .run()
//!         .await?;
//!
//!     if let Some(table) = call.format_result(ResultFormat::Table)? {
//!         println!("{:?}", table);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder and single-call execution |
//! | [`call`] | The request descriptor |
//! | [`nlp`] | Per-capability request builders and result shaping |
//! | [`batch`] | Concurrent dispatch of prepared calls |
//! | [`catalog`] | Capabilities and the models each one accepts |
//! | [`format`] | Output formats and the [`Table`] type |
//! | [`config`] | Configuration from code, environment, keyring or YAML |
//! | [`transport`] | HTTP seam |
//! | [`logging`] | Optional `tracing` subscriber setup |

pub mod batch;
pub mod call;
pub mod catalog;
pub mod client;
pub mod config;
pub mod format;
pub mod logging;
pub mod nlp;
pub mod transport;

/// Error type for the library
pub mod error;
pub use error::{ApiError, ApiErrorKind, Error, ErrorContext};

pub use batch::{CallPipe, PipeOutcome, PipeSummary};
pub use call::{CallInput, ModelCall};
pub use catalog::{
    ApiKind, Capability, ClassificationModel, CompletionModel, EncodingModel, Model,
    PipelineModel, TransformationModel,
};
pub use client::{ExecOptions, OxClient, OxClientBuilder};
pub use config::ClientConfig;
pub use format::{Formatted, ResultFormat, Table};
pub use nlp::{CallOptions, CompletionRequest, TextRequest};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport, TransportError};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
