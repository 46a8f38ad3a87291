//! NLP capabilities.
//!
//! Request construction for all five capabilities lives in [`request`]; the
//! per-capability modules own model listing and result shaping.
//!
//! | Module | Body | Default format |
//! |--------|------|----------------|
//! | [`classification`] | `{"texts": [...]}` | table |
//! | [`completion`] | `{"prompt": ..., ...params}` | text |
//! | [`encoding`] | `{"texts": [...]}` | array |
//! | [`pipeline`] | `{"texts": [...]}` | dict |
//! | [`transformation`] | `{"texts": [...]}` | table |

pub mod classification;
pub mod completion;
pub mod encoding;
pub mod pipeline;
pub mod request;
pub mod transformation;

pub use request::{CallOptions, CompletionRequest, TextRequest};
