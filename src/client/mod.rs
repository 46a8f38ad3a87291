//! 客户端：配置持有、请求发送与状态码到错误的映射。
//!
//! OxAPI client and its builder.

mod builder;
mod core;

pub use builder::OxClientBuilder;
pub use core::{ExecOptions, OxClient};
