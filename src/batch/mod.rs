//! 批量调用模块：并发发送一组已准备好的模型调用。
//!
//! # Call Batching
//!
//! [`CallPipe`] holds an ordered queue of prepared [`ModelCall`](crate::ModelCall)s
//! and sends them concurrently. Results come back in queue order; one
//! failing call does not affect the others.
//!
//! ```rust,no_run
//! # async fn demo(client: oxapi::OxClient) -> oxapi::Result<()> {
//! let mut pipe = client.pipe();
//! pipe.add(client.encoding("all-mpnet-base-v2", ["first"]).prepare()?)
//!     .add(client.classification("dialog-tag", ["second"]).prepare()?);
//!
//! if let Some(calls) = pipe.run().await?.calls() {
//!     for call in calls {
//!         println!("{call}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod pipe;

pub use pipe::{CallPipe, PipeOutcome, PipeSummary};
