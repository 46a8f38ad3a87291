//! Concurrent dispatcher for prepared calls.

use crate::call::ModelCall;
use crate::client::OxClient;
use crate::transport::HttpRequest;
use crate::Result;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, warn};

/// What [`CallPipe::run`] did.
#[derive(Debug, Clone, Copy)]
pub enum PipeOutcome<'a> {
    /// The queue was empty; nothing was sent.
    NothingToRun,
    /// Every queued call was attempted. Same order as queued.
    Completed(&'a [ModelCall]),
}

impl<'a> PipeOutcome<'a> {
    pub fn is_nothing_to_run(&self) -> bool {
        matches!(self, PipeOutcome::NothingToRun)
    }

    pub fn calls(&self) -> Option<&'a [ModelCall]> {
        match self {
            PipeOutcome::NothingToRun => None,
            PipeOutcome::Completed(calls) => Some(calls),
        }
    }
}

/// Per-state counts over the queued calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipeSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Neither a result nor an error: never sent, or the connection failed.
    pub pending: usize,
}

impl PipeSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.pending
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.pending == 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total() as f64
        }
    }
}

/// Ordered queue of prepared calls, sent concurrently by [`run`](Self::run).
///
/// Failures never abort the batch: API errors are recorded on the call that
/// got them and connection failures leave that call untouched. Both are
/// logged as warnings.
#[derive(Debug, Clone)]
pub struct CallPipe {
    client: OxClient,
    calls: Vec<ModelCall>,
    max_concurrency: Option<usize>,
}

impl CallPipe {
    pub fn new(client: OxClient) -> Self {
        Self {
            client,
            calls: Vec::new(),
            max_concurrency: None,
        }
    }

    pub fn with_calls(client: OxClient, calls: impl IntoIterator<Item = ModelCall>) -> Self {
        let mut pipe = Self::new(client);
        pipe.add_all(calls);
        pipe
    }

    /// Cap on in-flight requests. Default sends the whole queue at once.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max.max(1));
        self
    }

    pub fn add(&mut self, call: ModelCall) -> &mut Self {
        self.calls.push(call);
        self
    }

    pub fn add_all(&mut self, calls: impl IntoIterator<Item = ModelCall>) -> &mut Self {
        self.calls.extend(calls);
        self
    }

    /// Empty the queue.
    pub fn flush(&mut self) {
        self.calls.clear();
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn calls(&self) -> &[ModelCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<ModelCall> {
        self.calls
    }

    pub fn summary(&self) -> PipeSummary {
        self.calls
            .iter()
            .fold(PipeSummary::default(), |mut acc, call| {
                match (call.result(), call.error()) {
                    (Some(_), _) => acc.succeeded += 1,
                    (None, Some(_)) => acc.failed += 1,
                    (None, None) => acc.pending += 1,
                }
                acc
            })
    }

    /// Send every queued call concurrently and wait for all of them.
    ///
    /// Each call goes to the base URL and key it was created with; the pipe
    /// only provides the transport. An empty queue logs a warning and
    /// returns [`PipeOutcome::NothingToRun`]. A call without an API key fails
    /// the run before any request is sent.
    pub async fn run(&mut self) -> Result<PipeOutcome<'_>> {
        if self.calls.is_empty() {
            warn!("Call list is empty, nothing to run.");
            return Ok(PipeOutcome::NothingToRun);
        }

        let requests = self
            .calls
            .iter()
            .map(ModelCall::http_request)
            .collect::<Result<Vec<HttpRequest>>>()?;

        let width = self.max_concurrency.unwrap_or(requests.len());
        debug!(count = requests.len(), width, "dispatching calls");
        let start = Instant::now();

        let transport = &self.client.transport;
        let outcomes: Vec<_> = stream::iter(requests)
            .map(|request| {
                let url = request.url.clone();
                async move { (url, transport.post_json(request).await) }
            })
            .buffered(width)
            .collect()
            .await;

        for (call, (url, outcome)) in self.calls.iter_mut().zip(outcomes) {
            match outcome {
                Ok(response) => {
                    if let Some(err) = call.record_response(response) {
                        warn!("Request failed: {}, ERROR: {}", err.url, err.message());
                    }
                }
                Err(e) => warn!("Request failed: {}, ERROR: {}", url, e),
            }
        }
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "calls completed");

        Ok(PipeOutcome::Completed(&self.calls))
    }
}

impl Extend<ModelCall> for CallPipe {
    fn extend<T: IntoIterator<Item = ModelCall>>(&mut self, iter: T) {
        self.calls.extend(iter);
    }
}
