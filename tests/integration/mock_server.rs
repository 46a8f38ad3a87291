//! Mock HTTP server setup for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use oxapi::OxClient;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const TEST_KEY: &str = "test-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server, holding [`TEST_KEY`].
    pub fn client(&self) -> OxClient {
        OxClient::builder()
            .base_url(&self.base_url)
            .api_key(TEST_KEY)
            .build()
            .expect("client")
    }

    /// Client pointed at the mock server with no API key.
    pub fn client_without_key(&self) -> OxClient {
        OxClient::builder()
            .base_url(&self.base_url)
            .build()
            .expect("client")
    }

    /// Inference path for a model with default versions.
    pub fn path(model: &str) -> String {
        format!("/v1/model/nlp/{}/v1/inference", model)
    }

    /// Mock a JSON response, checking the key and the request body.
    pub async fn mock_inference(&self, model: &str, body: Value, status: usize, response: Value) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Self::path(model).as_str())
            .match_header("authorization", TEST_KEY)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(body))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// Mock that must never be hit.
    pub async fn mock_never_called(&self, model: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Self::path(model).as_str())
            .with_status(200)
            .expect(0)
            .create_async()
            .await
    }
}
