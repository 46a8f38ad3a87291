//! Error mapping and the raise/record switch

use crate::integration::mock_server::MockServerFixture;
use oxapi::{ApiErrorKind, Error, OxClient};
use serde_json::json;

#[tokio::test]
async fn test_server_error_raised_by_default() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_inference("dialog-tag", json!({"texts": ["x"]}), 500, json!({"message": "internal"}))
        .await;

    let err = fixture
        .client()
        .classification("dialog-tag", ["x"])
        .run()
        .await
        .unwrap_err();

    let api = err.api_error().unwrap();
    assert_eq!(api.kind, ApiErrorKind::Other);
    assert_eq!(api.http_status, 500);
    assert!(api.url.ends_with("/v1/model/nlp/dialog-tag/v1/inference"));
    assert_eq!(err.to_string(), "Error code: 500, Error message: internal");
}

#[tokio::test]
async fn test_server_error_recorded_when_not_raising() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_inference("dialog-tag", json!({"texts": ["x"]}), 500, json!({"message": "internal"}))
        .await;

    let call = fixture
        .client()
        .classification("dialog-tag", ["x"])
        .raise_exceptions(false)
        .run()
        .await
        .unwrap();

    assert!(call.result().is_none());
    assert_eq!(call.error().map(|e| e.http_status), Some(500));
    assert_eq!(call.format_default().unwrap(), None);
}

#[tokio::test]
async fn test_status_mapping() {
    let fixture = MockServerFixture::new().await;
    let cases = [
        ("dialog-tag", 401, ApiErrorKind::InvalidCredential),
        ("dialog-emotions", 403, ApiErrorKind::NotAllowed),
        ("dialog-topics", 404, ApiErrorKind::NotFound),
        ("dialog-content-filter", 418, ApiErrorKind::Other),
    ];
    let mut mocks = Vec::new();
    for (model, status, _) in &cases {
        mocks.push(
            fixture
                .mock_inference(model, json!({"texts": ["x"]}), *status, json!({}))
                .await,
        );
    }

    let client = fixture.client();
    for (model, status, kind) in cases {
        let err = client.classification(model, ["x"]).run().await.unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.kind, kind, "status {}", status);
        assert_eq!(api.message(), "<empty message>");
    }
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_unknown_model_never_reaches_server() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await
    };

    let err = fixture
        .client()
        .encoding("nonexistent-model", ["x"])
        .run()
        .await
        .unwrap_err();
    assert!(err.is_model_not_found());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_key_never_reaches_server() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called("punctuation-imputation").await;

    let err = fixture
        .client_without_key()
        .transformation("punctuation-imputation", ["x"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidApiKey { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_format_after_success() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_inference("punctuation-imputation", json!({"texts": ["hi there"]}), 200, json!({"results": ["Hi there."]}))
        .await;

    let call = fixture
        .client()
        .transformation("punctuation-imputation", ["hi there"])
        .run()
        .await
        .unwrap();
    assert!(call.format_result_str("invalid-format-string").unwrap_err().is_invalid_format());
    assert!(call.format_result_str("dict").unwrap().is_some());
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let client = OxClient::builder()
        .base_url("http://127.0.0.1:1")
        .api_key("k")
        .timeout_secs(2)
        .build()
        .unwrap();

    let err = client
        .encoding("all-mpnet-base-v2", ["x"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
