//! Concurrent dispatch through CallPipe

use crate::integration::mock_server::MockServerFixture;
use oxapi::{CallPipe, ModelCall, PipeOutcome};
use serde_json::json;

#[tokio::test]
async fn test_batch_keeps_order_when_middle_call_fails() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.client();

    let _a = fixture
        .mock_inference("dialog-tag", json!({"texts": ["A"]}), 200, json!({"results": [["tag-a", 0.1]]}))
        .await;
    let _b = fixture
        .mock_inference("dialog-emotions", json!({"texts": ["B"]}), 500, json!({"message": "boom"}))
        .await;
    let _c = fixture
        .mock_inference("all-mpnet-base-v2", json!({"texts": ["C"]}), 200, json!({"results": [[1.0, 2.0]]}))
        .await;

    let calls: Vec<ModelCall> = vec![
        client.classification("dialog-tag", ["A"]).prepare().unwrap(),
        client.classification("dialog-emotions", ["B"]).prepare().unwrap(),
        client.encoding("all-mpnet-base-v2", ["C"]).prepare().unwrap(),
    ];
    let mut pipe = CallPipe::with_calls(client.clone(), calls);

    let outcome = pipe.run().await.unwrap();
    let done = outcome.calls().unwrap();
    assert_eq!(done.len(), 3);

    assert_eq!(done[0].model().as_str(), "dialog-tag");
    assert_eq!(done[0].result(), Some(&json!({"results": [["tag-a", 0.1]]})));
    assert!(done[0].error().is_none());

    assert_eq!(done[1].model().as_str(), "dialog-emotions");
    assert!(done[1].result().is_none());
    let err = done[1].error().unwrap();
    assert_eq!(err.http_status, 500);
    assert_eq!(err.message(), "boom");

    assert_eq!(done[2].model().as_str(), "all-mpnet-base-v2");
    assert_eq!(done[2].result(), Some(&json!({"results": [[1.0, 2.0]]})));

    let summary = pipe.summary();
    assert_eq!((summary.succeeded, summary.failed, summary.pending), (2, 1, 0));
}

#[tokio::test]
async fn test_empty_pipe_returns_sentinel() {
    let fixture = MockServerFixture::new().await;
    let mut pipe = fixture.client_without_key().pipe();

    let outcome = pipe.run().await.unwrap();
    assert!(matches!(outcome, PipeOutcome::NothingToRun));
}

#[tokio::test]
async fn test_pipe_without_key_sends_nothing() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called("dialog-tag").await;
    let client = fixture.client_without_key();

    let mut pipe = client.pipe();
    pipe.add(client.classification("dialog-tag", ["x"]).prepare().unwrap());
    let err = pipe.run().await.unwrap_err();

    assert!(err.is_invalid_credential());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_call_goes_to_the_server_it_was_prepared_for() {
    let home = MockServerFixture::new().await;
    let other = MockServerFixture::new().await;
    let expected = home
        .mock_inference("dialog-tag", json!({"texts": ["x"]}), 200, json!({"results": [["t", 1.0]]}))
        .await;
    let stray = other.mock_never_called("dialog-tag").await;

    let call = home.client().classification("dialog-tag", ["x"]).prepare().unwrap();
    let mut pipe = other.client().pipe();
    pipe.add(call);
    let outcome = pipe.run().await.unwrap();

    assert!(outcome.calls().unwrap()[0].result().is_some());
    expected.assert_async().await;
    stray.assert_async().await;
}
