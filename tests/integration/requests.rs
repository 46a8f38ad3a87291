//! Single-call requests for each capability

use crate::integration::mock_server::MockServerFixture;
use oxapi::{Capability, Formatted, ResultFormat};
use serde_json::json;

#[tokio::test]
async fn test_list_models_round_trip() {
    let fixture = MockServerFixture::new().await;
    let client = fixture.client();

    for capability in Capability::ALL {
        for model in capability.list_models() {
            let texts = ["sample"];
            let prepared = match capability {
                Capability::Classification => client.classification(model, texts).prepare(),
                Capability::Completion => client.completion(model, "sample").prepare(),
                Capability::Encoding => client.encoding(model, texts).prepare(),
                Capability::Pipeline => client.pipeline(model, texts).prepare(),
                Capability::Transformation => client.transformation(model, texts).prepare(),
            };
            let call = prepared.unwrap();
            assert_eq!(call.model().as_str(), model);
            assert_eq!(call.capability(), *capability);
        }
    }
    assert_eq!(oxapi::nlp::encoding::list_models(), Capability::Encoding.list_models());
}

#[tokio::test]
async fn test_classification_table() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_inference(
            "dialog-content-filter",
            json!({"texts": ["I want to kill them."]}),
            200,
            json!({"results": [["violence", 0.9]]}),
        )
        .await;

    let call = fixture
        .client()
        .classification("dialog-content-filter", ["I want to kill them."])
        .run()
        .await
        .unwrap();
    mock.assert_async().await;

    let formatted = call.format_result_str("pd").unwrap().unwrap();
    let table = formatted.as_table().unwrap();
    assert_eq!(table.columns, vec!["text", "label", "confidence_score"]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "text"), Some(&json!("I want to kill them.")));
    assert_eq!(table.get(0, "label"), Some(&json!("violence")));
    assert_eq!(table.get(0, "confidence_score"), Some(&json!(0.9)));
}

#[tokio::test]
async fn test_completion_text_with_params() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_inference(
            "gpt-j-6b",
            json!({"prompt": "Hello", "max_length": 16}),
            200,
            json!({"results": ["Hello there"]}),
        )
        .await;

    let call = fixture
        .client()
        .completion("gpt-j-6b", "Hello")
        .param("max_length", 16)
        .run()
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(
        call.format_default().unwrap(),
        Some(Formatted::Text("Hello there".to_string()))
    );
}

#[tokio::test]
async fn test_encoding_array_with_explicit_versions() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", "/v2/model/nlp/all-minilm-l6-v2/v3/inference")
            .with_status(200)
            .with_body(r#"{"results": [[0.5, 0.25]]}"#)
            .create_async()
            .await
    };

    let call = fixture
        .client()
        .encoding("all-minilm-l6-v2", ["x"])
        .api_version("v2")
        .model_version("v3")
        .run()
        .await
        .unwrap();
    mock.assert_async().await;

    let out = call.format_result(ResultFormat::Array).unwrap().unwrap();
    assert_eq!(out.as_array().unwrap(), &[vec![0.5, 0.25]]);
}

#[tokio::test]
async fn test_pipeline_dict() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_inference(
            "en-core-web-lg",
            json!({"texts": ["Apple is big"]}),
            200,
            json!({"results": [{"ents": [{"text": "Apple", "label": "ORG"}]}]}),
        )
        .await;

    let call = fixture
        .client()
        .pipeline("en-core-web-lg", ["Apple is big"])
        .run()
        .await
        .unwrap();

    let dict = call.format_default().unwrap().unwrap();
    let dict = dict.as_dict().unwrap();
    assert_eq!(dict[&0]["ents"][0]["label"], json!("ORG"));
}

#[tokio::test]
async fn test_prepare_sends_nothing() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called("dialog-tag").await;

    let call = fixture
        .client()
        .classification("dialog-tag", ["hello"])
        .prepare()
        .unwrap();
    assert!(call.result().is_none());
    assert_eq!(call.format_default().unwrap(), None);
    mock.assert_async().await;
}
