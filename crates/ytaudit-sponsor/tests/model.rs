//! Integration tests for `OpenAiSponsorModel` using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytaudit_core::{SponsorLabel, SponsorRules};
use ytaudit_sponsor::{
    ClassificationFailure, OpenAiSponsorModel, SponsorClassifier, SponsorModel,
};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn test_model(server: &MockServer, timeout_secs: u64) -> OpenAiSponsorModel {
    OpenAiSponsorModel::new("sk-test", "gpt-4o-mini", &server.uri(), timeout_secs)
        .expect("model construction should not fail")
}

#[tokio::test]
async fn extract_sponsor_sends_constrained_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0,
            "max_tokens": 30,
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"sponsor": "Ridge"}"#)))
        .expect(1)
        .mount(&server)
        .await;

    let answer = test_model(&server, 5)
        .extract_sponsor("Use code MK at checkout")
        .await
        .expect("request should succeed");
    assert_eq!(answer.as_deref(), Some("Ridge"));
}

#[tokio::test]
async fn extract_sponsor_accepts_plain_text_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("None")))
        .mount(&server)
        .await;

    let answer = test_model(&server, 5).extract_sponsor("text").await.unwrap();
    assert_eq!(answer, None);
}

#[tokio::test]
async fn non_success_status_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = test_model(&server, 5).extract_sponsor("text").await.unwrap_err();
    assert!(matches!(err, ClassificationFailure::Status(429)), "got: {err:?}");
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = test_model(&server, 5).extract_sponsor("text").await.unwrap_err();
    assert!(
        matches!(err, ClassificationFailure::MalformedResponse(_)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn slow_response_times_out_as_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"sponsor": "Late"}"#))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = test_model(&server, 1).extract_sponsor("text").await.unwrap_err();
    assert!(matches!(err, ClassificationFailure::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn classifier_downgrades_model_errors_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let model: Arc<dyn SponsorModel> = Arc::new(test_model(&server, 5));
    let classifier = SponsorClassifier::new(SponsorRules::default(), Some(model)).unwrap();

    let label = classifier.classify("Use code MK at checkout").await;
    assert_eq!(label, SponsorLabel::None);

    // Failed verdicts are cached like any other.
    let again = classifier.classify("Use code MK at checkout").await;
    assert_eq!(again, SponsorLabel::None);
    assert_eq!(classifier.stats().model_calls, 1);
}
