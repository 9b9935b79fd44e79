use std::time::Duration;

use chem_eval::{CallOutcome, EndpointConfig, HttpEndpoint, InferenceBackend};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn endpoint(server: &MockServer) -> HttpEndpoint {
    let config = EndpointConfig::new(format!("{}/v1/chat/completions", server.uri()), "sk-test")
        .with_model("test-model")
        .with_timeout(Duration::from_secs(5));
    HttpEndpoint::new(&config).unwrap()
}

#[tokio::test]
async fn test_sends_single_user_message_and_reads_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "水的化学式是\nA. H2O\n答案：" }],
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "所以答案是A。" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = endpoint(&server).generate("水的化学式是\nA. H2O\n答案：").await;
    assert_eq!(outcome, CallOutcome::Success("所以答案是A。".to_string()));
}

#[tokio::test]
async fn test_error_status_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let outcome = endpoint(&server).generate("q").await;
    assert!(matches!(outcome, CallOutcome::Failure(ref reason) if reason.contains("503")));
}

#[tokio::test]
async fn test_malformed_body_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "A" })))
        .mount(&server)
        .await;

    let outcome = endpoint(&server).generate("q").await;
    assert!(matches!(outcome, CallOutcome::Failure(_)));
}

#[tokio::test]
async fn test_empty_choices_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let outcome = endpoint(&server).generate("q").await;
    assert!(matches!(outcome, CallOutcome::Failure(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_failure() {
    let server = MockServer::start().await;
    let endpoint = endpoint(&server);
    drop(server);

    let outcome = endpoint.generate("q").await;
    assert!(matches!(outcome, CallOutcome::Failure(_)));
}

#[test]
fn test_model_comes_from_config() {
    let config = EndpointConfig::new("http://localhost:1/v1/chat/completions", "k");
    let endpoint = HttpEndpoint::new(&config).unwrap();
    assert_eq!(endpoint.model(), chem_eval::DEFAULT_MODEL);
}
