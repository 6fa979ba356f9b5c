use crate::e2e::helpers;

use helpers::fakes::FakeLanguageModel;
use helpers::{TestContext, TestSetup};
use hyper::StatusCode;
use mistral_tts_api::infrastructure::repositories::UpstreamError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_answer_a_chat_message(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/v1/chat", &json!({ "message": "What is Rust?" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["model"], json!("mistral-small-latest"));
    assert_eq!(body["message"], json!("What is Rust?"));
    assert_eq!(body["response"], json!("Processed: What is Rust?"));
    assert_eq!(body["usage"]["completion_tokens"], json!(18));

    let requests = ctx.llm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.7);
    assert_eq!(requests[0].max_tokens, 1000);
    assert!(requests[0].system_prompt.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_chat_generation_settings(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/v1/chat",
            &json!({
                "message": "Tell me a joke",
                "model": "open-mistral-nemo",
                "temperature": 1.5,
                "max_tokens": 64
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body()["model"], json!("open-mistral-nemo"));

    let request = &ctx.llm.requests()[0];
    assert_eq!(request.model, "open-mistral-nemo");
    assert_eq!(request.temperature, 1.5);
    assert_eq!(request.max_tokens, 64);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_chat_message(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/v1/chat", &json!({ "message": "" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Message cannot be empty");
    assert!(ctx.llm.requests().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_zero_max_tokens(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/v1/chat", &json!({ "message": "Hi", "max_tokens": 0 }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.llm.requests().is_empty());
}

#[tokio::test]
async fn it_should_report_unreachable_language_model_as_503() {
    let ctx = TestContext::start(TestSetup {
        llm: Arc::new(FakeLanguageModel::failing(UpstreamError::Unavailable {
            provider: "mistral",
            message: "connection refused".to_string(),
        })),
        ..TestSetup::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/v1/chat", &json!({ "message": "Hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("connection refused");
}

#[tokio::test]
async fn it_should_report_rejected_credentials_as_502() {
    let ctx = TestContext::start(TestSetup {
        llm: Arc::new(FakeLanguageModel::failing(UpstreamError::Rejected {
            provider: "mistral",
            status: 401,
            message: "Unauthorized".to_string(),
        })),
        ..TestSetup::default()
    })
    .await;

    let response = ctx
        .client
        .post("/api/v1/chat", &json!({ "message": "Hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
}
