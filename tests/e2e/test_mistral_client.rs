use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use mistral_tts_api::infrastructure::repositories::{
    CompletionRequest, LanguageModelRepository, MistralRepository, UpstreamError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral port and return its base URL
async fn start_upstream(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str) -> MistralRepository {
    MistralRepository::new(
        "test-key".to_string(),
        base_url.to_string(),
        Duration::from_millis(500),
    )
    .expect("Failed to build client")
}

fn completion_request(system_prompt: Option<&str>) -> CompletionRequest {
    CompletionRequest {
        model: "mistral-small-latest".to_string(),
        system_prompt: system_prompt.map(str::to_string),
        prompt: "Hello".to_string(),
        temperature: 0.7,
        max_tokens: 100,
    }
}

async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let roles: Vec<Value> = body["messages"]
        .as_array()
        .map(|messages| messages.iter().map(|m| m["role"].clone()).collect())
        .unwrap_or_default();

    Json(json!({
        "id": "cmpl-1",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": format!("{}|{}", auth, json!(roles)) },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12 }
    }))
}

#[tokio::test]
async fn it_should_send_bearer_auth_and_parse_completion() {
    let base_url =
        start_upstream(Router::new().route("/v1/chat/completions", post(echo_completion))).await;

    let completion = client(&base_url)
        .complete(completion_request(None))
        .await
        .unwrap();

    assert_eq!(completion.model, "mistral-small-latest");
    assert_eq!(completion.content, "Bearer test-key|[\"user\"]");
    assert_eq!(completion.usage.total_tokens, 12);
}

#[tokio::test]
async fn it_should_send_system_prompt_before_user_message() {
    let base_url =
        start_upstream(Router::new().route("/v1/chat/completions", post(echo_completion))).await;

    let completion = client(&base_url)
        .complete(completion_request(Some("Classify the tone")))
        .await
        .unwrap();

    assert!(completion.content.ends_with("[\"system\",\"user\"]"));
}

#[tokio::test]
async fn it_should_list_models() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async {
            Json(json!({
                "object": "list",
                "data": [
                    { "id": "mistral-small-latest", "object": "model", "owned_by": "mistralai" },
                    { "id": "codestral-latest", "object": "model", "owned_by": "mistralai" }
                ]
            }))
        }),
    );
    let base_url = start_upstream(app).await;

    let models = client(&base_url).list_models().await.unwrap();

    let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["mistral-small-latest", "codestral-latest"]);
}

#[tokio::test]
async fn it_should_surface_provider_rejections_with_status_and_message() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized", "request_id": "abc" })),
            )
        }),
    );
    let base_url = start_upstream(app).await;

    let err = client(&base_url)
        .complete(completion_request(None))
        .await
        .unwrap_err();

    match err {
        UpstreamError::Rejected {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_surface_rate_limiting() {
    let app = Router::new().route(
        "/v1/models",
        get(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "detail": "Requests rate limit exceeded" })),
            )
        }),
    );
    let base_url = start_upstream(app).await;

    let err = client(&base_url).list_models().await.unwrap_err();

    assert!(matches!(
        err,
        UpstreamError::Rejected { status: 429, ref message, .. } if message == "Requests rate limit exceeded"
    ));
}

#[tokio::test]
async fn it_should_time_out_slow_upstreams() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    );
    let base_url = start_upstream(app).await;

    let err = client(&base_url)
        .complete(completion_request(None))
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Timeout { .. }), "got {:?}", err);
}

#[tokio::test]
async fn it_should_report_unreachable_upstreams() {
    // Reserve a port, then free it so nothing is listening there
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .list_models()
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::Unavailable { .. }), "got {:?}", err);
}

#[tokio::test]
async fn it_should_reject_malformed_completion_bodies() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { ([("content-type", "application/json")], "{ not json") }),
    );
    let base_url = start_upstream(app).await;

    let err = client(&base_url)
        .complete(completion_request(None))
        .await
        .unwrap_err();

    assert!(
        matches!(err, UpstreamError::InvalidResponse { .. }),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn it_should_reject_completions_without_choices() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "model": "mistral-small-latest", "choices": [] })) }),
    );
    let base_url = start_upstream(app).await;

    let err = client(&base_url)
        .complete(completion_request(None))
        .await
        .unwrap_err();

    assert!(matches!(err, UpstreamError::InvalidResponse { .. }));
}

#[tokio::test]
async fn it_should_not_call_upstream_without_api_key() {
    let repo = MistralRepository::new(
        String::new(),
        "http://127.0.0.1:9".to_string(),
        Duration::from_millis(500),
    )
    .unwrap();

    let err = repo.list_models().await.unwrap_err();

    assert!(matches!(err, UpstreamError::NotConfigured(_)));
}
