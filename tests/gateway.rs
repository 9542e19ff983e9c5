//! End-to-end tests for the gateway router against a mocked upstream

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chatgate::client::HttpClient;
use chatgate::config::GatewayConfig;
use chatgate::router::{AliasRegistry, KeyPool};
use chatgate::server::{build_router, AppState};
use chatgate::ChatGateway;
use mockito::Matcher;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

const AUTHOR: &str = "tester";

fn app(base_url: &str, keys: &[&str]) -> Router {
    let config = GatewayConfig {
        api_keys: keys.iter().map(|k| k.to_string()).collect(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
        author: AUTHOR.to_string(),
        ..Default::default()
    };
    let gateway = ChatGateway::from_config(&config).unwrap();
    build_router(AppState::new(gateway, AUTHOR))
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "google/gemma-2b-it",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// A local port with nothing listening on it
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_models_lists_aliases_in_order() {
    let app = app("http://127.0.0.1:1/v1", &["k1"]);
    let (status, body) = send(&app, get("/models")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], AUTHOR);

    let listed: Vec<&str> = body["available_models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(listed, AliasRegistry::builtin().aliases());
}

#[tokio::test]
async fn test_get_chat_forwards_and_strips_reasoning() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer k1")
        .match_body(Matcher::PartialJson(json!({
            "model": "google/gemma-2b-it",
            "messages": [{ "role": "user", "content": "Hello there" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("<think>reasoning</think>Hello"))
        .expect(1)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, body) = send(&app, get("/chat?model=GEMMA&prompt=Hello%20there")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "author": AUTHOR, "response": "Hello" }));
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_post_chat_matches_get_chat() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "model": "deepseek-ai/DeepSeek-R1-Distill-Llama-70B-free"
        })))
        .with_status(200)
        .with_body(completion_body("<think>\nstep\n</think>\n\n  Four.  "))
        .expect(2)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);

    let (get_status, get_body) = send(&app, get("/chat?model=deepseek&prompt=2%2B2")).await;
    let (post_status, post_body) =
        send(&app, post_json(r#"{"model": "deepseek", "prompt": "2+2"}"#)).await;

    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(post_status, StatusCode::OK);
    assert_eq!(get_body, post_body);
    assert_eq!(post_body["response"], "Four.");
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_keys_rotate_round_robin() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (key, hits) in [("k1", 2), ("k2", 1), ("k3", 1)] {
        mocks.push(
            server
                .mock("POST", "/v1/chat/completions")
                .match_header("authorization", format!("Bearer {}", key).as_str())
                .with_status(200)
                .with_body(completion_body("ok"))
                .expect(hits)
                .create_async()
                .await,
        );
    }

    let app = app(&format!("{}/v1", server.url()), &["k1", "k2", "k3"]);
    for _ in 0..4 {
        let (status, _) = send(&app, get("/chat?model=gemma&prompt=hi")).await;
        assert_eq!(status, StatusCode::OK);
    }

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_concurrent_requests_spread_over_keys() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for key in ["k1", "k2"] {
        mocks.push(
            server
                .mock("POST", "/v1/chat/completions")
                .match_header("authorization", format!("Bearer {}", key).as_str())
                .with_status(200)
                .with_body(completion_body("ok"))
                .expect(4)
                .create_async()
                .await,
        );
    }

    let app = app(&format!("{}/v1", server.url()), &["k1", "k2"]);
    let results =
        futures::future::join_all((0..8).map(|_| send(&app, get("/chat?model=gemma&prompt=hi"))))
            .await;

    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_missing_fields_are_rejected_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let expected = json!({
        "author": AUTHOR,
        "error": "Both 'model' and 'prompt' parameters are required."
    });

    for request in [
        get("/chat"),
        get("/chat?model=gemma"),
        get("/chat?model=&prompt=hi"),
        post_json(r#"{"model": "gemma"}"#),
        post_json("not json at all"),
        post_json(r#"{"model": 7, "prompt": "hi"}"#),
        Request::builder()
            .method("POST")
            .uri("/chat")
            .body(Body::empty())
            .unwrap(),
    ] {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);
    }

    upstream.assert_async().await;
}

#[tokio::test]
async fn test_whitespace_prompt_is_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [{ "role": "user", "content": "   " }]
        })))
        .with_status(200)
        .with_body(completion_body("ok"))
        .expect(1)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, body) = send(&app, post_json(r#"{"model": "gemma", "prompt": "   "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "ok");
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_padded_alias_is_rejected() {
    let app = app("http://127.0.0.1:1/v1", &["k1"]);
    let (status, body) = send(&app, get("/chat?model=%20gemma%20&prompt=hi")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid model name"));
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = app("http://127.0.0.1:1/v1", &["k1"]);
    let prompt = "x".repeat(3 * 1024 * 1024);
    let request = post_json(&json!({ "model": "gemma", "prompt": prompt }).to_string());

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_model_lists_valid_aliases() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, body) = send(&app, post_json(r#"{"model": "not-a-model", "prompt": "hi"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid model name"));
    for alias in AliasRegistry::builtin().aliases() {
        assert!(error.contains(alias));
    }
    upstream.assert_async().await;
}

#[tokio::test]
async fn test_upstream_rate_limit_is_propagated() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"rate limited"}}"#)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, body) = send(&app, get("/chat?model=gemma&prompt=hi")).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["author"], AUTHOR);
    assert_eq!(body["details"], "rate limited");
}

#[tokio::test]
async fn test_upstream_error_never_echoes_key() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Invalid API key provided: sk-very-secret"}}"#)
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["sk-very-secret"]);
    let (status, body) = send(&app, get("/chat?model=gemma&prompt=hi")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!body.to_string().contains("sk-very-secret"));
    assert_eq!(body["details"], "Invalid API key provided: [REDACTED]");
}

#[tokio::test]
async fn test_reasoning_only_completion_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(completion_body("<think>x</think>"))
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, body) = send(&app, get("/chat?model=deepseek&prompt=hi")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["author"], AUTHOR);
    assert!(body.get("response").is_none());
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let app = app(&format!("{}/v1", server.url()), &["k1"]);
    let (status, _) = send(&app, get("/chat?model=gemma&prompt=hi")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unreachable_upstream_is_gateway_timeout() {
    let app = app(&format!("http://127.0.0.1:{}/v1", closed_port()), &["k1"]);
    let (status, body) = send(&app, get("/chat?model=gemma&prompt=hi")).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["author"], AUTHOR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_silent_upstream_times_out() {
    // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let gateway = ChatGateway::new(
        AliasRegistry::builtin(),
        KeyPool::new(vec!["k1".to_string()]).unwrap(),
        HttpClient::new(Duration::from_millis(300)).unwrap(),
        format!("http://{}/v1/chat/completions", addr),
    );
    let app = build_router(AppState::new(gateway, AUTHOR));

    let (status, body) = send(&app, get("/chat?model=gemma&prompt=hi")).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_health() {
    let app = app("http://127.0.0.1:1/v1", &["k1"]);
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
