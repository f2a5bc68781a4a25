//! Test helpers: a throwaway chat-completion server bound to a random local port.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tokio::sync::{Mutex, Notify};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

/// Full router with fresh state, talking to the given completion endpoint.
pub fn test_server(llm_base_url: &str) -> TestServer {
    let config = Config {
        port: 0,
        rust_log: "debug".to_string(),
        openai_base_url: llm_base_url.to_string(),
    };
    let llm = LlmClient::new(config.openai_base_url.clone()).unwrap();
    TestServer::new(build_router(AppState::new(config, llm))).unwrap()
}

/// What the fake endpoint answers with on every call.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Error { status: u16, message: String },
    /// 200 with this exact body, no JSON wrapping.
    Raw(String),
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    count: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    gate: Option<Arc<Notify>>,
}

pub struct FakeLlm {
    pub base_url: String,
    state: FakeState,
}

impl FakeLlm {
    pub fn request_count(&self) -> usize {
        self.state.count.load(Ordering::SeqCst)
    }

    pub async fn last_request(&self) -> Option<Value> {
        self.state.last_body.lock().await.clone()
    }

    pub async fn authorization(&self) -> Option<String> {
        self.state.last_auth.lock().await.clone()
    }

    /// Waits until the endpoint has received at least `n` requests.
    pub async fn wait_for_requests(&self, n: usize) {
        while self.request_count() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Lets one held reply through. Only meaningful for a gated fake.
    pub fn release(&self) {
        if let Some(gate) = &self.state.gate {
            gate.notify_one();
        }
    }
}

pub async fn spawn_fake_llm(reply: FakeReply) -> FakeLlm {
    spawn(reply, None).await
}

/// Like `spawn_fake_llm`, but every reply is held until `FakeLlm::release`.
pub async fn spawn_gated_fake_llm(reply: FakeReply) -> FakeLlm {
    spawn(reply, Some(Arc::new(Notify::new()))).await
}

async fn spawn(reply: FakeReply, gate: Option<Arc<Notify>>) -> FakeLlm {
    let state = FakeState {
        reply,
        count: Arc::new(AtomicUsize::new(0)),
        last_body: Arc::new(Mutex::new(None)),
        last_auth: Arc::new(Mutex::new(None)),
        gate,
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(handle_completion))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeLlm {
        base_url: format!("http://{addr}/v1"),
        state,
    }
}

async fn handle_completion(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.count.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().await = Some(body);
    *state.last_auth.lock().await = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(gate) = &state.gate {
        gate.notified().await;
    }

    match &state.reply {
        FakeReply::Text(text) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": text},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
        }))
        .into_response(),
        FakeReply::Error { status, message } => (
            StatusCode::from_u16(*status).unwrap(),
            Json(json!({
                "error": {"message": message, "type": "invalid_request_error"}
            })),
        )
            .into_response(),
        FakeReply::Raw(body) => (StatusCode::OK, body.clone()).into_response(),
    }
}
