//! Test utilities for fincasal-core
//!
//! A mock Gemini server speaking just enough of the `generateContent` API
//! for integration tests and offline development.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers `generateContent`
#[derive(Debug, Clone)]
pub enum MockGeminiBehavior {
    /// Reply with a short analysis naming the model; grounding sources are
    /// attached when the request enables search
    Answer,
    /// Reply with this text verbatim
    Text(String),
    /// Reply with an HTTP error status and a Google-style error body
    Status(u16),
    /// Reply 200 with no candidates
    Empty,
}

/// A request received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ServerState {
    behavior: MockGeminiBehavior,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start a server that answers normally
    pub async fn start() -> Self {
        Self::start_with(MockGeminiBehavior::Answer).await
    }

    /// Start the mock server on an available port
    pub async fn start_with(behavior: MockGeminiBehavior) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            behavior,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/v1beta/models", get(handle_models))
            .route("/v1beta/models/:target", post(handle_generate))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing (health check)
async fn handle_models(headers: HeaderMap) -> Response {
    if api_key(&headers).is_none() {
        return error_response(401);
    }
    Json(json!({
        "models": [
            {"name": "models/gemini-3-flash-preview"},
            {"name": "models/gemini-3-pro-preview"}
        ]
    }))
    .into_response()
}

/// `generateContent` endpoint; the path segment is `<model>:generateContent`
async fn handle_generate(
    State(state): State<ServerState>,
    Path(target): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(model) = target.strip_suffix(":generateContent") else {
        return error_response(404);
    };
    let key = api_key(&headers);

    state.requests.lock().unwrap().push(RecordedRequest {
        model: model.to_string(),
        api_key: key.clone(),
        body: body.clone(),
    });

    if key.is_none() {
        return error_response(401);
    }

    match &state.behavior {
        MockGeminiBehavior::Answer => {
            let searched = body["tools"]
                .as_array()
                .is_some_and(|tools| tools.iter().any(|t| t.get("google_search").is_some()));
            let text = format!("<b>Análise remota</b> ({})", model);
            Json(candidate(&text, searched)).into_response()
        }
        MockGeminiBehavior::Text(text) => Json(candidate(text, false)).into_response(),
        MockGeminiBehavior::Status(code) => error_response(*code),
        MockGeminiBehavior::Empty => Json(json!({"candidates": []})).into_response(),
    }
}

fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn candidate(text: &str, with_sources: bool) -> Value {
    let mut candidate = json!({
        "content": {"role": "model", "parts": [{"text": text}]},
        "finishReason": "STOP"
    });
    if with_sources {
        candidate["groundingMetadata"] = json!({
            "groundingChunks": [
                {"web": {"uri": "https://www.ibge.gov.br/ipca", "title": "IPCA - IBGE"}},
                {"web": {"uri": "https://www.bcb.gov.br/selic", "title": "Taxa Selic"}}
            ]
        });
    }
    json!({"candidates": [candidate]})
}

fn error_response(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = json!({
        "error": {
            "code": code,
            "message": format!("Mock failure {}", code),
            "status": status.canonical_reason().unwrap_or("UNKNOWN")
        }
    });
    (status, Json(body)).into_response()
}
