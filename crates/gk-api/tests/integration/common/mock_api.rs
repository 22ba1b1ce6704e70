//! Mock Gatekeeper REST server for integration tests.
//!
//! Serves the administration endpoints from a single fallback handler and
//! records every request it receives.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Token the mock accepts.
pub const VALID_TOKEN: &str = "tok-123";
/// Password the mock accepts for any username.
pub const VALID_PASSWORD: &str = "hunter2";

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

pub struct MockApiServer {
    addr: SocketAddr,
    requests: Recorded,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApiServer {
    /// Start the mock on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Recorded = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .fallback(handle_request)
            .with_state(requests.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    /// `host:port` to store as the session's server address.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn handle_request(
    State(requests): State<Recorded>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let path = uri.path().to_string();

    requests.lock().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    if method == Method::POST && path == "/auth/login" {
        let password = body
            .as_ref()
            .and_then(|b| b.get("password"))
            .and_then(Value::as_str);
        return if password == Some(VALID_PASSWORD) {
            Json(json!({ "token": VALID_TOKEN })).into_response()
        } else {
            (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
        };
    }

    let expected = format!("Bearer {VALID_TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, "missing or invalid token").into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => Json(json!({ "uptime": 90061 })).into_response(),
        ("POST", ["api", "gatekeeper", "execute-command"]) => {
            let command = body
                .as_ref()
                .and_then(|b| b.get("command"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if command == "broken" {
                return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
            }
            Json(json!({ "success": true, "message": format!("Executed: {command}") }))
                .into_response()
        }
        ("GET", ["api", "gatekeeper", "online-players"]) => Json(json!({
            "players": [
                { "id": "p-1", "name": "Alex", "isOnline": true },
                { "id": "p-2", "name": "Steve", "isOnline": true }
            ]
        }))
        .into_response(),
        ("GET", ["api", "gatekeeper", "player", "garbled"]) => {
            (StatusCode::OK, "<html>not json</html>").into_response()
        }
        ("GET", ["api", "gatekeeper", "player", id]) if *id != "missing" => Json(json!({
            "id": id,
            "name": "Alex",
            "isOnline": true,
            "level": 12,
            "exp": 0.5,
            "gameMode": "CREATIVE",
            "isOp": true,
            "ping": 42,
            "health": 20.0,
            "location": { "x": 1.4, "y": 70.6, "z": -12.5, "world": "world_nether" }
        }))
        .into_response(),
        ("POST", ["api", "gatekeeper", "player", _id, "kick"]) => {
            Json(json!({ "success": true, "message": "Player kicked" })).into_response()
        }
        ("POST", ["api", "gatekeeper", "player", _id, "message"]) => {
            Json(json!({ "success": true, "message": "Message sent" })).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
