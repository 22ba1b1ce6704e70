//! Mock Gatekeeper REST server for controller tests.
//!
//! Behaviour is adjustable while running so tests can change the roster or
//! break the health endpoint between polls.

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
pub const VALID_TOKEN: &str = "console-token";

#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct MockState {
    players: Vec<(String, String)>,
    health_fails: bool,
    uptime: u64,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockApiServer {
    addr: SocketAddr,
    state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl MockApiServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state: Shared = Arc::new(Mutex::new(MockState {
            players: vec![
                ("p-1".to_string(), "Alex".to_string()),
                ("p-2".to_string(), "Steve".to_string()),
            ],
            health_fails: false,
            uptime: 90061,
            requests: Vec::new(),
        }));

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn set_players(&self, players: &[(&str, &str)]) {
        self.state.lock().players = players
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
    }

    pub fn set_health_fails(&self, fails: bool) {
        self.state.lock().health_fails = fails;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn handle_request(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    state.lock().requests.push(RecordedRequest {
        method: method.as_str().to_string(),
        path: path.clone(),
        body: body.clone(),
    });

    let expected = format!("Bearer {VALID_TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing or invalid token").into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => {
            let state = state.lock();
            if state.health_fails {
                return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
            }
            Json(json!({ "uptime": state.uptime })).into_response()
        }
        ("POST", ["api", "gatekeeper", "execute-command"]) => {
            let command = body
                .as_ref()
                .and_then(|b| b.get("command"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match command.as_str() {
                "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
                "unknowncmd" => Json(json!({
                    "success": false,
                    "message": "Unknown command. Type \"/help\" for help."
                }))
                .into_response(),
                _ => Json(json!({ "success": true, "message": format!("Executed: {command}") }))
                    .into_response(),
            }
        }
        ("GET", ["api", "gatekeeper", "online-players"]) => {
            let players: Vec<Value> = state
                .lock()
                .players
                .iter()
                .map(|(id, name)| json!({ "id": id, "name": name, "isOnline": true }))
                .collect();
            Json(json!({ "players": players })).into_response()
        }
        ("GET", ["api", "gatekeeper", "player", "missing"]) => {
            (StatusCode::NOT_FOUND, "no such player").into_response()
        }
        ("GET", ["api", "gatekeeper", "player", id]) => Json(json!({
            "id": id,
            "name": "Alex",
            "isOnline": true,
            "level": 7,
            "exp": 0.75,
            "gameMode": "SURVIVAL",
            "isOp": false,
            "ping": 12,
            "health": 20.0,
            "location": { "x": 100.5, "y": 63.2, "z": -40.49, "world": "world" }
        }))
        .into_response(),
        ("POST", ["api", "gatekeeper", "player", "offline", _action]) => {
            (StatusCode::BAD_REQUEST, "player offline").into_response()
        }
        ("POST", ["api", "gatekeeper", "player", _id, "kick"]) => {
            Json(json!({ "success": true, "message": "Player kicked" })).into_response()
        }
        ("POST", ["api", "gatekeeper", "player", _id, "message"]) => {
            Json(json!({ "success": true, "message": "Message sent" })).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
