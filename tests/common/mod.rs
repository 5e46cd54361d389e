#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::time::Duration;

use autovideo_client::config::settings::AppConfig;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;

pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedField {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Bytes,
}

impl RecordedField {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

pub struct MockInner {
    pub status_hits: AtomicUsize,
    pub status_fail: AtomicBool,
    pub validate_calls: Mutex<Vec<Vec<RecordedField>>>,
    pub validate_response: Mutex<serde_json::Value>,
    pub validate_fail: AtomicBool,
    pub render_calls: Mutex<Vec<Vec<RecordedField>>>,
    pub render_status: AtomicU16,
    pub render_gate: Mutex<Option<Arc<Notify>>>,
}

#[derive(Clone)]
pub struct MockState(pub Arc<MockInner>);

impl Default for MockState {
    fn default() -> Self {
        Self(Arc::new(MockInner {
            status_hits: AtomicUsize::new(0),
            status_fail: AtomicBool::new(false),
            validate_calls: Mutex::new(Vec::new()),
            validate_response: Mutex::new(json!({"gemini": true, "pexels": true, "pixabay": true})),
            validate_fail: AtomicBool::new(false),
            render_calls: Mutex::new(Vec::new()),
            render_status: AtomicU16::new(200),
            render_gate: Mutex::new(None),
        }))
    }
}

impl MockState {
    pub fn status_hits(&self) -> usize {
        self.0.status_hits.load(Ordering::SeqCst)
    }

    pub fn validate_calls(&self) -> Vec<Vec<RecordedField>> {
        self.0.validate_calls.lock().clone()
    }

    pub fn render_calls(&self) -> Vec<Vec<RecordedField>> {
        self.0.render_calls.lock().clone()
    }

    pub fn fail_status(&self, fail: bool) {
        self.0.status_fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_validation(&self, fail: bool) {
        self.0.validate_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_validate_response(&self, body: serde_json::Value) {
        *self.0.validate_response.lock() = body;
    }

    pub fn set_render_status(&self, status: u16) {
        self.0.render_status.store(status, Ordering::SeqCst);
    }

    /// Holds `/generate-video` responses until the returned gate is notified.
    pub fn hold_renders(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.0.render_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn release_renders(&self) {
        if let Some(gate) = self.0.render_gate.lock().take() {
            gate.notify_one();
        }
    }
}

pub struct MockService {
    pub url: String,
    pub state: MockState,
}

impl MockService {
    pub async fn spawn() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/system-status", get(system_status))
            .route("/validate-keys", post(validate_keys))
            .route("/generate-video", post(generate_video))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self, poll_ms: u64, debounce_ms: u64) -> AppConfig {
        let mut config = AppConfig::with_service_url(&self.url).unwrap();
        config.poll_interval = Duration::from_millis(poll_ms);
        config.debounce = Duration::from_millis(debounce_ms);
        config
    }
}

async fn read_fields(mut multipart: Multipart) -> Vec<RecordedField> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap();
        fields.push(RecordedField { name, file_name, data });
    }
    fields
}

async fn system_status(State(mock): State<MockState>) -> Response {
    let hit = mock.0.status_hits.fetch_add(1, Ordering::SeqCst) + 1;
    if mock.0.status_fail.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    Json(json!({
        "device": format!("GPU #{hit}"),
        "gpu_available": true,
        "cpu_usage": 12.5,
        "memory_usage": 48.0,
        "gpu_stats": {"name": "NVIDIA GeForce RTX 3060", "load": 33.0, "memory": 21.5}
    }))
    .into_response()
}

async fn validate_keys(State(mock): State<MockState>, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    mock.0.validate_calls.lock().push(fields);

    if mock.0.validate_fail.load(Ordering::SeqCst) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    let body = mock.0.validate_response.lock().clone();
    Json(body).into_response()
}

async fn generate_video(State(mock): State<MockState>, multipart: Multipart) -> Response {
    let fields = read_fields(multipart).await;
    mock.0.render_calls.lock().push(fields);

    let gate = mock.0.render_gate.lock().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let status = StatusCode::from_u16(mock.0.render_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !status.is_success() {
        return (status, "render exploded").into_response();
    }

    ([(header::CONTENT_TYPE, "video/mp4")], Bytes::from_static(VIDEO_BYTES)).into_response()
}

/// Polls `condition` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

pub fn names(fields: &[RecordedField]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_str()).collect()
}

pub fn field<'a>(fields: &'a [RecordedField], name: &str) -> Option<&'a RecordedField> {
    fields.iter().find(|f| f.name == name)
}
