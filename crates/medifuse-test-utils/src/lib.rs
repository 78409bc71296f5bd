//! Shared testing utilities for the medifuse workspace.
//!
//! - patient/request fixtures used across crates
//! - float comparison helper
//! - a tiny canned HTTP server for exercising the remote backend

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use medifuse_common::entities::AnalysisRequest;
use medifuse_common::patient::RawPatientData;
use serde_json::json;
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use pretty_assertions;

pub const FLOAT_TOLERANCE: f64 = 1e-9;

pub const CARDIAC_NOTES: &str = "patient reports chest pain and shortness of breath";

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Elderly male with a poor lipid panel.
pub fn cardiac_patient() -> RawPatientData {
    serde_json::from_value(json!({
        "age": 70,
        "cholesterol": 250,
        "ldl": 170,
        "hdl": 35,
        "gender": "male"
    }))
    .expect("cardiac fixture must deserialize")
}

pub fn cardiac_request() -> AnalysisRequest {
    AnalysisRequest::new(cardiac_patient(), CARDIAC_NOTES)
}

/// No notes, no patient fields.
pub fn empty_request() -> AnalysisRequest {
    AnalysisRequest::new(RawPatientData::default(), "")
}

#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < FLOAT_TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

// ── Canned HTTP server ───────────────────────────────────────────────────────

type RequestLog = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

/// Serves fixed JSON bodies per `METHOD path` on an ephemeral local port.
/// Unknown routes answer 404. The server task is aborted on drop.
pub struct CannedServer {
    addr: SocketAddr,
    seen: RequestLog,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct CannedServerBuilder {
    routes: Vec<Route>,
}

impl CannedServerBuilder {
    pub fn route(mut self, method: &str, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.into(),
        });
        self
    }

    pub async fn start(self) -> anyhow::Result<CannedServer> {
        let seen: RequestLog = Arc::new(Mutex::new(Vec::new()));

        let mut app = Router::new();
        for route in self.routes {
            let filter = MethodFilter::try_from(route.method.parse::<Method>()?)?;
            let status = StatusCode::from_u16(route.status)?;
            let body = route.body;
            app = app.route(&route.path, on(filter, move || json_reply(status, body.clone())));
        }
        let app = app
            .fallback(|| json_reply(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#.to_string()))
            .layer(middleware::from_fn_with_state(Arc::clone(&seen), record_request));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(CannedServer { addr, seen, handle })
    }
}

impl CannedServer {
    pub fn builder() -> CannedServerBuilder {
        CannedServerBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// `METHOD path` of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("ephemeral port");
    format!("http://127.0.0.1:{port}")
}

async fn json_reply(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn record_request(State(seen): State<RequestLog>, request: Request, next: Next) -> Response {
    if let Ok(mut s) = seen.lock() {
        s.push(format!("{} {}", request.method(), request.uri().path()));
    }
    next.run(request).await
}
