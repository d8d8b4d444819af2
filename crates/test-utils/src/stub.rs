//! Stub GBIF server for integration tests.
//!
//! Serves `/v1/species` and `/v1/occurrence/search` on `127.0.0.1` with an
//! ephemeral port and records every request URI it receives.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned response for one stub endpoint.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    /// 200 with a JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// 200 with an arbitrary (possibly invalid) body.
    pub fn raw(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Error status with a short JSON body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: r#"{"error":"stub failure"}"#.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Delay the response, for timeout tests.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn respond(&self) -> Response {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

#[derive(Clone)]
struct StubState {
    species: Arc<StubResponse>,
    occurrences: Arc<StubResponse>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubState {
    fn record(&self, uri: &Uri) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(uri.to_string());
        }
    }
}

async fn species_handler(State(state): State<StubState>, uri: Uri) -> Response {
    state.record(&uri);
    state.species.respond().await
}

async fn occurrence_handler(State(state): State<StubState>, uri: Uri) -> Response {
    state.record(&uri);
    state.occurrences.respond().await
}

/// A running stub server. Stops when dropped.
pub struct StubGbif {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubGbif {
    /// Bind to an ephemeral port and start serving.
    pub async fn start(species: StubResponse, occurrences: StubResponse) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            species: Arc::new(species),
            occurrences: Arc::new(occurrences),
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/v1/species", get(species_handler))
            .route("/v1/occurrence/search", get(occurrence_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub fn species_url(&self) -> String {
        format!("{}/v1/species", self.base_url)
    }

    pub fn occurrence_url(&self) -> String {
        format!("{}/v1/occurrence/search", self.base_url)
    }

    /// Path and query of every request received so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Drop for StubGbif {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
