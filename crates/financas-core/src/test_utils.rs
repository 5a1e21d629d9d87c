//! Test utilities for financas-core
//!
//! This module provides a mock text-analysis HTTP server that answers the
//! entities, key-phrases and sentiment endpoints with the mock backend heuristics.

use std::net::SocketAddr;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::text_analysis::{
    DetectedEntity, KeyPhrase, MockTextAnalysisBackend, SentimentAnalysis, TextAnalysisBackend,
};

/// Mock text-analysis server for testing and development
pub struct MockTextAnalysisServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone)]
struct ServerState {
    backend: MockTextAnalysisBackend,
    failing: bool,
}

impl MockTextAnalysisServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(false).await
    }

    /// Start a server that answers every request with 500
    pub async fn start_failing() -> Self {
        Self::start_with(true).await
    }

    async fn start_with(failing: bool) -> Self {
        let state = ServerState {
            backend: MockTextAnalysisBackend::new(),
            failing,
        };
        let app = Router::new()
            .route("/health", get(handle_health))
            .route("/entities", post(handle_entities))
            .route("/key-phrases", post(handle_key_phrases))
            .route("/sentiment", post(handle_sentiment))
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
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockTextAnalysisServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    text: String,
    language_code: String,
}

#[derive(Debug, Serialize)]
struct EntitiesResponse {
    entities: Vec<DetectedEntity>,
}

#[derive(Debug, Serialize)]
struct KeyPhrasesResponse {
    key_phrases: Vec<KeyPhrase>,
}

type HandlerResult<T> = std::result::Result<Json<T>, (StatusCode, String)>;

fn unavailable() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "service unavailable".to_string(),
    )
}

async fn handle_health(State(state): State<ServerState>) -> StatusCode {
    if state.failing {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

async fn handle_entities(
    State(state): State<ServerState>,
    Json(request): Json<AnalysisRequest>,
) -> HandlerResult<EntitiesResponse> {
    if state.failing {
        return Err(unavailable());
    }
    let entities = state
        .backend
        .detect_entities(&request.text, &request.language_code)
        .await
        .map_err(|_| unavailable())?;
    Ok(Json(EntitiesResponse { entities }))
}

async fn handle_key_phrases(
    State(state): State<ServerState>,
    Json(request): Json<AnalysisRequest>,
) -> HandlerResult<KeyPhrasesResponse> {
    if state.failing {
        return Err(unavailable());
    }
    let key_phrases = state
        .backend
        .detect_key_phrases(&request.text, &request.language_code)
        .await
        .map_err(|_| unavailable())?;
    Ok(Json(KeyPhrasesResponse { key_phrases }))
}

async fn handle_sentiment(
    State(state): State<ServerState>,
    Json(request): Json<AnalysisRequest>,
) -> HandlerResult<SentimentAnalysis> {
    if state.failing {
        return Err(unavailable());
    }
    state
        .backend
        .detect_sentiment(&request.text, &request.language_code)
        .await
        .map(Json)
        .map_err(|_| unavailable())
}
