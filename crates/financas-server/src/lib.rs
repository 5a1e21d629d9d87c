//! Financas Web Server
//!
//! Axum-based REST API for recording and reporting expenses described in free text.
//!
//! - `POST /api/expenses` analyzes a description and records it
//! - Transaction lookup, listing and deletion
//! - Monthly reports per user
//! - Health with analyzer mode and text-analysis backend status

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use financas_core::{
    Database, Error as CoreError, ExpenseAnalysis, ExpenseAnalyzer, ExpenseService,
    TextAnalysisBackend,
};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Default number of transactions returned by a listing
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared application state
pub struct AppState {
    pub service: ExpenseService,
}

impl AppState {
    pub fn db(&self) -> &Database {
        self.service.db()
    }

    pub fn analyzer(&self) -> &ExpenseAnalyzer {
        self.service.analyzer()
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(service: ExpenseService) -> Router {
    let state = Arc::new(AppState { service });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/expenses", post(handlers::record_expense))
        .route("/transactions", get(handlers::list_transactions))
        .route(
            "/transactions/:id",
            get(handlers::get_transaction).delete(handlers::delete_transaction),
        )
        .route(
            "/reports/monthly",
            get(handlers::monthly_report_query).post(handlers::monthly_report_body),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server with an analyzer and database built by the caller
pub async fn serve(service: ExpenseService, host: &str, port: u16) -> anyhow::Result<()> {
    check_text_analysis(service.analyzer()).await;

    let app = create_router(service);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log analyzer mode and text-analysis backend status
async fn check_text_analysis(analyzer: &ExpenseAnalyzer) {
    match analyzer.text_analysis() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ Text analysis connected: {} ({})",
                    client.host(),
                    client.name()
                );
            } else {
                warn!(
                    "⚠️  Text analysis configured but not responding: {} (descriptions will use keyword rules)",
                    client.host()
                );
            }
        }
        None => {
            info!(
                "ℹ️  Analyzer mode: {} (set TEXT_ANALYSIS_HOST to enable text analysis)",
                analyzer.mode()
            );
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes keep their message, everything else is sanitized
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::InvalidData(msg)) => return Self::bad_request(msg),
            Some(CoreError::NotFound(msg)) => return Self::not_found(msg),
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
