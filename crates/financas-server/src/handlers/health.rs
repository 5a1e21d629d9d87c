//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;
use financas_core::{ExpenseAnalysis, TextAnalysisBackend};

/// Text-analysis backend status
#[derive(Debug, Serialize)]
pub struct TextAnalysisHealth {
    pub backend: String,
    pub host: String,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Analyzer in use ("rules" or "augmented")
    pub mode: &'static str,
    #[serde(rename = "textAnalysis", skip_serializing_if = "Option::is_none")]
    pub text_analysis: Option<TextAnalysisHealth>,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health - Analyzer mode and live backend check
///
/// Always 200: an unreachable backend only means descriptions fall back to keyword rules.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let analyzer = state.analyzer();

    let text_analysis = match analyzer.text_analysis() {
        Some(client) => Some(TextAnalysisHealth {
            backend: client.name().to_string(),
            host: client.host().to_string(),
            available: client.health_check().await,
        }),
        None => None,
    };

    Json(HealthStatus {
        status: "ok",
        mode: analyzer.mode(),
        text_analysis,
        timestamp: Utc::now(),
    })
}
