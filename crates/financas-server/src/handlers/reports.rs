//! Report handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use financas_core::{CategorySummary, MonthlyReport};

/// Monthly report parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportRequest {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    pub month: Option<String>,
}

/// Monthly report as returned by the API
#[derive(Debug, Serialize)]
pub struct MonthlyReportResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub month: String,
    #[serde(rename = "totalGastos")]
    pub total_gastos: f64,
    pub transacoes: i64,
    pub categorias: BTreeMap<String, CategorySummary>,
    pub lojas: BTreeMap<String, f64>,
}

impl From<MonthlyReport> for MonthlyReportResponse {
    fn from(report: MonthlyReport) -> Self {
        Self {
            user_id: report.user_id,
            month: report.month,
            total_gastos: report.total_spent,
            transacoes: report.transaction_count,
            categorias: report.categories,
            lojas: report.stores,
        }
    }
}

fn build_report(
    state: &AppState,
    request: &MonthlyReportRequest,
) -> Result<Json<MonthlyReportResponse>, AppError> {
    // Missing userId and malformed months surface as 400 through the service
    let report = state
        .service
        .monthly_report(&request.user_id, request.month.as_deref())?;
    Ok(Json(report.into()))
}

/// GET /api/reports/monthly?userId=&month= - Monthly spending report
pub async fn monthly_report_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MonthlyReportRequest>,
) -> Result<Json<MonthlyReportResponse>, AppError> {
    build_report(&state, &params)
}

/// POST /api/reports/monthly - Monthly spending report from a JSON body
pub async fn monthly_report_body(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MonthlyReportRequest>,
) -> Result<Json<MonthlyReportResponse>, AppError> {
    build_report(&state, &body)
}
