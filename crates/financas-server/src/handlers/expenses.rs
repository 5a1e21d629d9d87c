//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{resolve_user_id, UserQuery};
use crate::{AppError, AppState};
use financas_core::Transaction;

/// Request body for recording an expense
#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    #[serde(default)]
    pub description: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Analysis result returned to the caller
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub categoria: String,
    pub valor: f64,
    pub loja: String,
    pub tipo: String,
    pub confianca: Option<f64>,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

impl From<Transaction> for ExpenseResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            categoria: tx.category,
            valor: tx.amount,
            loja: tx.store,
            tipo: tx.transaction_type.as_str().to_string(),
            confianca: tx.confidence,
            transaction_id: tx.id,
        }
    }
}

/// POST /api/expenses - Analyze a description and record it
pub async fn record_expense(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
    headers: HeaderMap,
    Json(body): Json<ExpenseRequest>,
) -> Result<Json<ExpenseResponse>, AppError> {
    if body.description.trim().is_empty() {
        return Err(AppError::bad_request("description is required"));
    }

    let user_id = resolve_user_id(body.user_id.as_deref(), &headers, &query);
    let transaction = state
        .service
        .record_expense(&user_id, &body.description)
        .await?;

    Ok(Json(transaction.into()))
}
