//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{resolve_user_id, UserQuery};
use crate::{AppError, AppState, SuccessResponse, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use financas_core::Transaction;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub transactions: Vec<Transaction>,
    pub limit: i64,
}

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`
fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

/// GET /api/transactions - List a user's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
    headers: HeaderMap,
) -> Result<Json<TransactionResponse>, AppError> {
    let user_id = resolve_user_id(
        None,
        &headers,
        &UserQuery {
            user_id: params.user_id,
        },
    );

    // Input validation: clamp pagination parameters
    let limit = clamp_limit(params.limit);
    let transactions = state.db().list_transactions_by_user(&user_id, limit)?;

    Ok(Json(TransactionResponse {
        user_id,
        transactions,
        limit,
    }))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db()
        .get_transaction(&id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db().delete_transaction(&id)? {
        return Err(AppError::not_found("Transaction not found"));
    }

    info!(id = %id, "Transaction deleted");
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(20)), 20);
        assert_eq!(clamp_limit(Some(5000)), MAX_PAGE_LIMIT);
    }
}
