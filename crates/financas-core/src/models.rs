//! Domain models for Financas

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::text_analysis::TextAnalysisResult;

/// Store value used when no merchant could be resolved
pub const STORE_NOT_IDENTIFIED: &str = "not identified";

/// Category used when neither keywords nor the store table match
pub const DEFAULT_CATEGORY: &str = "Other";

/// Nature of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransactionType {
    Service,
    #[default]
    Product,
    Subscription,
    Fee,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Product => "Product",
            Self::Subscription => "Subscription",
            Self::Fee => "Fee",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    // Accepts the Portuguese labels too, so hand-edited keyword files can use either
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "service" | "servico" | "serviço" => Ok(Self::Service),
            "product" | "produto" => Ok(Self::Product),
            "subscription" | "assinatura" => Ok(Self::Subscription),
            "fee" | "taxa" => Ok(Self::Fee),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured result of analyzing one expense description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedExpenseInfo {
    /// Amount in BRL, 0 when no amount was found
    pub amount: f64,
    /// Display-cased merchant name or [`STORE_NOT_IDENTIFIED`]
    pub store: String,
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Heuristic certainty in [0.0, 1.0]
    pub confidence: f64,
    /// Entities, key phrases and sentiment, only present when the augmented path ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<TextAnalysisResult>,
}

/// A persisted expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub store: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
    /// Month key (YYYY-MM) derived from `created_at`
    pub month: String,
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<TextAnalysisResult>,
}

impl Transaction {
    /// Build a new record from an analysis result, with a fresh id
    pub fn from_analysis(
        user_id: &str,
        description: &str,
        info: ExtractedExpenseInfo,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            category: info.category,
            amount: info.amount,
            store: info.store,
            transaction_type: info.transaction_type,
            created_at,
            month: month_key(&created_at),
            confidence: Some(info.confidence),
            raw_analysis: info.raw_analysis,
        }
    }
}

/// Per-category totals inside a monthly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CategorySummary {
    pub total: f64,
    pub count: i64,
    /// Share of the month's total, in percent, rounded to 2 decimals
    pub percentage: f64,
}

/// Spending summary for one user and one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub user_id: String,
    pub month: String,
    pub total_spent: f64,
    pub transaction_count: i64,
    pub categories: BTreeMap<String, CategorySummary>,
    pub stores: BTreeMap<String, f64>,
}

/// Format the YYYY-MM month key for a timestamp
pub fn month_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Month key for the current UTC month
pub fn current_month() -> String {
    month_key(&Utc::now())
}

/// Check that a string is a valid YYYY-MM month key
pub fn is_valid_month(month: &str) -> bool {
    month.len() == 7 && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok()
}
