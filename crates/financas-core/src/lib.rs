//! Financas Core Library
//!
//! Shared functionality for the Financas expense tracker:
//! - Expense-description analysis (amount, store, category, type, confidence)
//! - Keyword tables loaded from TOML
//! - Pluggable text-analysis backends (HTTP service, mock)
//! - SQLite transaction store and monthly reports
//! - Expense service tying analysis and storage together

pub mod analyzer;
pub mod db;
pub mod error;
pub mod keywords;
pub mod models;
pub mod service;
pub mod text_analysis;

/// Test utilities including mock text-analysis server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analyzer::{
    AnalyzerConfig, AnalyzerMode, AugmentedAnalyzer, ExpenseAnalysis, ExpenseAnalyzer,
    FailurePolicy, RuleEngine, DEGRADED_CONFIDENCE,
};
pub use db::{Database, DEFAULT_DB_PATH};
pub use error::{Error, Result};
pub use keywords::KeywordTables;
pub use models::{
    CategorySummary, ExtractedExpenseInfo, MonthlyReport, Transaction, TransactionType,
    DEFAULT_CATEGORY, STORE_NOT_IDENTIFIED,
};
pub use service::{ExpenseService, DEFAULT_USER_ID};
pub use text_analysis::{
    HttpTextAnalysisBackend, MockTextAnalysisBackend, TextAnalysisBackend, TextAnalysisClient,
    TextAnalysisResult,
};
