//! Shared command utilities
//!
//! This module contains:
//! - `open_db` - Open (and migrate) the database
//! - `build_analyzer` - Select the analyzer from environment and flags
//! - `open_service` - Analyzer plus database

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use financas_core::{
    AnalyzerConfig, AnalyzerMode, Database, ExpenseAnalyzer, ExpenseService, KeywordTables,
};

/// Open the database at `db_path`, creating the schema if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    tracing::debug!(path = %path_str, "Opening database");
    Database::new(path_str).context("Failed to open database")
}

/// Build the analyzer from environment variables
///
/// `rules_only` forces keyword rules even when a text-analysis backend is configured.
pub fn build_analyzer(rules_only: bool) -> Result<ExpenseAnalyzer> {
    if !rules_only {
        tracing::debug!("Selecting analyzer from environment");
        return ExpenseAnalyzer::from_env().context("Failed to build expense analyzer");
    }

    let tables = KeywordTables::load().context("Failed to load keyword tables")?;
    let config = AnalyzerConfig {
        mode: AnalyzerMode::Rules,
        ..AnalyzerConfig::from_env()
    };
    ExpenseAnalyzer::build(&config, Arc::new(tables), None)
        .context("Failed to build expense analyzer")
}

/// Analyzer and database wired into an expense service
pub fn open_service(db_path: &Path, rules_only: bool) -> Result<ExpenseService> {
    let analyzer = build_analyzer(rules_only)?;
    let db = open_db(db_path)?;
    Ok(ExpenseService::new(analyzer, db))
}
