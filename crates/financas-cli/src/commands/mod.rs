//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db, build_analyzer, open_service)
//! - `analyze` - Analyze a description, optionally recording it
//! - `transactions` - Transaction listing
//! - `reports` - Monthly report
//! - `keywords` - Keyword table inspection and override setup
//! - `serve` - Web server command

pub mod analyze;
pub mod core;
pub mod keywords;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use keywords::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount in BRL
pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount).replace('.', ",")
}
