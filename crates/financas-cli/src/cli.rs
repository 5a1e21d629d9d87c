//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use financas_core::{DEFAULT_DB_PATH, DEFAULT_USER_ID};

/// Financas - Turn free-text expense descriptions into a categorized ledger
#[derive(Parser)]
#[command(name = "financas")]
#[command(about = "Expense-description analyzer and ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use keyword rules only, even when a text-analysis service is configured
    #[arg(long, global = true)]
    pub rules_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze an expense description
    ///
    /// Example: financas analyze "Paguei 37 reais no Uber para o trabalho"
    Analyze {
        /// Expense description (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// User the expense belongs to
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,

        /// Record the analyzed expense in the database
        #[arg(short, long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded transactions, newest first
    Transactions {
        /// User whose transactions to list
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,

        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Maximum number of transactions
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Monthly spending report
    Report {
        /// User to report on
        #[arg(short, long, default_value = DEFAULT_USER_ID)]
        user: String,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the keyword tables in use
    Keywords {
        /// Print the override file location and exit
        #[arg(long)]
        path: bool,

        /// Write the default tables to the override location for editing
        #[arg(long)]
        init: bool,

        /// Overwrite an existing override file (with --init)
        #[arg(long, requires = "init")]
        force: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
