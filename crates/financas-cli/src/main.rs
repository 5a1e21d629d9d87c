//! Financas CLI - Expense-description analyzer
//!
//! Usage:
//!   financas analyze "Paguei 37 reais no Uber"   Analyze a description
//!   financas analyze --save "Netflix 29,90"      Analyze and record it
//!   financas report --user ana --month 2024-03   Monthly report
//!   financas serve --port 3000                   Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze {
            text,
            user,
            save,
            json,
        } => {
            let description = text.join(" ");
            if save {
                let service = commands::open_service(&cli.db, cli.rules_only)?;
                commands::cmd_analyze_save(&service, &user, &description, json)
                    .await
                    .map(|_| ())
            } else {
                let analyzer = commands::build_analyzer(cli.rules_only)?;
                commands::cmd_analyze(&analyzer, &description, json).await
            }
        }
        Commands::Transactions { user, month, limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_transactions_list(&db, &user, month.as_deref(), limit).map(|_| ())
        }
        Commands::Report { user, month, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_report_monthly(&db, &user, month.as_deref(), json).map(|_| ())
        }
        Commands::Keywords { path, init, force } => {
            if path {
                commands::cmd_keywords_path()
            } else if init {
                commands::cmd_keywords_init(force)
            } else {
                commands::cmd_keywords_show()
            }
        }
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, &host, port, cli.rules_only).await
        }
    }
}
