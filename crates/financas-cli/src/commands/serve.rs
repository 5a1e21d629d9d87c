//! Server command implementation

use std::path::Path;

use anyhow::Result;
use financas_core::ExpenseAnalysis;

use super::open_service;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, rules_only: bool) -> Result<()> {
    let service = open_service(db_path, rules_only)?;

    println!("🚀 Starting Financas web server...");
    println!("   Database: {}", db_path.display());
    println!("   Analyzer: {}", service.analyzer().mode());
    println!("   Keywords: {}", service.analyzer().tables().source_label());
    println!("   Listening: http://{}:{}", host, port);
    println!();
    println!("   Press Ctrl+C to stop");

    financas_server::serve(service, host, port).await?;

    Ok(())
}
