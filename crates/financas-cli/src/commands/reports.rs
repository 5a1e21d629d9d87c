//! Report command implementations

use anyhow::{Context, Result};
use financas_core::models::{current_month, is_valid_month};
use financas_core::{Database, MonthlyReport};

use super::{format_brl, truncate};

/// Print one user's monthly report
pub fn cmd_report_monthly(
    db: &Database,
    user_id: &str,
    month: Option<&str>,
    json: bool,
) -> Result<MonthlyReport> {
    let month = match month {
        Some(m) if !is_valid_month(m) => {
            anyhow::bail!("Invalid month '{}', expected YYYY-MM", m)
        }
        Some(m) => m.to_string(),
        None => current_month(),
    };

    let report = db
        .monthly_report(user_id, &month)
        .context("Failed to build monthly report")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    println!();
    println!("📊 Monthly Report: {} ({})", report.month, report.user_id);
    println!("   ─────────────────────────────────────────────");
    println!("   Total spent:  {}", format_brl(report.total_spent));
    println!("   Transactions: {}", report.transaction_count);

    if report.transaction_count == 0 {
        return Ok(report);
    }

    // Largest categories first
    let mut categories: Vec<_> = report.categories.iter().collect();
    categories.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    println!();
    println!("   By category:");
    for (name, summary) in categories {
        println!(
            "   {:<16} {:>12} {:>6.2}%  ({} tx)",
            truncate(name, 16),
            format_brl(summary.total),
            summary.percentage,
            summary.count
        );
    }

    let mut stores: Vec<_> = report.stores.iter().collect();
    stores.sort_by(|a, b| b.1.total_cmp(a.1));

    println!();
    println!("   By store:");
    for (name, total) in stores {
        println!("   {:<16} {:>12}", truncate(name, 16), format_brl(*total));
    }

    Ok(report)
}
