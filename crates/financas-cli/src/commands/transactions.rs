//! Transaction command implementations

use anyhow::Result;
use financas_core::models::is_valid_month;
use financas_core::{Database, Transaction};

use super::{format_brl, truncate};

/// List a user's transactions, optionally restricted to one month
pub fn cmd_transactions_list(
    db: &Database,
    user_id: &str,
    month: Option<&str>,
    limit: i64,
) -> Result<Vec<Transaction>> {
    let limit = limit.max(1);
    let transactions = match month {
        Some(m) if !is_valid_month(m) => {
            anyhow::bail!("Invalid month '{}', expected YYYY-MM", m)
        }
        Some(m) => {
            let mut txs = db.list_transactions_by_user_and_month(user_id, m)?;
            txs.truncate(limit as usize);
            txs
        }
        None => db.list_transactions_by_user(user_id, limit)?,
    };

    if transactions.is_empty() {
        println!("No transactions found for {}. Record one with:", user_id);
        println!("  financas analyze --save \"Paguei 37 reais no Uber\"");
        return Ok(transactions);
    }

    println!();
    println!("📝 Recent Transactions ({})", user_id);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        println!(
            "   {} │ {:>12} │ {:<14} │ {:<12} │ {}",
            tx.created_at.format("%Y-%m-%d"),
            format_brl(tx.amount),
            truncate(&tx.category, 14),
            truncate(&tx.store, 12),
            truncate(&tx.description, 35)
        );
    }

    Ok(transactions)
}
