//! Analyze command implementation

use anyhow::{Context, Result};
use financas_core::{
    ExpenseAnalysis, ExpenseAnalyzer, ExpenseService, ExtractedExpenseInfo, Transaction,
};

use super::format_brl;

/// Analyze a description and print the result without recording it
pub async fn cmd_analyze(analyzer: &ExpenseAnalyzer, description: &str, json: bool) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        anyhow::bail!("Description is empty");
    }

    let info = analyzer.analyze(description).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_analysis(description, &info, analyzer.mode());
    }

    Ok(())
}

/// Analyze a description, record it and print the stored transaction
pub async fn cmd_analyze_save(
    service: &ExpenseService,
    user_id: &str,
    description: &str,
    json: bool,
) -> Result<Transaction> {
    let transaction = service
        .record_expense(user_id, description)
        .await
        .context("Failed to record expense")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transaction)?);
    } else {
        let info = ExtractedExpenseInfo {
            amount: transaction.amount,
            store: transaction.store.clone(),
            category: transaction.category.clone(),
            transaction_type: transaction.transaction_type,
            confidence: transaction.confidence.unwrap_or_default(),
            raw_analysis: None,
        };
        print_analysis(&transaction.description, &info, service.analyzer().mode());
        println!("   Recorded:   {} (user {})", transaction.id, transaction.user_id);
    }

    Ok(transaction)
}

fn print_analysis(description: &str, info: &ExtractedExpenseInfo, mode: &str) {
    println!();
    println!("🔍 \"{}\"", description);
    println!("   ─────────────────────────────────────────────");
    println!("   Amount:     {}", format_brl(info.amount));
    println!("   Store:      {}", info.store);
    println!("   Category:   {}", info.category);
    println!("   Type:       {}", info.transaction_type);
    println!(
        "   Confidence: {:.0}% ({})",
        info.confidence * 100.0,
        mode
    );
    if let Some(raw) = &info.raw_analysis {
        if !raw.entities.is_empty() {
            let entities: Vec<String> = raw
                .entities
                .iter()
                .map(|e| format!("{} ({:?})", e.text, e.entity_type))
                .collect();
            println!("   Entities:   {}", entities.join(", "));
        }
        if let Some(sentiment) = &raw.sentiment {
            println!("   Sentiment:  {:?}", sentiment.sentiment);
        }
    }
}
