//! Keyword table command implementations

use std::path::Path;

use anyhow::{Context, Result};
use financas_core::keywords::{default_config_path, write_default_config};
use financas_core::KeywordTables;

/// Print where the override file is read from
pub fn cmd_keywords_path() -> Result<()> {
    let path = default_config_path().context("No data directory on this platform")?;
    println!("{}", path.display());
    if !path.exists() {
        println!("   (not present, embedded defaults are used)");
    }
    Ok(())
}

/// Copy the embedded tables to the override location
pub fn cmd_keywords_init(force: bool) -> Result<()> {
    let path = default_config_path().context("No data directory on this platform")?;
    keywords_init_at(&path, force)
}

pub fn keywords_init_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    write_default_config(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Wrote default keyword tables to {}", path.display());
    Ok(())
}

/// Summarize the tables the analyzer would use
pub fn cmd_keywords_show() -> Result<()> {
    let tables = KeywordTables::load().context("Failed to load keyword tables")?;
    print_tables(&tables);
    Ok(())
}

pub fn print_tables(tables: &KeywordTables) {
    println!();
    println!("🔑 Keyword tables: {}", tables.source_label());
    println!("   ─────────────────────────────────────────────");

    println!("   Categories (first match wins, default {}):", tables.default_category);
    for rule in &tables.categories {
        println!("     {:<16} {}", rule.name, rule.keywords.join(", "));
    }

    println!("   Types (default {}):", tables.default_type);
    for rule in &tables.types {
        println!(
            "     {:<16} {}",
            rule.transaction_type.as_str(),
            rule.keywords.join(", ")
        );
    }

    println!("   Stores:");
    for rule in &tables.stores {
        println!("     {:<16} → {}", rule.pattern, rule.name);
    }

    if !tables.known_brands.is_empty() {
        println!("   Known brands: {}", tables.known_brands.join(", "));
    }
}
