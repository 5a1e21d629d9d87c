//! Local keyword/regex rule engine
//!
//! Pure and synchronous: every decision comes from the [`KeywordTables`] and the
//! amount patterns. The augmented analyzer reuses the same category, type and
//! confidence code.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::keywords::KeywordTables;
use crate::models::{ExtractedExpenseInfo, TransactionType, STORE_NOT_IDENTIFIED};

use super::amount::AmountExtractor;
use super::text::{contains_any, normalize};
use super::ExpenseAnalysis;

/// Confidence every analysis starts from
pub const BASE_CONFIDENCE: f64 = 0.3;

/// Fixed confidence reported when the text-analysis service was unavailable
pub const DEGRADED_CONFIDENCE: f64 = 0.5;

/// Keyword/regex analyzer
#[derive(Debug, Clone)]
pub struct RuleEngine {
    tables: Arc<KeywordTables>,
    amounts: AmountExtractor,
}

impl RuleEngine {
    pub fn new(tables: Arc<KeywordTables>) -> Result<Self> {
        Ok(Self {
            tables,
            amounts: AmountExtractor::new()?,
        })
    }

    /// Rule engine over the embedded default tables
    pub fn with_default_tables() -> Result<Self> {
        Self::new(Arc::new(KeywordTables::builtin()?))
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    pub fn extract_amount(&self, description: &str) -> f64 {
        self.amounts.extract(description)
    }

    /// Known-store lookup: first table pattern contained in the description
    pub fn match_known_store(&self, description: &str) -> Option<String> {
        let text = normalize(description);
        self.tables
            .stores
            .iter()
            .find(|s| text.contains(s.pattern.as_str()))
            .map(|s| s.name.clone())
    }

    /// Proper-noun guess: first capitalized token longer than 3 characters that
    /// is not part of a category keyword
    pub fn guess_store(&self, description: &str) -> Option<String> {
        description
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .find(|word| {
                word.chars().count() > 3
                    && word.starts_with(char::is_uppercase)
                    && {
                        let lower = normalize(word);
                        !self.tables.category_keywords().any(|k| k.contains(lower.as_str()))
                    }
            })
            .map(str::to_string)
    }

    /// Store for the rule-only path: known store, then proper-noun guess
    pub fn extract_store(&self, description: &str) -> String {
        self.match_known_store(description)
            .or_else(|| self.guess_store(description))
            .unwrap_or_else(|| STORE_NOT_IDENTIFIED.to_string())
    }

    /// Category from keywords, then from the store, then the default
    pub fn extract_category(&self, description: &str, store: &str) -> String {
        let text = normalize(description);

        if let Some(rule) = self
            .tables
            .categories
            .iter()
            .find(|c| contains_any(&text, &c.keywords))
        {
            debug!(category = %rule.name, "Category keyword matched");
            return rule.name.clone();
        }

        let store = normalize(store);
        if let Some(rule) = self
            .tables
            .store_categories
            .iter()
            .find(|s| store.contains(s.pattern.as_str()))
        {
            debug!(category = %rule.category, store = %store, "Category from store");
            return rule.category.clone();
        }

        self.tables.default_category.clone()
    }

    /// Type from keywords, then from the category defaults
    pub fn extract_type(&self, description: &str, category: &str, _store: &str) -> TransactionType {
        let text = normalize(description);

        if let Some(rule) = self
            .tables
            .types
            .iter()
            .find(|t| contains_any(&text, &t.keywords))
        {
            return rule.transaction_type;
        }

        self.tables
            .category_types
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.resolve(&text))
            .unwrap_or(self.tables.default_type)
    }

    /// Rule-path confidence: base, +0.4 for an amount, +0.3 for a store
    pub fn confidence(amount: f64, store: &str) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if amount > 0.0 {
            confidence += 0.4;
        }
        if store != STORE_NOT_IDENTIFIED {
            confidence += 0.3;
        }
        confidence.min(1.0)
    }

    /// Run every rule over the description
    pub fn analyze_description(&self, description: &str) -> ExtractedExpenseInfo {
        let amount = self.extract_amount(description);
        let store = self.extract_store(description);
        let category = self.extract_category(description, &store);
        let transaction_type = self.extract_type(description, &category, &store);
        let confidence = Self::confidence(amount, &store);

        ExtractedExpenseInfo {
            amount,
            store,
            category,
            transaction_type,
            confidence,
            raw_analysis: None,
        }
    }

    /// Rule-only result with the fixed degraded confidence
    pub fn degraded(&self, description: &str) -> ExtractedExpenseInfo {
        ExtractedExpenseInfo {
            confidence: DEGRADED_CONFIDENCE,
            ..self.analyze_description(description)
        }
    }
}

#[async_trait]
impl ExpenseAnalysis for RuleEngine {
    async fn analyze(&self, description: &str) -> ExtractedExpenseInfo {
        self.analyze_description(description)
    }

    fn mode(&self) -> &'static str {
        "rules"
    }
}
