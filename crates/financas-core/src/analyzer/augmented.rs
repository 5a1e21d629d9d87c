//! Analyzer backed by an external text-analysis service
//!
//! Each call fans out the entities, key-phrases and sentiment requests
//! concurrently and joins them. The outcome is either `Rich` (post-process the
//! facets with the keyword tables) or `Degraded` (rule-only result with the fixed
//! degraded confidence). Every call re-attempts the service; there is no
//! circuit breaker and no retry.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{ExtractedExpenseInfo, STORE_NOT_IDENTIFIED};
use crate::text_analysis::{
    DetectedEntity, Facet, TextAnalysisBackend, TextAnalysisClient, TextAnalysisResult,
    DEFAULT_LANGUAGE,
};

use super::amount::parse_entity_amount;
use super::rules::{RuleEngine, BASE_CONFIDENCE};
use super::text::{normalize, title_case};
use super::{ExpenseAnalysis, FailurePolicy};

/// Rule engine enriched with text-analysis facets
#[derive(Clone)]
pub struct AugmentedAnalyzer {
    rules: RuleEngine,
    client: TextAnalysisClient,
    language: String,
    policy: FailurePolicy,
}

impl AugmentedAnalyzer {
    pub fn new(rules: RuleEngine, client: TextAnalysisClient) -> Self {
        Self {
            rules,
            client,
            language: DEFAULT_LANGUAGE.to_string(),
            policy: FailurePolicy::default(),
        }
    }

    /// Language code sent to the service
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn client(&self) -> &TextAnalysisClient {
        &self.client
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run the three facet calls concurrently and apply the failure policy.
    ///
    /// `None` means the call must degrade.
    async fn gather(&self, description: &str) -> Option<TextAnalysisResult> {
        let (entities, key_phrases, sentiment) = tokio::join!(
            self.client.detect_entities(description, &self.language),
            self.client.detect_key_phrases(description, &self.language),
            self.client.detect_sentiment(description, &self.language),
        );

        let mut failed = 0;
        if let Err(e) = &entities {
            warn!(facet = %Facet::Entities, host = %self.client.host(), error = %e, "Text analysis facet failed");
            failed += 1;
        }
        if let Err(e) = &key_phrases {
            warn!(facet = %Facet::KeyPhrases, host = %self.client.host(), error = %e, "Text analysis facet failed");
            failed += 1;
        }
        if let Err(e) = &sentiment {
            warn!(facet = %Facet::Sentiment, host = %self.client.host(), error = %e, "Text analysis facet failed");
            failed += 1;
        }

        let degrade = match self.policy {
            FailurePolicy::Fallback => failed > 0,
            FailurePolicy::Substitute => failed == Facet::all().len(),
        };
        if degrade {
            return None;
        }

        Some(TextAnalysisResult {
            entities: entities.unwrap_or_default(),
            key_phrases: key_phrases.unwrap_or_default(),
            sentiment: sentiment.ok(),
        })
    }

    /// Amount from quantity-like entities, then from the amount patterns
    pub fn extract_amount(&self, description: &str, analysis: &TextAnalysisResult) -> f64 {
        analysis
            .entities
            .iter()
            .filter(|e| e.entity_type.may_hold_amount())
            .find_map(|e| parse_entity_amount(&e.text))
            .unwrap_or_else(|| self.rules.extract_amount(description))
    }

    /// Store from the store table, then the best organization entity, then a
    /// known brand inside the best-scoring key phrase
    pub fn extract_store(&self, description: &str, analysis: &TextAnalysisResult) -> String {
        if let Some(store) = self.rules.match_known_store(description) {
            return store;
        }

        let mut organizations: Vec<&DetectedEntity> = analysis
            .entities
            .iter()
            .filter(|e| e.entity_type.may_name_store() && !e.text.trim().is_empty())
            .collect();
        organizations.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(entity) = organizations.first() {
            debug!(store = %entity.text, score = entity.score, "Store from entity");
            return entity.text.clone();
        }

        let mut phrases: Vec<_> = analysis.key_phrases.iter().collect();
        phrases.sort_by(|a, b| b.score.total_cmp(&a.score));
        let brands = &self.rules.tables().known_brands;
        for phrase in phrases {
            let text = normalize(&phrase.text);
            if let Some(brand) = brands.iter().find(|b| text.contains(b.as_str())) {
                debug!(brand = %brand, phrase = %phrase.text, "Store from key phrase");
                return title_case(brand);
            }
        }

        STORE_NOT_IDENTIFIED.to_string()
    }

    /// Additive confidence over entity evidence, amount and store
    pub fn confidence(analysis: &TextAnalysisResult, amount: f64, store: &str) -> f64 {
        let mut confidence = BASE_CONFIDENCE;
        if !analysis.entities.is_empty() {
            confidence += 0.2;
        }
        if amount > 0.0 {
            confidence += 0.3;
        }
        if store != STORE_NOT_IDENTIFIED {
            confidence += 0.2;
        }
        if let Some(mean) = analysis.average_entity_score() {
            confidence += 0.1 * mean;
        }
        confidence.clamp(0.0, 1.0)
    }

    fn from_analysis(&self, description: &str, analysis: TextAnalysisResult) -> ExtractedExpenseInfo {
        let amount = self.extract_amount(description, &analysis);
        let store = self.extract_store(description, &analysis);
        let category = self.rules.extract_category(description, &store);
        let transaction_type = self.rules.extract_type(description, &category, &store);
        let confidence = Self::confidence(&analysis, amount, &store);

        ExtractedExpenseInfo {
            amount,
            store,
            category,
            transaction_type,
            confidence,
            raw_analysis: Some(analysis),
        }
    }
}

#[async_trait]
impl ExpenseAnalysis for AugmentedAnalyzer {
    async fn analyze(&self, description: &str) -> ExtractedExpenseInfo {
        match self.gather(description).await {
            Some(analysis) => self.from_analysis(description, analysis),
            None => {
                warn!(policy = %self.policy, "Text analysis unavailable, using local rules");
                self.rules.degraded(description)
            }
        }
    }

    fn mode(&self) -> &'static str {
        "augmented"
    }
}
