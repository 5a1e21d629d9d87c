//! Expense-description analysis
//!
//! Turns "Paguei 37 reais no Uber" into an [`ExtractedExpenseInfo`].
//!
//! # Architecture
//!
//! - `ExpenseAnalysis` trait: the single `analyze` contract
//! - `RuleEngine`: local keyword/regex rules, no I/O
//! - `AugmentedAnalyzer`: text-analysis facets post-processed with the same rules,
//!   degrading to the rule engine when the service fails
//! - `ExpenseAnalyzer` enum: concrete wrapper providing Clone + compile-time dispatch
//!
//! # Configuration
//!
//! Environment variables:
//! - `ANALYZER_MODE`: rules, augmented or auto. Default: auto (augmented when a
//!   text-analysis backend is configured)
//! - `TEXT_ANALYSIS_LANGUAGE`: language code sent to the service (default: pt)
//! - `TEXT_ANALYSIS_FAILURE_POLICY`: substitute or fallback (default: substitute)
//! - `FINANCAS_KEYWORDS`: keyword table file

pub mod amount;
mod augmented;
mod rules;
pub mod text;

pub use augmented::AugmentedAnalyzer;
pub use rules::{RuleEngine, BASE_CONFIDENCE, DEGRADED_CONFIDENCE};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::keywords::KeywordTables;
use crate::models::ExtractedExpenseInfo;
use crate::text_analysis::{TextAnalysisBackend, TextAnalysisClient, DEFAULT_LANGUAGE};

/// The analysis contract shared by every analyzer
///
/// Never fails: nonsense input still yields a fully-populated result.
#[async_trait]
pub trait ExpenseAnalysis: Send + Sync {
    async fn analyze(&self, description: &str) -> ExtractedExpenseInfo;

    /// Short mode name (for logging and the health endpoint)
    fn mode(&self) -> &'static str;
}

/// What to do when some text-analysis facets fail within one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Failed facets become empty results; degrade only if all of them fail
    #[default]
    Substitute,
    /// Any failed facet degrades the whole call
    Fallback,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substitute => "substitute",
            Self::Fallback => "fallback",
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substitute" | "partial" => Ok(Self::Substitute),
            "fallback" | "strict" => Ok(Self::Fallback),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which analyzer to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerMode {
    /// Augmented when a text-analysis backend is available, rules otherwise
    #[default]
    Auto,
    Rules,
    Augmented,
}

impl std::str::FromStr for AnalyzerMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "rules" | "local" => Ok(Self::Rules),
            "augmented" | "rich" => Ok(Self::Augmented),
            _ => Err(format!("Unknown analyzer mode: {}", s)),
        }
    }
}

/// Analyzer settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub mode: AnalyzerMode,
    pub language: String,
    pub policy: FailurePolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            mode: AnalyzerMode::Auto,
            language: DEFAULT_LANGUAGE.to_string(),
            policy: FailurePolicy::Substitute,
        }
    }
}

impl AnalyzerConfig {
    /// Read settings from environment variables, warning on unparseable values
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = std::env::var("ANALYZER_MODE") {
            match mode.parse() {
                Ok(m) => config.mode = m,
                Err(e) => tracing::warn!(error = %e, "Ignoring ANALYZER_MODE"),
            }
        }
        if let Ok(language) = std::env::var("TEXT_ANALYSIS_LANGUAGE") {
            if !language.trim().is_empty() {
                config.language = language.trim().to_string();
            }
        }
        if let Ok(policy) = std::env::var("TEXT_ANALYSIS_FAILURE_POLICY") {
            match policy.parse() {
                Ok(p) => config.policy = p,
                Err(e) => tracing::warn!(error = %e, "Ignoring TEXT_ANALYSIS_FAILURE_POLICY"),
            }
        }

        config
    }
}

/// Concrete analyzer enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ExpenseAnalyzer {
    Rules(RuleEngine),
    Augmented(AugmentedAnalyzer),
}

impl ExpenseAnalyzer {
    /// Build the analyzer from environment variables and the resolved keyword tables
    pub fn from_env() -> Result<Self> {
        let tables = Arc::new(KeywordTables::load()?);
        Self::build(&AnalyzerConfig::from_env(), tables, TextAnalysisClient::from_env())
    }

    /// Build an analyzer for a mode
    ///
    /// `client` is required for `Augmented`; `Auto` uses it when present.
    pub fn build(
        config: &AnalyzerConfig,
        tables: Arc<KeywordTables>,
        client: Option<TextAnalysisClient>,
    ) -> Result<Self> {
        let rules = RuleEngine::new(tables)?;

        let client = match (config.mode, client) {
            (AnalyzerMode::Rules, _) | (AnalyzerMode::Auto, None) => None,
            (_, Some(client)) => Some(client),
            (AnalyzerMode::Augmented, None) => {
                return Err(Error::Config(
                    "augmented mode requires TEXT_ANALYSIS_HOST or TEXT_ANALYSIS_BACKEND=mock"
                        .to_string(),
                ))
            }
        };

        let analyzer = match client {
            Some(client) => {
                tracing::info!(
                    backend = client.name(),
                    host = client.host(),
                    policy = %config.policy,
                    "Using augmented expense analyzer"
                );
                ExpenseAnalyzer::Augmented(
                    AugmentedAnalyzer::new(rules, client)
                        .with_language(&config.language)
                        .with_policy(config.policy),
                )
            }
            None => {
                tracing::info!("Using rule-based expense analyzer");
                ExpenseAnalyzer::Rules(rules)
            }
        };
        Ok(analyzer)
    }

    /// Rule-only analyzer over the embedded tables
    pub fn rules() -> Result<Self> {
        Ok(ExpenseAnalyzer::Rules(RuleEngine::with_default_tables()?))
    }

    /// Augmented analyzer over the embedded tables with the mock backend
    pub fn mock() -> Result<Self> {
        Ok(ExpenseAnalyzer::Augmented(AugmentedAnalyzer::new(
            RuleEngine::with_default_tables()?,
            TextAnalysisClient::mock(),
        )))
    }

    /// The text-analysis client, when the augmented analyzer is in use
    pub fn text_analysis(&self) -> Option<&TextAnalysisClient> {
        match self {
            ExpenseAnalyzer::Rules(_) => None,
            ExpenseAnalyzer::Augmented(a) => Some(a.client()),
        }
    }

    pub fn tables(&self) -> &KeywordTables {
        match self {
            ExpenseAnalyzer::Rules(r) => r.tables(),
            ExpenseAnalyzer::Augmented(a) => a.rules().tables(),
        }
    }
}

#[async_trait]
impl ExpenseAnalysis for ExpenseAnalyzer {
    async fn analyze(&self, description: &str) -> ExtractedExpenseInfo {
        match self {
            ExpenseAnalyzer::Rules(r) => r.analyze(description).await,
            ExpenseAnalyzer::Augmented(a) => a.analyze(description).await,
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            ExpenseAnalyzer::Rules(r) => r.mode(),
            ExpenseAnalyzer::Augmented(a) => a.mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Arc<KeywordTables> {
        Arc::new(KeywordTables::builtin().unwrap())
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("substitute".parse(), Ok(FailurePolicy::Substitute));
        assert_eq!("FALLBACK".parse(), Ok(FailurePolicy::Fallback));
        assert!("sometimes".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Substitute);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("rules".parse(), Ok(AnalyzerMode::Rules));
        assert_eq!(" Augmented ".parse(), Ok(AnalyzerMode::Augmented));
        assert_eq!("auto".parse(), Ok(AnalyzerMode::Auto));
        assert!("magic".parse::<AnalyzerMode>().is_err());
    }

    #[test]
    fn test_build_auto_without_client_is_rules() {
        let analyzer = ExpenseAnalyzer::build(&AnalyzerConfig::default(), tables(), None).unwrap();
        assert_eq!(analyzer.mode(), "rules");
        assert!(analyzer.text_analysis().is_none());
    }

    #[test]
    fn test_build_auto_with_client_is_augmented() {
        let analyzer = ExpenseAnalyzer::build(
            &AnalyzerConfig::default(),
            tables(),
            Some(TextAnalysisClient::mock()),
        )
        .unwrap();
        assert_eq!(analyzer.mode(), "augmented");
        assert_eq!(analyzer.text_analysis().unwrap().name(), "mock");
    }

    #[test]
    fn test_build_rules_ignores_client() {
        let config = AnalyzerConfig {
            mode: AnalyzerMode::Rules,
            ..Default::default()
        };
        let analyzer =
            ExpenseAnalyzer::build(&config, tables(), Some(TextAnalysisClient::mock())).unwrap();
        assert_eq!(analyzer.mode(), "rules");
    }

    #[test]
    fn test_build_augmented_requires_client() {
        let config = AnalyzerConfig {
            mode: AnalyzerMode::Augmented,
            ..Default::default()
        };
        let result = ExpenseAnalyzer::build(&config, tables(), None);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_both_variants_agree_on_reference_case() {
        for analyzer in [ExpenseAnalyzer::rules().unwrap(), ExpenseAnalyzer::mock().unwrap()] {
            let info = analyzer
                .analyze("Paguei 37 reais no Uber para o trabalho")
                .await;
            assert_eq!(info.amount, 37.0, "{}", analyzer.mode());
            assert_eq!(info.store, "Uber");
            assert_eq!(info.category, "Transport");
            assert_eq!(analyzer.tables().default_category, "Other");
        }
    }
}
