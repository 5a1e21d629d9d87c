//! Text-analysis response types
//!
//! These types are backend-agnostic and used across all text-analysis implementations.
//! Together they form the raw analysis payload retained on augmented results.

use serde::{Deserialize, Serialize};

/// One of the three independent calls made to a text-analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Entities,
    KeyPhrases,
    Sentiment,
}

impl Facet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entities => "entities",
            Self::KeyPhrases => "key-phrases",
            Self::Sentiment => "sentiment",
        }
    }

    pub fn all() -> &'static [Facet] {
        &[Self::Entities, Self::KeyPhrases, Self::Sentiment]
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of entity detected in a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Quantity,
    Organization,
    CommercialItem,
    Person,
    Location,
    Date,
    Event,
    Title,
    #[serde(other)]
    Other,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quantity => "QUANTITY",
            Self::Organization => "ORGANIZATION",
            Self::CommercialItem => "COMMERCIAL_ITEM",
            Self::Person => "PERSON",
            Self::Location => "LOCATION",
            Self::Date => "DATE",
            Self::Event => "EVENT",
            Self::Title => "TITLE",
            Self::Other => "OTHER",
        }
    }

    /// Entities whose text may carry the expense amount
    pub fn may_hold_amount(&self) -> bool {
        matches!(self, Self::Quantity | Self::Other)
    }

    /// Entities whose text may name the merchant
    pub fn may_name_store(&self) -> bool {
        matches!(self, Self::Organization | Self::CommercialItem)
    }
}

/// An entity found in the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Detection confidence (0.0-1.0)
    pub score: f64,
    #[serde(default)]
    pub begin_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
}

/// A key phrase found in the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPhrase {
    pub text: String,
    pub score: f64,
    #[serde(default)]
    pub begin_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
}

/// Overall sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

/// Per-label sentiment scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SentimentScore {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
}

/// Result of sentiment detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: SentimentLabel,
    #[serde(default)]
    pub sentiment_score: Option<SentimentScore>,
}

/// Combined output of the three text-analysis facets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextAnalysisResult {
    #[serde(default)]
    pub entities: Vec<DetectedEntity>,
    #[serde(default)]
    pub key_phrases: Vec<KeyPhrase>,
    #[serde(default)]
    pub sentiment: Option<SentimentAnalysis>,
}

impl TextAnalysisResult {
    /// Mean entity score with each score clamped into `[0, 1]`, `None` when no entity was detected
    pub fn average_entity_score(&self) -> Option<f64> {
        if self.entities.is_empty() {
            return None;
        }
        let sum: f64 = self.entities.iter().map(|e| e.score.clamp(0.0, 1.0)).sum();
        Some(sum / self.entities.len() as f64)
    }
}
