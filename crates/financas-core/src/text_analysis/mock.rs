//! Mock backend for testing
//!
//! Produces deterministic facets from simple token heuristics, so the augmented
//! analyzer can run without a live service. Each facet can be forced to fail.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{
    DetectedEntity, EntityType, Facet, KeyPhrase, SentimentAnalysis, SentimentLabel,
    SentimentScore,
};
use super::TextAnalysisBackend;

/// Tokens the mock reports as organizations
const MOCK_ORGANIZATIONS: &[&str] = &[
    "uber", "ifood", "netflix", "spotify", "amazon", "carrefour", "extra", "mcdonalds", "subway",
    "shell", "petrobras", "shopee", "magalu",
];

/// Mock text-analysis backend for testing
///
/// Returns predictable responses for all facets.
/// Can be configured with canned facets or forced failures for specific tests.
#[derive(Clone, Debug)]
pub struct MockTextAnalysisBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    failing: HashSet<Facet>,
    entities: Option<Vec<DetectedEntity>>,
    key_phrases: Option<Vec<KeyPhrase>>,
}

impl Default for MockTextAnalysisBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextAnalysisBackend {
    /// Create a new mock backend (healthy, nothing failing)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: HashSet::new(),
            entities: None,
            key_phrases: None,
        }
    }

    /// Create a mock whose every facet fails and whose health check is false
    pub fn unavailable() -> Self {
        let mut mock = Self::new();
        mock.healthy = false;
        mock.failing.extend(Facet::all().iter().copied());
        mock
    }

    /// Make one facet fail
    pub fn failing(mut self, facet: Facet) -> Self {
        self.failing.insert(facet);
        self
    }

    /// Return these entities instead of the heuristic ones
    pub fn with_entities(mut self, entities: Vec<DetectedEntity>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// Return these key phrases instead of the heuristic ones
    pub fn with_key_phrases(mut self, key_phrases: Vec<KeyPhrase>) -> Self {
        self.key_phrases = Some(key_phrases);
        self
    }

    fn check(&self, facet: Facet) -> Result<()> {
        if self.failing.contains(&facet) {
            return Err(Error::TextAnalysis(format!("mock {} failure", facet)));
        }
        Ok(())
    }
}

/// Split text into tokens with their byte offsets
fn tokens(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push((s, &text[s..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

fn heuristic_entities(text: &str) -> Vec<DetectedEntity> {
    let mut entities = Vec::new();
    for (position, (offset, token)) in tokens(text).into_iter().enumerate() {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            continue;
        }
        let lower = word.to_lowercase();

        let detected = if word.chars().any(|c| c.is_ascii_digit()) {
            Some((EntityType::Quantity, 0.9))
        } else if MOCK_ORGANIZATIONS.contains(&lower.as_str()) {
            Some((EntityType::Organization, 0.95))
        } else if position > 0 && word.len() > 3 && word.starts_with(char::is_uppercase) {
            Some((EntityType::Organization, 0.6))
        } else {
            None
        };

        if let Some((entity_type, score)) = detected {
            let begin = offset + token.find(word).unwrap_or(0);
            entities.push(DetectedEntity {
                text: word.to_string(),
                entity_type,
                score,
                begin_offset: begin,
                end_offset: begin + word.len(),
            });
        }
    }
    entities
}

fn heuristic_key_phrases(text: &str) -> Vec<KeyPhrase> {
    tokens(text)
        .into_iter()
        .filter(|(_, token)| token.len() > 3 && !token.chars().any(|c| c.is_ascii_digit()))
        .map(|(offset, token)| KeyPhrase {
            text: token.to_string(),
            score: 0.8,
            begin_offset: offset,
            end_offset: offset + token.len(),
        })
        .collect()
}

fn heuristic_sentiment(text: &str) -> SentimentAnalysis {
    let lower = text.to_lowercase();
    let negative = ["caro", "absurdo", "multa", "juros"]
        .iter()
        .any(|w| lower.contains(w));

    if negative {
        SentimentAnalysis {
            sentiment: SentimentLabel::Negative,
            sentiment_score: Some(SentimentScore {
                positive: 0.05,
                negative: 0.8,
                neutral: 0.1,
                mixed: 0.05,
            }),
        }
    } else {
        SentimentAnalysis {
            sentiment: SentimentLabel::Neutral,
            sentiment_score: Some(SentimentScore {
                positive: 0.05,
                negative: 0.05,
                neutral: 0.85,
                mixed: 0.05,
            }),
        }
    }
}

#[async_trait]
impl TextAnalysisBackend for MockTextAnalysisBackend {
    async fn detect_entities(&self, text: &str, _language: &str) -> Result<Vec<DetectedEntity>> {
        self.check(Facet::Entities)?;
        Ok(self
            .entities
            .clone()
            .unwrap_or_else(|| heuristic_entities(text)))
    }

    async fn detect_key_phrases(&self, text: &str, _language: &str) -> Result<Vec<KeyPhrase>> {
        self.check(Facet::KeyPhrases)?;
        Ok(self
            .key_phrases
            .clone()
            .unwrap_or_else(|| heuristic_key_phrases(text)))
    }

    async fn detect_sentiment(&self, text: &str, _language: &str) -> Result<SentimentAnalysis> {
        self.check(Facet::Sentiment)?;
        Ok(heuristic_sentiment(text))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entities_for_uber_description() {
        let mock = MockTextAnalysisBackend::new();
        let entities = mock
            .detect_entities("Paguei 37 reais no Uber para o trabalho", "pt")
            .await
            .unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "37");
        assert_eq!(entities[0].entity_type, EntityType::Quantity);
        assert_eq!(entities[0].begin_offset, 7);
        assert_eq!(entities[1].text, "Uber");
        assert_eq!(entities[1].entity_type, EntityType::Organization);
    }

    #[tokio::test]
    async fn test_first_word_only_counts_when_known() {
        let mock = MockTextAnalysisBackend::new();
        let entities = mock.detect_entities("Paguei a conta", "pt").await.unwrap();
        assert!(entities.is_empty());

        let entities = mock.detect_entities("Netflix mensal", "pt").await.unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].score, 0.95);
    }

    #[tokio::test]
    async fn test_failing_facet() {
        let mock = MockTextAnalysisBackend::new().failing(Facet::KeyPhrases);
        assert!(mock.detect_entities("Uber 10", "pt").await.is_ok());
        assert!(mock.detect_key_phrases("Uber 10", "pt").await.is_err());
        assert!(mock.detect_sentiment("Uber 10", "pt").await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable() {
        let mock = MockTextAnalysisBackend::unavailable();
        assert!(!mock.health_check().await);
        assert!(mock.detect_entities("x", "pt").await.is_err());
        assert!(mock.detect_key_phrases("x", "pt").await.is_err());
        assert!(mock.detect_sentiment("x", "pt").await.is_err());
    }

    #[tokio::test]
    async fn test_canned_key_phrases() {
        let mock = MockTextAnalysisBackend::new().with_key_phrases(vec![KeyPhrase {
            text: "shopee".into(),
            score: 0.7,
            begin_offset: 0,
            end_offset: 6,
        }]);
        let phrases = mock.detect_key_phrases("anything", "pt").await.unwrap();
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].text, "shopee");
    }

    #[tokio::test]
    async fn test_sentiment() {
        let mock = MockTextAnalysisBackend::new();
        let s = mock.detect_sentiment("multa absurda", "pt").await.unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Negative);
        let s = mock.detect_sentiment("lanche", "pt").await.unwrap();
        assert_eq!(s.sentiment, SentimentLabel::Neutral);
    }
}
