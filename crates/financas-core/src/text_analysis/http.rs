//! HTTP text-analysis backend
//!
//! Talks to a text-analysis service exposing one JSON endpoint per facet:
//! - `POST {host}/entities`    -> `{"entities": [...]}`
//! - `POST {host}/key-phrases` -> `{"key_phrases": [...]}`
//! - `POST {host}/sentiment`   -> `{"sentiment": "...", "sentiment_score": {...}}`
//! - `GET  {host}/health`
//!
//! Every POST carries `{"text": ..., "language_code": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{DetectedEntity, KeyPhrase, SentimentAnalysis};
use super::TextAnalysisBackend;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP text-analysis backend
#[derive(Clone, Debug)]
pub struct HttpTextAnalysisBackend {
    http_client: Client,
    base_url: String,
}

impl HttpTextAnalysisBackend {
    /// Create a backend with the default request timeout
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a backend with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `TEXT_ANALYSIS_HOST`
    /// Optional: `TEXT_ANALYSIS_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("TEXT_ANALYSIS_HOST").ok()?;
        let timeout = std::env::var("TEXT_ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self::with_timeout(&host, Duration::from_secs(timeout)))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, text: &str, language: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Text analysis request");

        let response = self
            .http_client
            .post(&url)
            .json(&AnalysisRequest {
                text,
                language_code: language,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TextAnalysis(format!(
                "{} returned {}: {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    text: &'a str,
    language_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: Vec<DetectedEntity>,
}

#[derive(Debug, Deserialize)]
struct KeyPhrasesResponse {
    #[serde(default)]
    key_phrases: Vec<KeyPhrase>,
}

#[async_trait]
impl TextAnalysisBackend for HttpTextAnalysisBackend {
    async fn detect_entities(&self, text: &str, language: &str) -> Result<Vec<DetectedEntity>> {
        let response: EntitiesResponse = self.post("entities", text, language).await?;
        Ok(response.entities)
    }

    async fn detect_key_phrases(&self, text: &str, language: &str) -> Result<Vec<KeyPhrase>> {
        let response: KeyPhrasesResponse = self.post("key-phrases", text, language).await?;
        Ok(response.key_phrases)
    }

    async fn detect_sentiment(&self, text: &str, language: &str) -> Result<SentimentAnalysis> {
        self.post("sentiment", text, language).await
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        "http"
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockTextAnalysisServer;
    use crate::text_analysis::{EntityType, SentimentLabel};

    #[tokio::test]
    async fn test_detect_entities_over_http() {
        let server = MockTextAnalysisServer::start().await;
        let backend = HttpTextAnalysisBackend::new(&server.url());

        let entities = backend
            .detect_entities("Supermercado Extra compras 156,50", "pt")
            .await
            .unwrap();

        assert!(entities
            .iter()
            .any(|e| e.text == "Extra" && e.entity_type == EntityType::Organization));
        assert!(entities
            .iter()
            .any(|e| e.text == "156,50" && e.entity_type == EntityType::Quantity));
    }

    #[tokio::test]
    async fn test_key_phrases_and_sentiment_over_http() {
        let server = MockTextAnalysisServer::start().await;
        let backend = HttpTextAnalysisBackend::new(&server.url());

        let phrases = backend
            .detect_key_phrases("Netflix assinatura mensal 29,90", "pt")
            .await
            .unwrap();
        assert!(phrases.iter().any(|p| p.text == "assinatura"));

        let sentiment = backend
            .detect_sentiment("Netflix assinatura mensal 29,90", "pt")
            .await
            .unwrap();
        assert_eq!(sentiment.sentiment, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockTextAnalysisServer::start().await;
        let backend = HttpTextAnalysisBackend::new(&server.url());
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockTextAnalysisServer::start_failing().await;
        let backend = HttpTextAnalysisBackend::new(&server.url());

        let err = backend.detect_entities("Uber 10", "pt").await.unwrap_err();
        assert!(matches!(err, Error::TextAnalysis(_)));
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let backend =
            HttpTextAnalysisBackend::with_timeout("http://127.0.0.1:1", Duration::from_secs(1));
        assert!(backend.detect_sentiment("oi", "pt").await.is_err());
        assert!(!backend.health_check().await);
    }
}
