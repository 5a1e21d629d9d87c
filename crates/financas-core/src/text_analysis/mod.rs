//! Pluggable text-analysis backend abstraction
//!
//! The augmented analyzer enriches a description with three facets produced by an
//! external service: detected entities, key phrases and sentiment. This module
//! hides where those facets come from.
//!
//! # Architecture
//!
//! - `TextAnalysisBackend` trait: defines the three facet calls plus health/identity
//! - `TextAnalysisClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpTextAnalysisBackend`, `MockTextAnalysisBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `TEXT_ANALYSIS_BACKEND`: Backend to use (http, mock). Default: http
//! - `TEXT_ANALYSIS_HOST`: Service URL (required for the http backend)
//! - `TEXT_ANALYSIS_TIMEOUT_SECS`: Per-request timeout (default: 10)

mod http;
mod mock;
pub mod types;

pub use http::HttpTextAnalysisBackend;
pub use mock::MockTextAnalysisBackend;
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Language code sent with every request unless configured otherwise
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Trait defining the interface for all text-analysis backends
///
/// Each facet call is independent so callers can run them concurrently and
/// decide per facet what a failure means.
#[async_trait]
pub trait TextAnalysisBackend: Send + Sync {
    /// Detect named entities (quantities, organizations, items, ...)
    async fn detect_entities(&self, text: &str, language: &str) -> Result<Vec<DetectedEntity>>;

    /// Detect key phrases
    async fn detect_key_phrases(&self, text: &str, language: &str) -> Result<Vec<KeyPhrase>>;

    /// Detect overall sentiment
    async fn detect_sentiment(&self, text: &str, language: &str) -> Result<SentimentAnalysis>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Backend name (for logging and the health endpoint)
    fn name(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete text-analysis client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum TextAnalysisClient {
    /// Remote service over HTTP
    Http(HttpTextAnalysisBackend),
    /// Local heuristics for tests and offline use
    Mock(MockTextAnalysisBackend),
}

impl TextAnalysisClient {
    /// Create a client from environment variables
    ///
    /// Checks `TEXT_ANALYSIS_BACKEND`:
    /// - `http` (default): uses TEXT_ANALYSIS_HOST and TEXT_ANALYSIS_TIMEOUT_SECS
    /// - `mock`: local heuristic backend
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("TEXT_ANALYSIS_BACKEND").unwrap_or_else(|_| "http".to_string());

        match backend.to_lowercase().as_str() {
            "http" | "remote" => HttpTextAnalysisBackend::from_env().map(TextAnalysisClient::Http),
            "mock" => Some(TextAnalysisClient::Mock(MockTextAnalysisBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown TEXT_ANALYSIS_BACKEND, falling back to http");
                HttpTextAnalysisBackend::from_env().map(TextAnalysisClient::Http)
            }
        }
    }

    /// Create an HTTP backend directly
    pub fn http(host: &str) -> Self {
        TextAnalysisClient::Http(HttpTextAnalysisBackend::new(host))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        TextAnalysisClient::Mock(MockTextAnalysisBackend::new())
    }
}

// Delegate to the inner backend
#[async_trait]
impl TextAnalysisBackend for TextAnalysisClient {
    async fn detect_entities(&self, text: &str, language: &str) -> Result<Vec<DetectedEntity>> {
        match self {
            TextAnalysisClient::Http(b) => b.detect_entities(text, language).await,
            TextAnalysisClient::Mock(b) => b.detect_entities(text, language).await,
        }
    }

    async fn detect_key_phrases(&self, text: &str, language: &str) -> Result<Vec<KeyPhrase>> {
        match self {
            TextAnalysisClient::Http(b) => b.detect_key_phrases(text, language).await,
            TextAnalysisClient::Mock(b) => b.detect_key_phrases(text, language).await,
        }
    }

    async fn detect_sentiment(&self, text: &str, language: &str) -> Result<SentimentAnalysis> {
        match self {
            TextAnalysisClient::Http(b) => b.detect_sentiment(text, language).await,
            TextAnalysisClient::Mock(b) => b.detect_sentiment(text, language).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            TextAnalysisClient::Http(b) => b.health_check().await,
            TextAnalysisClient::Mock(b) => b.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            TextAnalysisClient::Http(b) => b.name(),
            TextAnalysisClient::Mock(b) => b.name(),
        }
    }

    fn host(&self) -> &str {
        match self {
            TextAnalysisClient::Http(b) => b.host(),
            TextAnalysisClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_mock() {
        let client = TextAnalysisClient::mock();
        assert_eq!(client.name(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[test]
    fn test_client_http_trims_trailing_slash() {
        let client = TextAnalysisClient::http("http://localhost:9000/");
        assert_eq!(client.name(), "http");
        assert_eq!(client.host(), "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = TextAnalysisClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_detects_entities_through_client() {
        let client = TextAnalysisClient::mock();
        let entities = client
            .detect_entities("Paguei 37 reais no Uber", DEFAULT_LANGUAGE)
            .await
            .unwrap();
        assert!(!entities.is_empty());
    }
}
