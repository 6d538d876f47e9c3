//! Pluggable remote advisor abstraction
//!
//! # Architecture
//!
//! - `AdvisorBackend` trait: the interface every remote advisor implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AdvisorConfig::load()?;
//! if let Some(client) = AIClient::from_env(&config) {
//!     let context = PromptContext::assemble(&transactions, config.sample_size);
//!     let advice = client.analyze(&context, AnalysisMode::Quick).await?;
//!     println!("{}", advice.text);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (falls back to `API_KEY`); required for gemini
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

mod gemini;
mod mock;
pub mod types;

pub use gemini::{GeminiBackend, DEFAULT_GEMINI_HOST};
pub use mock::{MockBackend, MockReply};
pub use types::*;

use async_trait::async_trait;

use crate::config::AdvisorConfig;
use crate::context::PromptContext;
use crate::error::Result;
use crate::models::AnalysisMode;

/// Trait defining the interface for remote advisors
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Produce advice for `mode` from the assembled context
    ///
    /// Transport failures, non-success statuses and provider error payloads
    /// are `Err`.
    async fn analyze(&self, context: &PromptContext, mode: AnalysisMode) -> Result<RemoteAdvice>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Model used for a mode (for logging)
    fn model_for(&self, mode: AnalysisMode) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Debug, Clone)]
pub enum AIClient {
    /// Google Gemini REST API
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `gemini` (default): needs `GEMINI_API_KEY` or `API_KEY`
    /// - `mock`: canned replies, no network
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env(config: &AdvisorConfig) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env(config).map(AIClient::Gemini),
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env(config).map(AIClient::Gemini)
            }
        }
    }

    pub fn gemini(host: &str, api_key: &str, config: AdvisorConfig) -> Self {
        AIClient::Gemini(GeminiBackend::new(host, api_key, config))
    }

    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend name for display
    pub fn name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Implement AdvisorBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AdvisorBackend for AIClient {
    async fn analyze(&self, context: &PromptContext, mode: AnalysisMode) -> Result<RemoteAdvice> {
        match self {
            AIClient::Gemini(b) => b.analyze(context, mode).await,
            AIClient::Mock(b) => b.analyze(context, mode).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model_for(&self, mode: AnalysisMode) -> &str {
        match self {
            AIClient::Gemini(b) => b.model_for(mode),
            AIClient::Mock(b) => b.model_for(mode),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_delegates_to_mock() {
        let mock = MockBackend::replying("ok");
        let client = AIClient::Mock(mock.clone());

        let advice = client
            .analyze(&PromptContext::assemble(&[], 5), AnalysisMode::Quick)
            .await
            .unwrap();
        assert_eq!(advice.text, "ok");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(client.model_for(AnalysisMode::Deep), "mock");
        assert_eq!(client.name(), "mock");
        assert!(client.health_check().await);
    }

    #[test]
    fn test_gemini_constructor() {
        let client = AIClient::gemini("https://example.test/", "k", AdvisorConfig::default());
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.host(), "https://example.test");
        assert_eq!(client.model_for(AnalysisMode::Quick), "gemini-3-flash-preview");
    }
}
