//! Mock backend for testing
//!
//! Replies with a scripted outcome and counts how often it was asked.
//! Useful for unit tests and for running the CLI without an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::PromptContext;
use crate::error::{Error, Result};
use crate::models::{AnalysisMode, Source};

use super::types::RemoteAdvice;
use super::AdvisorBackend;

/// Scripted outcome for every `analyze` call
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Reply(String),
    ReplyWithSources(String, Vec<Source>),
    /// Return `Error::Remote` with this message
    Fail(String),
    /// Succeed with empty text
    Empty,
}

/// Mock advisor backend
///
/// Clones share the call counter, so a test can hand a clone to the
/// service and still observe how often it was invoked.
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Healthy mock answering with a short canned analysis
    pub fn new() -> Self {
        Self::with_reply(MockReply::Reply(
            "<b>Análise simulada:</b> o casal está no caminho certo.".to_string(),
        ))
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            healthy: true,
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_reply(MockReply::Reply(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(MockReply::Fail(message.to_string()))
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::failing("mock backend is unhealthy")
        }
    }

    /// Number of `analyze` calls made on this mock and its clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisorBackend for MockBackend {
    async fn analyze(&self, _context: &PromptContext, _mode: AnalysisMode) -> Result<RemoteAdvice> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.reply {
            MockReply::Reply(text) => Ok(RemoteAdvice::new(text.clone())),
            MockReply::ReplyWithSources(text, sources) => Ok(RemoteAdvice {
                text: text.clone(),
                sources: sources.clone(),
            }),
            MockReply::Fail(message) => Err(Error::Remote(message.clone())),
            MockReply::Empty => Ok(RemoteAdvice::new("")),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model_for(&self, _mode: AnalysisMode) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext::assemble(&[], 10)
    }

    #[tokio::test]
    async fn test_mock_reply_and_counter_shared_across_clones() {
        let mock = MockBackend::replying("tudo certo");
        let clone = mock.clone();

        let advice = clone.analyze(&context(), AnalysisMode::Quick).await.unwrap();
        assert_eq!(advice.text, "tudo certo");
        assert!(advice.sources.is_empty());

        clone.analyze(&context(), AnalysisMode::Deep).await.unwrap();
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_and_empty() {
        let failing = MockBackend::failing("quota");
        let err = failing.analyze(&context(), AnalysisMode::Market).await.unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m == "quota"));

        let empty = MockBackend::with_reply(MockReply::Empty);
        let advice = empty.analyze(&context(), AnalysisMode::Quick).await.unwrap();
        assert!(advice.text.is_empty());
    }

    #[tokio::test]
    async fn test_mock_sources() {
        let sources = vec![Source {
            uri: "https://example.com/ipca".to_string(),
            title: "IPCA".to_string(),
        }];
        let mock = MockBackend::with_reply(MockReply::ReplyWithSources(
            "mercado".to_string(),
            sources.clone(),
        ));
        let advice = mock.analyze(&context(), AnalysisMode::Market).await.unwrap();
        assert_eq!(advice.sources, sources);
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
