//! Advice with remote-first failover
//!
//! `AdvisorService` asks the remote advisor first and falls back to the
//! offline rule engine whenever the remote is missing, errors, or replies
//! with empty or error-shaped text. Callers always get an answer, tagged
//! with where it came from.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::local::local_advice;
use crate::ai::{AIClient, AdvisorBackend, RemoteAdvice};
use crate::config::AdvisorConfig;
use crate::context::PromptContext;
use crate::error::{Error, Result};
use crate::models::{AnalysisMode, AnalysisResult, Language, Transaction};

type InFlight = Arc<Mutex<HashSet<AnalysisMode>>>;

/// Advisory failover controller
#[derive(Debug, Clone)]
pub struct AdvisorService {
    remote: Option<AIClient>,
    config: AdvisorConfig,
    in_flight: InFlight,
}

impl AdvisorService {
    pub fn new(remote: Option<AIClient>, config: AdvisorConfig) -> Self {
        Self {
            remote,
            config,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Service that never contacts a remote advisor
    pub fn offline(config: AdvisorConfig) -> Self {
        Self::new(None, config)
    }

    /// Load the advisor config and pick the remote backend from the environment
    pub fn from_env() -> Result<Self> {
        let config = AdvisorConfig::load()?;
        let remote = AIClient::from_env(&config);
        if remote.is_none() {
            debug!("No remote advisor configured, advice will be computed locally");
        }
        Ok(Self::new(remote, config))
    }

    pub fn remote(&self) -> Option<&AIClient> {
        self.remote.as_ref()
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Get advice for `mode`, never failing
    ///
    /// The remote attempt always completes before any local fallback runs.
    pub async fn get_advice(
        &self,
        transactions: &[Transaction],
        mode: AnalysisMode,
        language: Language,
    ) -> AnalysisResult {
        if transactions.is_empty() {
            debug!(mode = %mode, "No transactions, skipping remote advisor");
            return local_advice(transactions, mode, language);
        }

        let Some(remote) = &self.remote else {
            debug!(mode = %mode, "No remote advisor, using local advice");
            return local_advice(transactions, mode, language);
        };

        let context = PromptContext::assemble(transactions, self.config.sample_size);
        match self.attempt(remote, &context, mode).await {
            Ok(advice) => {
                info!(
                    mode = %mode,
                    model = %remote.model_for(mode),
                    sources = advice.sources.len(),
                    "Remote advice received"
                );
                AnalysisResult::remote(advice.text, advice.sources)
            }
            Err(e) => {
                warn!(mode = %mode, error = %e, "Remote advice failed, falling back to local advisor");
                local_advice(transactions, mode, language)
            }
        }
    }

    /// Mark `mode` as pending; `None` if a request for it is already running
    pub fn begin(&self, mode: AnalysisMode) -> Option<InFlightGuard> {
        let mut pending = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !pending.insert(mode) {
            return None;
        }
        Some(InFlightGuard {
            mode,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// [`get_advice`](Self::get_advice) guarded against duplicate requests per mode
    pub async fn request_advice(
        &self,
        transactions: &[Transaction],
        mode: AnalysisMode,
        language: Language,
    ) -> Result<AnalysisResult> {
        let _guard = self.begin(mode).ok_or(Error::Busy(mode))?;
        Ok(self.get_advice(transactions, mode, language).await)
    }

    pub fn is_pending(&self, mode: AnalysisMode) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&mode)
    }

    /// Call the remote and reject replies that cannot be shown
    async fn attempt(
        &self,
        remote: &AIClient,
        context: &PromptContext,
        mode: AnalysisMode,
    ) -> Result<RemoteAdvice> {
        let advice = remote.analyze(context, mode).await?;
        let text = advice.text.trim();

        if text.is_empty() {
            return Err(Error::Remote("empty reply".into()));
        }
        if self.config.is_error_sentinel(text) {
            return Err(Error::Remote(format!(
                "error-shaped reply: {}",
                text.chars().take(80).collect::<String>()
            )));
        }

        Ok(advice)
    }
}

/// Marks a mode as pending until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    mode: AnalysisMode,
    in_flight: InFlight,
}

impl InFlightGuard {
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.mode);
    }
}
