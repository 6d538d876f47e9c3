//! Gemini backend implementation
//!
//! HTTP client for the `generateContent` REST endpoint. Per-mode model
//! settings come from [`AdvisorConfig`]; prompt text comes from the
//! [`PromptLibrary`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdvisorConfig;
use crate::context::PromptContext;
use crate::error::{Error, Result};
use crate::models::{AnalysisMode, Source};
use crate::prompts::{PromptId, PromptLibrary};

use super::types::RemoteAdvice;
use super::AdvisorBackend;

/// Public Gemini API endpoint
pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini backend
///
/// # Configuration
///
/// Models and generation settings are read from the advisor config
/// (`~/.local/share/fincasal/config/advisor.toml`):
///
/// ```toml
/// [modes.deep]
/// model = "gemini-3-pro-preview"
/// thinking_budget = 32768
/// ```
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    config: Arc<AdvisorConfig>,
    prompts: PromptLibrary,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    pub fn new(base_url: &str, api_key: &str, config: AdvisorConfig) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            config: Arc::new(config),
            prompts: PromptLibrary::new(),
        }
    }

    /// Replace the prompt library (e.g. embedded-only for tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    /// Create from environment variables
    ///
    /// Reads `GEMINI_API_KEY` (or `API_KEY`) and optionally `GEMINI_HOST`.
    pub fn from_env(config: &AdvisorConfig) -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());
        Some(Self::new(&host, &api_key, config.clone()))
    }

    fn build_request(&self, context: &PromptContext, mode: AnalysisMode) -> Result<GenerateRequest> {
        let mode_config = self.config.mode(mode);
        let prompt = self.prompts.get(PromptId::for_mode(mode))?;
        let vars = context.to_template_vars();

        let system = match prompt.system_section() {
            Some(section) if !section.is_empty() => {
                format!("{}\n\n{}", mode_config.system_instruction, section)
            }
            _ => mode_config.system_instruction.clone(),
        };

        let generation_config = if mode_config.temperature.is_some() || mode_config.thinking_budget.is_some() {
            Some(GenerationConfig {
                temperature: mode_config.temperature,
                thinking_config: mode_config
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            })
        } else {
            None
        };

        Ok(GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.render_user(&vars),
                }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: system }],
            }),
            generation_config,
            tools: if mode_config.web_search {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        })
    }
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// Response from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
    /// Set on reasoning summaries, which are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

/// Turn a decoded response into advice, or the provider error it carries
fn into_advice(response: GenerateResponse) -> Result<RemoteAdvice> {
    if let Some(error) = response.error {
        return Err(Error::Remote(format!(
            "Gemini error {}: {}",
            error.code, error.message
        )));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(RemoteAdvice::new(""));
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|metadata| {
            metadata
                .grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .filter_map(|web| {
                    let uri = web.uri?;
                    let title = web.title.unwrap_or_else(|| uri.clone());
                    Some(Source { uri, title })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(RemoteAdvice { text, sources })
}

#[async_trait]
impl AdvisorBackend for GeminiBackend {
    async fn analyze(&self, context: &PromptContext, mode: AnalysisMode) -> Result<RemoteAdvice> {
        let request = self.build_request(context, mode)?;
        let model = self.model_for(mode);

        debug!(mode = %mode, model = %model, "Sending Gemini request");

        let response = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, model
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(Error::Remote(format!(
                "Gemini returned {}: {}",
                status, message
            )));
        }

        let decoded: GenerateResponse = response.json().await?;
        let advice = into_advice(decoded)?;
        debug!(
            mode = %mode,
            chars = advice.text.len(),
            sources = advice.sources.len(),
            "Gemini response received"
        );

        Ok(advice)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model_for(&self, mode: AnalysisMode) -> &str {
        self.config
            .modes
            .get(&mode)
            .map(|m| m.model.as_str())
            .unwrap_or("gemini-3-flash-preview")
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Transaction, TransactionType};
    use rust_decimal_macros::dec;

    fn backend() -> GeminiBackend {
        GeminiBackend::new("http://localhost:1/", "key", AdvisorConfig::default())
            .with_prompts(PromptLibrary::embedded_only())
    }

    fn context() -> PromptContext {
        let txs = vec![Transaction {
            id: "tx-1".to_string(),
            category: Category::Food,
            description: "Mercado".to_string(),
            amount: dec!(80),
            transaction_type: TransactionType::Expense,
            date: "01/03/2025".to_string(),
        }];
        PromptContext::assemble(&txs, 10)
    }

    #[test]
    fn test_quick_request_shape() {
        let request = backend().build_request(&context(), AnalysisMode::Quick).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        let user = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(user.contains("Mercado (Alimentação) - Saída: R$ 80.00"));
        let system = json["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.starts_with("Você é um consultor financeiro ágil."));
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn test_deep_and_market_request_shape() {
        let deep = serde_json::to_value(backend().build_request(&context(), AnalysisMode::Deep).unwrap()).unwrap();
        assert_eq!(
            deep["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            32768
        );

        let market = serde_json::to_value(backend().build_request(&context(), AnalysisMode::Market).unwrap()).unwrap();
        assert!(market["tools"][0]["google_search"].is_object());
        assert!(market.get("generationConfig").is_none());
        let user = market["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(user.contains("Baseado nos gastos do casal: Alimentação."));
    }

    #[test]
    fn test_into_advice_collects_text_and_sources() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "pensando...", "thought": true},
                    {"text": "<b>Inflação</b> em alta."},
                    {"text": " Ajuste o mercado."}
                ]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://ibge.gov.br", "title": "IBGE"}},
                    {"web": {"uri": "https://bcb.gov.br"}},
                    {"retrievedContext": {}}
                ]}
            }]
        }))
        .unwrap();

        let advice = into_advice(response).unwrap();
        assert_eq!(advice.text, "<b>Inflação</b> em alta. Ajuste o mercado.");
        assert_eq!(advice.sources.len(), 2);
        assert_eq!(advice.sources[0].title, "IBGE");
        assert_eq!(advice.sources[1].title, "https://bcb.gov.br");
    }

    #[test]
    fn test_into_advice_error_payload() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}
        }))
        .unwrap();
        let err = into_advice(response).unwrap_err();
        assert!(err.to_string().contains("Resource exhausted"));
    }

    #[test]
    fn test_into_advice_without_candidates_is_empty() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(into_advice(response).unwrap().text, "");
    }

    #[test]
    fn test_model_for_and_host() {
        let backend = backend();
        assert_eq!(backend.model_for(AnalysisMode::Deep), "gemini-3-pro-preview");
        assert_eq!(backend.host(), "http://localhost:1");
    }
}
