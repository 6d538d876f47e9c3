//! Advisor configuration
//!
//! Per-mode model settings, the remote timeout and the failover markers.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fincasal/config/advisor.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::AnalysisMode;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/advisor.toml");

/// Remote model settings for one analysis mode
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    pub model: String,
    pub temperature: Option<f32>,
    /// Token budget for extended reasoning
    pub thinking_budget: Option<u32>,
    /// Attach the search grounding tool
    pub web_search: bool,
    pub system_instruction: String,
}

impl ModeConfig {
    fn builtin(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Quick => Self {
                model: "gemini-3-flash-preview".to_string(),
                temperature: Some(0.7),
                thinking_budget: None,
                web_search: false,
                system_instruction: "Você é um consultor financeiro ágil. Seja direto e prático."
                    .to_string(),
            },
            AnalysisMode::Deep => Self {
                model: "gemini-3-pro-preview".to_string(),
                temperature: None,
                thinking_budget: Some(32768),
                web_search: false,
                system_instruction: "Você é um mentor financeiro sênior. Use raciocínio profundo para ajudar o casal a prosperar."
                    .to_string(),
            },
            AnalysisMode::Market => Self {
                model: "gemini-3-flash-preview".to_string(),
                temperature: None,
                thinking_budget: None,
                web_search: true,
                system_instruction: "Você é um analista de mercado. Use o Google Search para trazer dados reais e atualizados do Brasil."
                    .to_string(),
            },
        }
    }
}

/// Resolved advisor configuration
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Timeout applied to each remote request
    pub timeout: Duration,
    /// Number of recent transactions listed in prompts
    pub sample_size: usize,
    pub modes: HashMap<AnalysisMode, ModeConfig>,
    /// Reply prefixes that mark a soft failure
    pub error_markers: Vec<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            sample_size: 50,
            modes: AnalysisMode::all()
                .iter()
                .map(|&mode| (mode, ModeConfig::builtin(mode)))
                .collect(),
            error_markers: vec![
                "Erro".to_string(),
                "Error".to_string(),
                "Não foi possível".to_string(),
            ],
        }
    }
}

impl AdvisorConfig {
    /// Load from the default override location, or the embedded defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::from_path(&path),
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// Load from `path` if it exists, otherwise the embedded defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            tracing::debug!(path = %path.display(), "Loaded advisor config override");
            parse_config(&content)
        } else {
            parse_config(DEFAULT_CONFIG)
        }
    }

    /// Settings for a mode, falling back to the built-in values
    pub fn mode(&self, mode: AnalysisMode) -> ModeConfig {
        self.modes
            .get(&mode)
            .cloned()
            .unwrap_or_else(|| ModeConfig::builtin(mode))
    }

    /// True when `text` starts with one of the error markers (case-insensitive)
    pub fn is_error_sentinel(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        self.error_markers
            .iter()
            .filter(|marker| !marker.trim().is_empty())
            .any(|marker| text.starts_with(&marker.trim().to_lowercase()))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fincasal").join("config").join("advisor.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    remote: Option<RawRemote>,
    modes: Option<HashMap<String, RawMode>>,
    failover: Option<RawFailover>,
}

#[derive(Debug, Deserialize)]
struct RawRemote {
    timeout_secs: Option<u64>,
    sample_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawMode {
    model: Option<String>,
    temperature: Option<f32>,
    thinking_budget: Option<u32>,
    web_search: Option<bool>,
    system_instruction: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFailover {
    error_markers: Option<Vec<String>>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AdvisorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AdvisorConfig::default();

    if let Some(remote) = raw.remote {
        if let Some(timeout) = remote.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
        if let Some(sample_size) = remote.sample_size {
            config.sample_size = sample_size;
        }
    }

    if let Some(modes) = raw.modes {
        for (name, raw_mode) in modes {
            let Ok(mode) = name.parse::<AnalysisMode>() else {
                tracing::debug!(mode = %name, "Skipping unknown mode in advisor config");
                continue;
            };

            let base = ModeConfig::builtin(mode);
            config.modes.insert(
                mode,
                ModeConfig {
                    model: raw_mode.model.unwrap_or(base.model),
                    temperature: raw_mode.temperature.or(base.temperature),
                    thinking_budget: raw_mode.thinking_budget.or(base.thinking_budget),
                    web_search: raw_mode.web_search.unwrap_or(base.web_search),
                    system_instruction: raw_mode
                        .system_instruction
                        .unwrap_or(base.system_instruction),
                },
            );
        }
    }

    if let Some(markers) = raw.failover.and_then(|f| f.error_markers) {
        config.error_markers = markers;
    }

    Ok(config)
}
