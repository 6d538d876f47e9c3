//! Prompt Library for the remote advisor
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/fincasal/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::AnalysisMode;

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const QUICK_ADVICE: &str = include_str!("../../../prompts/quick_advice.md");
    pub const DEEP_ADVICE: &str = include_str!("../../../prompts/deep_advice.md");
    pub const MARKET_ADVICE: &str = include_str!("../../../prompts/market_advice.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    QuickAdvice,
    DeepAdvice,
    MarketAdvice,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickAdvice => "quick_advice",
            Self::DeepAdvice => "deep_advice",
            Self::MarketAdvice => "market_advice",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::QuickAdvice, Self::DeepAdvice, Self::MarketAdvice]
    }

    /// The prompt used for an analysis mode
    pub fn for_mode(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Quick => Self::QuickAdvice,
            AnalysisMode::Deep => Self::DeepAdvice,
            AnalysisMode::Market => Self::MarketAdvice,
        }
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::QuickAdvice => defaults::QUICK_ADVICE,
            Self::DeepAdvice => defaults::DEEP_ADVICE,
            Self::MarketAdvice => defaults::MARKET_ADVICE,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    pub mode: AnalysisMode,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    pub is_override: bool,
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the whole prompt with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, String>) -> String {
        substitute(&self.content, vars)
    }

    /// Render just the user section, or the whole prompt if it has none
    pub fn render_user(&self, vars: &HashMap<&str, String>) -> String {
        match self.user_section() {
            Some(user) => substitute(user, vars),
            None => self.render(vars),
        }
    }
}

/// Prompt library resolving overrides against embedded defaults
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    /// Load a prompt, checking the override first
    ///
    /// Files are re-read on every call so edits apply without a restart.
    pub fn get(&self, id: PromptId) -> Result<Prompt> {
        if let Some(override_path) = self.override_path(id).filter(|p| p.exists()) {
            let content = fs::read_to_string(&override_path).map_err(|e| {
                Error::InvalidData(format!("Failed to read prompt override: {}", e))
            })?;
            let (metadata, body) = parse_prompt(&content)?;
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let prompt = self.get(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.as_ref().map(|p| p.metadata.version).unwrap_or(0),
                    mode: prompt
                        .as_ref()
                        .map(|p| p.metadata.mode.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    has_override,
                    override_path: if has_override {
                        self.override_path(id)
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: String,
    pub version: u32,
    pub mode: String,
    pub has_override: bool,
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("fincasal").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    let Some(rest) = content.strip_prefix("---") else {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    };

    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Up to the next header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Resolve conditionals, then replace `{{var}}` placeholders
fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = resolve_conditionals(template, vars);
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Keep `{{#if var}}...{{/if}}` blocks whose variable is set and non-empty
fn resolve_conditionals(content: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = content.to_string();

    while let Some(if_start) = result.find("{{#if ") {
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].trim();
        let block_start = var_start + var_end + 2;

        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_content = &result[block_start..block_start + endif_pos];
        let full_end = block_start + endif_pos + 7;

        let keep = vars.get(var_name).is_some_and(|v| !v.is_empty());
        result = if keep {
            format!("{}{}{}", &result[..if_start], block_content, &result[full_end..])
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: quick_advice
version: 2
mode: quick
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "quick_advice");
        assert_eq!(metadata.version, 2);
        assert_eq!(metadata.mode, AnalysisMode::Quick);
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(parse_prompt("# System\nno frontmatter").is_err());
        assert!(parse_prompt("---\nid: x\n# never closed").is_err());
    }

    #[test]
    fn test_extract_section() {
        let content = "# System\nSystem content here.\n\n# User\nUser content here.";
        assert_eq!(extract_section(content, "# System"), Some("System content here."));
        assert_eq!(extract_section(content, "# User"), Some("User content here."));
        assert_eq!(extract_section(content, "# Other"), None);
    }

    #[test]
    fn test_conditional_blocks() {
        let content = "Start{{#if category}}\nCategory: {{category}}{{/if}}\nEnd";

        let result = substitute(content, &vars(&[("category", "Lazer")]));
        assert_eq!(result, "Start\nCategory: Lazer\nEnd");

        let result = substitute(content, &vars(&[]));
        assert_eq!(result, "Start\nEnd");

        let result = substitute(content, &vars(&[("category", "")]));
        assert!(!result.contains("Category:"));
    }

    #[test]
    fn test_embedded_prompts_parse_and_match_modes() {
        let lib = PromptLibrary::embedded_only();
        for mode in AnalysisMode::all() {
            let id = PromptId::for_mode(*mode);
            let prompt = lib.get(id).unwrap();
            assert_eq!(prompt.metadata.id, id.as_str());
            assert_eq!(prompt.metadata.mode, *mode);
            assert!(!prompt.is_override);
            assert!(prompt.system_section().is_some());
            assert!(prompt.user_section().is_some());
        }
    }

    #[test]
    fn test_render_user_quick_prompt() {
        let lib = PromptLibrary::embedded_only();
        let prompt = lib.get(PromptId::QuickAdvice).unwrap();
        let rendered = prompt.render_user(&vars(&[
            ("transactions", "- 01/03/2025: Mercado (Alimentação) - Saída: R$ 80.00"),
            ("balance", "R$ 920.00"),
            ("total_income", "R$ 1000.00"),
            ("total_expense", "R$ 80.00"),
            ("transaction_count", "2"),
        ]));

        assert!(rendered.contains("Mercado (Alimentação)"));
        assert!(rendered.contains("Saldo total: R$ 920.00"));
        assert!(!rendered.contains("{{"));
        assert!(!rendered.contains("Gastos por categoria"));
        assert!(!rendered.contains("# System"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("deep_advice.md"),
            "---\nid: deep_advice\nversion: 9\nmode: deep\n---\n# User\nCustom {{balance}}",
        )
        .unwrap();

        let lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        let prompt = lib.get(PromptId::DeepAdvice).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 9);
        assert_eq!(
            prompt.render_user(&vars(&[("balance", "R$ 1.00")])),
            "Custom R$ 1.00"
        );

        let listed = lib.list();
        assert_eq!(listed.len(), 3);
        let deep = listed.iter().find(|p| p.id == "deep_advice").unwrap();
        assert!(deep.has_override);
        assert!(deep.override_path.is_some());
        let quick = listed.iter().find(|p| p.id == "quick_advice").unwrap();
        assert!(!quick.has_override);
        assert_eq!(quick.mode, "quick");
    }
}
