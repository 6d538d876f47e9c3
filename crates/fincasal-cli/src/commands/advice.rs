//! Advisor command

use anyhow::{anyhow, Result};
use fincasal_core::markup::to_plain_text;
use fincasal_core::{
    AdvisorConfig, AdvisorService, AnalysisMode, AnalysisResult, Language, Storage,
    TransactionStore,
};
use tracing::debug;

fn sources_heading(language: Language) -> &'static str {
    match language {
        Language::Pt => "Fontes:",
        Language::En => "Sources:",
        Language::Es => "Fuentes:",
    }
}

fn local_marker(language: Language) -> &'static str {
    match language {
        Language::Pt => "Processado localmente",
        Language::En => "Processed locally",
        Language::Es => "Procesado localmente",
    }
}

/// Terminal rendering of an analysis: plain text, sources, provenance marker
pub fn render_advice(result: &AnalysisResult, language: Language) -> String {
    let mut out = to_plain_text(&result.text).trim_end().to_string();

    if !result.sources.is_empty() {
        out.push_str("\n\n");
        out.push_str(sources_heading(language));
        for source in &result.sources {
            out.push_str(&format!("\n  - {} ({})", source.title, source.uri));
        }
    }

    if result.provenance.is_local() {
        out.push_str(&format!("\n\n\x1b[2m({})\x1b[0m", local_marker(language)));
    }

    out
}

pub async fn cmd_advise<S: Storage>(
    store: &TransactionStore<S>,
    mode: &str,
    lang: Option<&str>,
    offline: bool,
) -> Result<()> {
    let mode = mode.parse::<AnalysisMode>().map_err(|e| anyhow!(e))?;
    let language = lang
        .map(Language::from_tag)
        .unwrap_or(store.settings().language);

    let service = if offline {
        AdvisorService::offline(AdvisorConfig::load()?)
    } else {
        AdvisorService::from_env()?
    };
    debug!(
        mode = %mode,
        language = %language,
        remote = service.remote().map(|r| r.name()).unwrap_or("none"),
        "Requesting advice"
    );

    let result = service
        .request_advice(store.snapshot(), mode, language)
        .await?;

    println!();
    println!("{}", render_advice(&result, language));
    Ok(())
}
