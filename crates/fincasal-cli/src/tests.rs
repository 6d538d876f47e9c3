//! CLI command tests

use fincasal_core::{
    AIClient, AdvisorConfig, AdvisorService, AnalysisMode, AnalysisResult, Category, Language,
    MemoryStorage, Provenance, Source, TransactionStore, TransactionType,
};
use tempfile::TempDir;

use crate::cli::SettingsArgs;
use crate::commands::{self, truncate};

fn memory_store() -> TransactionStore<MemoryStorage> {
    TransactionStore::load(MemoryStorage::new()).unwrap()
}

fn seeded_store() -> TransactionStore<MemoryStorage> {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "Salário", "1000", "income", "income").unwrap();
    commands::cmd_add(&mut store, "Aluguel", "900", "housing", "expense").unwrap();
    commands::cmd_add(&mut store, "Mercado", "300,00", "food", "expense").unwrap();
    store
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_add_persists_to_data_dir() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = commands::open_store(Some(dir.path())).unwrap();
        commands::cmd_add(&mut store, "  Mercado ", "80,50", "food", "expense").unwrap();
    }

    let store = commands::open_store(Some(dir.path())).unwrap();
    let txs = store.snapshot();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].description, "Mercado");
    assert_eq!(txs[0].amount.to_string(), "80.50");
    assert_eq!(txs[0].category, Category::Food);
    assert_eq!(txs[0].transaction_type, TransactionType::Expense);
    assert!(txs[0].id.starts_with("tx-"));
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let mut store = memory_store();

    assert!(commands::cmd_add(&mut store, "Mercado", "10", "groceries", "expense").is_err());
    assert!(commands::cmd_add(&mut store, "Mercado", "10", "food", "sideways").is_err());
    assert!(commands::cmd_add(&mut store, "Mercado", "0", "food", "expense").is_err());
    assert!(commands::cmd_add(&mut store, "   ", "10", "food", "expense").is_err());
    assert!(store.snapshot().is_empty());
    assert_eq!(store.storage().save_count(), 0);
}

#[test]
fn test_cmd_add_accepts_portuguese_type_names() {
    let mut store = memory_store();
    commands::cmd_add(&mut store, "Freela", "250", "income", "entrada").unwrap();
    assert_eq!(store.snapshot()[0].transaction_type, TransactionType::Income);
}

#[test]
fn test_cmd_edit_keeps_id_and_date() {
    let mut store = seeded_store();
    let original = store.snapshot()[0].clone();

    commands::cmd_edit(
        &mut store,
        &original.id,
        Some("Feira"),
        Some("120,25"),
        Some("leisure"),
        None,
    )
    .unwrap();

    let edited = store.get(&original.id).unwrap();
    assert_eq!(edited.description, "Feira");
    assert_eq!(edited.amount.to_string(), "120.25");
    assert_eq!(edited.category, Category::Leisure);
    assert_eq!(edited.transaction_type, original.transaction_type);
    assert_eq!(edited.date, original.date);
}

#[test]
fn test_cmd_edit_without_changes_is_noop() {
    let mut store = seeded_store();
    let saves = store.storage().save_count();
    let id = store.snapshot()[0].id.clone();

    commands::cmd_edit(&mut store, &id, None, None, None, None).unwrap();
    assert_eq!(store.storage().save_count(), saves);
}

#[test]
fn test_cmd_edit_errors() {
    let mut store = seeded_store();
    let id = store.snapshot()[0].id.clone();

    assert!(commands::cmd_edit(&mut store, "tx-missing", Some("X"), None, None, None).is_err());
    assert!(commands::cmd_edit(&mut store, &id, None, Some("-5"), None, None).is_err());
    assert!(commands::cmd_edit(&mut store, &id, None, None, Some("nope"), None).is_err());
    assert_eq!(store.get(&id).unwrap().description, "Mercado");
}

#[test]
fn test_cmd_delete() {
    let mut store = seeded_store();
    let id = store.snapshot()[1].id.clone();

    commands::cmd_delete(&mut store, &id).unwrap();
    assert_eq!(store.snapshot().len(), 2);
    assert!(store.get(&id).is_none());

    assert!(commands::cmd_delete(&mut store, &id).is_err());
}

#[test]
fn test_cmd_list() {
    assert!(commands::cmd_list(&memory_store(), 20).is_ok());
    assert!(commands::cmd_list(&seeded_store(), 1).is_ok());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_summary_and_report() {
    let empty = memory_store();
    assert!(commands::cmd_summary(&empty, false).is_ok());
    assert!(commands::cmd_summary(&empty, true).is_ok());
    assert!(commands::cmd_report(&empty, 5).is_ok());

    let store = seeded_store();
    assert!(commands::cmd_summary(&store, false).is_ok());
    assert!(commands::cmd_summary(&store, true).is_ok());
    assert!(commands::cmd_report(&store, 1).is_ok());
}

// ========== Settings Command Tests ==========

#[test]
fn test_apply_settings() {
    let store = memory_store();
    let args = SettingsArgs {
        language: Some("en-US".to_string()),
        theme: Some("Forest".to_string()),
        light_mode: Some(true),
        ..Default::default()
    };

    let updated = commands::apply_settings(store.settings(), &args).unwrap();
    assert_eq!(updated.language, Language::En);
    assert_eq!(updated.theme.as_str(), "forest");
    assert!(updated.light_mode);
    assert_eq!(updated.font_size, store.settings().font_size);
}

#[test]
fn test_apply_settings_rejects_unknown_values() {
    let store = memory_store();
    let args = SettingsArgs {
        font_size: Some("huge".to_string()),
        ..Default::default()
    };
    assert!(commands::apply_settings(store.settings(), &args).is_err());

    // Unknown languages fall back to Portuguese instead of failing
    let args = SettingsArgs {
        language: Some("de".to_string()),
        ..Default::default()
    };
    let updated = commands::apply_settings(store.settings(), &args).unwrap();
    assert_eq!(updated.language, Language::Pt);
}

#[test]
fn test_cmd_settings_saves_once() {
    let mut store = memory_store();

    commands::cmd_settings(&mut store, &SettingsArgs::default()).unwrap();
    assert_eq!(store.storage().save_count(), 0);

    let args = SettingsArgs {
        language: Some("es".to_string()),
        font_family: Some("serif".to_string()),
        ..Default::default()
    };
    commands::cmd_settings(&mut store, &args).unwrap();
    assert_eq!(store.settings().language, Language::Es);
    assert_eq!(store.storage().saved_settings().language, Language::Es);
    assert_eq!(store.storage().saved_settings().font_family.as_str(), "serif");
}

// ========== Advice Command Tests ==========

#[test]
fn test_render_advice_marks_local_results() {
    let result = AnalysisResult::local("<b>Atenção:</b> gastos altos.<br/><br/>Dica");
    let rendered = commands::render_advice(&result, Language::Pt);

    assert!(rendered.starts_with("Atenção: gastos altos.\n\nDica"));
    assert!(rendered.contains("Processado localmente"));
    assert!(!rendered.contains("<b>"));

    let english = commands::render_advice(&result, Language::En);
    assert!(english.contains("Processed locally"));
}

#[test]
fn test_render_advice_lists_sources() {
    let result = AnalysisResult::remote(
        "Inflação em alta",
        vec![Source {
            uri: "https://www.ibge.gov.br".to_string(),
            title: "IPCA - IBGE".to_string(),
        }],
    );
    let rendered = commands::render_advice(&result, Language::Pt);

    assert!(rendered.contains("\n\nFontes:\n  - IPCA - IBGE (https://www.ibge.gov.br)"));
    assert!(!rendered.contains("Sources:"));
    assert!(!rendered.contains("Processado localmente"));

    let spanish = commands::render_advice(&result, Language::Es);
    assert!(spanish.contains("Fuentes:"));
}

#[tokio::test]
async fn test_offline_advice_for_seeded_store() {
    let store = seeded_store();
    let service = AdvisorService::offline(AdvisorConfig::default());

    let result = service
        .request_advice(store.snapshot(), AnalysisMode::Quick, Language::En)
        .await
        .unwrap();

    assert_eq!(result.provenance, Provenance::Local);
    assert!(result.text.contains("120.0%"));
    assert!(result.text.contains("<b>Housing</b>"));
}

#[tokio::test]
async fn test_mock_backend_advice_is_remote() {
    let store = seeded_store();
    let service = AdvisorService::new(Some(AIClient::mock()), AdvisorConfig::default());

    let result = service
        .request_advice(store.snapshot(), AnalysisMode::Deep, Language::Pt)
        .await
        .unwrap();

    assert_eq!(result.provenance, Provenance::Remote);
    assert!(!service.is_pending(AnalysisMode::Deep));
}

// ========== Prompts Command Tests ==========

#[test]
fn test_find_prompt_id() {
    assert!(commands::find_prompt_id("quick_advice").is_some());
    assert!(commands::find_prompt_id(" market_advice ").is_some());
    assert!(commands::find_prompt_id("explain_spending").is_none());
}

#[test]
fn test_cmd_prompts_show_unknown_is_ok() {
    assert!(commands::cmd_prompts_show("nope").is_ok());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Mercado", 10), "Mercado");
    assert_eq!(truncate("Supermercado Central", 10), "Superme...");
    assert_eq!(truncate("Alimentação", 8), "Alime...");
}
