//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advice` - Advisor requests (quick, deep, market)
//! - `prompts` - Prompt library management commands
//! - `reports` - Summary and results report
//! - `settings` - Application settings
//! - `transactions` - Transaction commands (add, edit, delete, list)

pub mod advice;
pub mod prompts;
pub mod reports;
pub mod settings;
pub mod transactions;

use std::path::Path;

use anyhow::{Context, Result};
use fincasal_core::advisor::templates::money;
use fincasal_core::{JsonFileStorage, Language, Transaction, TransactionStore};

// Re-export command functions for main.rs
pub use advice::*;
pub use prompts::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;

/// Open the store in `data_dir`, or the platform data directory
pub fn open_store(data_dir: Option<&Path>) -> Result<TransactionStore<JsonFileStorage>> {
    let storage = match data_dir {
        Some(dir) => JsonFileStorage::new(dir),
        None => JsonFileStorage::default_location()?,
    };
    let dir = storage.dir().display().to_string();
    TransactionStore::load(storage).with_context(|| format!("Failed to load data from {}", dir))
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Signed currency amount, red for expenses and green for income
pub fn colored_amount(tx: &Transaction, language: Language) -> String {
    let text = money(tx.amount, language);
    if tx.is_expense() {
        format!("\x1b[31m-{}\x1b[0m", text)
    } else {
        format!("\x1b[32m+{}\x1b[0m", text)
    }
}
