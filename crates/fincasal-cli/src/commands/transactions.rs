//! Transaction command implementations

use anyhow::{anyhow, Context, Result};
use fincasal_core::models::parse_amount;
use fincasal_core::{
    Category, NewTransaction, Storage, TransactionStore, TransactionType, TransactionUpdate,
};

use super::{colored_amount, truncate};

pub fn parse_category(input: &str) -> Result<Category> {
    input.parse::<Category>().map_err(|e| {
        let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        anyhow!("{} (expected one of: {})", e, names.join(", ").to_lowercase())
    })
}

pub fn parse_kind(input: &str) -> Result<TransactionType> {
    input.parse::<TransactionType>().map_err(|e| anyhow!(e))
}

pub fn cmd_add<S: Storage>(
    store: &mut TransactionStore<S>,
    description: &str,
    amount: &str,
    category: &str,
    kind: &str,
) -> Result<()> {
    let new = NewTransaction::parse(
        description,
        amount,
        Some(parse_category(category)?),
        parse_kind(kind)?,
    )?;

    let language = store.settings().language;
    let tx = store.add(new, language).context("Failed to save transaction")?;

    println!(
        "✅ Added {} │ {} │ {} │ {}",
        tx.id,
        tx.date,
        colored_amount(tx, language),
        tx.description
    );
    Ok(())
}

pub fn cmd_edit<S: Storage>(
    store: &mut TransactionStore<S>,
    id: &str,
    description: Option<&str>,
    amount: Option<&str>,
    category: Option<&str>,
    kind: Option<&str>,
) -> Result<()> {
    let update = TransactionUpdate {
        description: description.map(str::to_string),
        amount: amount.map(parse_amount).transpose()?,
        category: category.map(parse_category).transpose()?,
        transaction_type: kind.map(parse_kind).transpose()?,
    };

    if update.is_empty() {
        println!("Nothing to change. Pass --description, --amount, --category or --type.");
        return Ok(());
    }

    let language = store.settings().language;
    let tx = store.update(id, update)?;
    println!(
        "✏️  Updated {} │ {} │ {} │ {}",
        tx.id,
        tx.category.label(language),
        colored_amount(tx, language),
        tx.description
    );
    Ok(())
}

pub fn cmd_delete<S: Storage>(store: &mut TransactionStore<S>, id: &str) -> Result<()> {
    let removed = store.delete(id)?;
    println!("🗑️  Deleted {} ({})", removed.id, removed.description);
    Ok(())
}

pub fn cmd_list<S: Storage>(store: &TransactionStore<S>, limit: usize) -> Result<()> {
    let transactions = store.snapshot();

    if transactions.is_empty() {
        println!("No transactions yet. Add one with:");
        println!("  fincasal add \"Mercado\" 80,50 --category food");
        return Ok(());
    }

    let language = store.settings().language;

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions.iter().take(limit) {
        println!(
            "   {} │ {:<10} │ {:>14} │ {:<13} │ {}",
            tx.id,
            tx.date,
            colored_amount(tx, language),
            tx.category.label(language),
            truncate(&tx.description, 30)
        );
    }

    if transactions.len() > limit {
        println!();
        println!("   ... and {} more (use --limit)", transactions.len() - limit);
    }

    Ok(())
}
