//! Summary and report commands

use anyhow::Result;
use fincasal_core::advisor::templates::money;
use fincasal_core::summary::{expense_ratio_percent, ranked_categories, top_expenses};
use fincasal_core::{summarize, Storage, TransactionStore};

use super::{colored_amount, truncate};

pub fn cmd_summary<S: Storage>(store: &TransactionStore<S>, json: bool) -> Result<()> {
    let transactions = store.snapshot();
    let summary = summarize(transactions);
    let categories = ranked_categories(transactions);

    if json {
        let output = serde_json::json!({
            "summary": summary,
            "categories": categories,
            "expense_ratio_percent": expense_ratio_percent(&summary),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let language = store.settings().language;

    println!();
    println!("💰 Summary ({} transactions)", transactions.len());
    println!("   ─────────────────────────────────────");
    println!("   Income:   {:>16}", money(summary.total_income, language));
    println!("   Expenses: {:>16}", money(summary.total_expense, language));
    println!("   Balance:  {:>16}", money(summary.balance, language));

    if !categories.is_empty() {
        println!();
        println!("📊 Spending by Category");
        println!("   ─────────────────────────────────────");
        for total in &categories {
            println!(
                "   {:<14} {:>16}",
                total.category.label(language),
                money(total.amount, language)
            );
        }
    }

    Ok(())
}

pub fn cmd_report<S: Storage>(store: &TransactionStore<S>, top: usize) -> Result<()> {
    let transactions = store.snapshot();
    if transactions.is_empty() {
        println!("No transactions to report on yet.");
        return Ok(());
    }

    let language = store.settings().language;
    let summary = summarize(transactions);

    println!();
    println!("📈 Results Report");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total income:   {}", money(summary.total_income, language));
    println!("   Total expenses: {}", money(summary.total_expense, language));
    println!("   Final balance:  {}", money(summary.balance, language));
    println!(
        "   Expenses use {}% of income",
        expense_ratio_percent(&summary)
    );

    let largest = top_expenses(transactions, top);
    if !largest.is_empty() {
        println!();
        println!("   Largest expenses:");
        for tx in largest {
            println!(
                "   {} │ {:>14} │ {:<13} │ {}",
                tx.date,
                colored_amount(tx, language),
                tx.category.label(language),
                truncate(&tx.description, 30)
            );
        }
    }

    Ok(())
}
