//! Prompt context assembly
//!
//! Gathers what the remote advisor needs from a transaction snapshot: the
//! full aggregate, the category breakdown, a bounded sample of recent
//! transactions and the categories the market prompt looks at.

use std::collections::HashMap;

use crate::advisor::templates::money;
use crate::models::{Category, FinancialSummary, Language, Transaction, TransactionType};
use crate::summary::{ranked_categories, summarize, CategoryTotal};

/// Transactions whose categories seed the market prompt
const RECENT_CATEGORY_COUNT: usize = 5;

/// Assembled context for advisor prompts
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    /// Totals over every transaction, not only the sample
    pub summary: FinancialSummary,
    /// Expense totals, largest first
    pub categories: Vec<CategoryTotal>,
    /// Most recent transactions, newest first
    pub sample: Vec<Transaction>,
    /// Categories of the most recent transactions
    pub recent_categories: Vec<Category>,
    pub transaction_count: usize,
}

impl PromptContext {
    /// Build a context from a snapshot kept newest first
    pub fn assemble(transactions: &[Transaction], sample_size: usize) -> Self {
        Self {
            summary: summarize(transactions),
            categories: ranked_categories(transactions),
            sample: transactions.iter().take(sample_size).cloned().collect(),
            recent_categories: transactions
                .iter()
                .take(RECENT_CATEGORY_COUNT)
                .map(|tx| tx.category)
                .collect(),
            transaction_count: transactions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Convert context to template variables for prompt rendering
    ///
    /// Prompts are written in Portuguese, so labels and amounts use the `pt`
    /// conventions regardless of the interface language.
    pub fn to_template_vars(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();

        let lines = self
            .sample
            .iter()
            .map(transaction_line)
            .collect::<Vec<_>>()
            .join("\n");
        vars.insert("transactions", lines);

        vars.insert("balance", money(self.summary.balance, Language::Pt));
        vars.insert("total_income", money(self.summary.total_income, Language::Pt));
        vars.insert("total_expense", money(self.summary.total_expense, Language::Pt));
        vars.insert("transaction_count", self.transaction_count.to_string());

        if !self.categories.is_empty() {
            let breakdown = self
                .categories
                .iter()
                .map(|total| {
                    format!(
                        "{}: {}",
                        total.category.label(Language::Pt),
                        money(total.amount, Language::Pt)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            vars.insert("category_breakdown", breakdown);
        }

        if !self.recent_categories.is_empty() {
            let recent = self
                .recent_categories
                .iter()
                .map(|c| c.label(Language::Pt))
                .collect::<Vec<_>>()
                .join(", ");
            vars.insert("recent_categories", recent);
        }

        vars
    }
}

fn transaction_line(tx: &Transaction) -> String {
    let kind = match tx.transaction_type {
        TransactionType::Income => "Entrada",
        TransactionType::Expense => "Saída",
    };
    format!(
        "- {}: {} ({}) - {}: {}",
        tx.date,
        tx.description,
        tx.category.label(Language::Pt),
        kind,
        money(tx.amount, Language::Pt)
    )
}
