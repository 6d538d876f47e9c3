//! Aggregation over transaction snapshots
//!
//! Everything here is a pure function of a borrowed `&[Transaction]`:
//! totals and balance, expense totals per category, the expense-to-income
//! ratio shown next to the charts, and the largest individual expenses.
//! Amounts are `Decimal` so repeated sums never drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Category, FinancialSummary, Transaction, TransactionType};

/// Ratio ceiling displayed by the charts panel
const MAX_EXPENSE_RATIO_PERCENT: u32 = 999;

/// Expense total for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
}

/// Compute income, expense and balance
///
/// Sums saturate at the `Decimal` bounds instead of overflowing.
pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
    let (total_income, total_expense) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), tx| match tx.transaction_type {
            TransactionType::Income => (income.saturating_add(tx.amount), expense),
            TransactionType::Expense => (income, expense.saturating_add(tx.amount)),
        },
    );

    FinancialSummary {
        total_income,
        total_expense,
        balance: total_income.saturating_sub(total_expense),
    }
}

/// Sum expenses per category, in the order categories are first seen
///
/// Income transactions are ignored whatever their category.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        match totals.iter_mut().find(|t| t.category == tx.category) {
            Some(total) => total.amount = total.amount.saturating_add(tx.amount),
            None => totals.push(CategoryTotal {
                category: tx.category,
                amount: tx.amount,
            }),
        }
    }

    totals
}

/// Expense totals sorted by amount, largest first
///
/// The sort is stable, so on an exact tie the category seen first wins.
pub fn ranked_categories(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals = category_totals(transactions);
    totals.sort_by(|a, b| b.amount.cmp(&a.amount));
    totals
}

/// The category with the highest expense total, if any expense exists
pub fn top_expense_category(transactions: &[Transaction]) -> Option<CategoryTotal> {
    ranked_categories(transactions).into_iter().next()
}

/// Expenses as a percentage of income
///
/// `None` without income, or when the ratio is too large to represent.
pub fn expense_ratio(summary: &FinancialSummary) -> Option<Decimal> {
    if summary.total_income <= Decimal::ZERO {
        return None;
    }
    summary
        .total_expense
        .checked_div(summary.total_income)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Whole-percent share of income spent, capped at 999; zero without income
pub fn expense_ratio_percent(summary: &FinancialSummary) -> u32 {
    if summary.total_income <= Decimal::ZERO {
        return 0;
    }

    match expense_ratio(summary) {
        Some(ratio) => ratio
            .max(Decimal::ZERO)
            .round()
            .to_u32()
            .unwrap_or(MAX_EXPENSE_RATIO_PERCENT)
            .min(MAX_EXPENSE_RATIO_PERCENT),
        None => MAX_EXPENSE_RATIO_PERCENT,
    }
}

/// The `limit` largest expense transactions, ties kept in input order
pub fn top_expenses(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut expenses: Vec<&Transaction> = transactions.iter().filter(|tx| tx.is_expense()).collect();
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    expenses.truncate(limit);
    expenses
}
