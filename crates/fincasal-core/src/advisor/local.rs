//! Offline rule engine
//!
//! Produces advice from the aggregate alone, with no network access. Used
//! whenever the remote advisor is missing or fails, so it must always
//! return something readable.

use rust_decimal::Decimal;

use super::templates::{fill, money, percent, Messages};
use crate::markup::{bold, list, LINE_BREAK};
use crate::models::{AnalysisMode, AnalysisResult, FinancialSummary, Language, Transaction};
use crate::summary::{category_totals, expense_ratio, summarize, top_expense_category};

/// Months of expenses an emergency reserve should cover
const RESERVE_MONTHS: i64 = 6;

/// Build advice for `mode` from the transactions, tagged as local
pub fn local_advice(
    transactions: &[Transaction],
    mode: AnalysisMode,
    language: Language,
) -> AnalysisResult {
    let messages = Messages::for_language(language);

    if transactions.is_empty() {
        return AnalysisResult::local(messages.no_data);
    }

    let summary = summarize(transactions);
    let text = match mode {
        AnalysisMode::Quick => quick(transactions, &summary, messages, language),
        AnalysisMode::Deep => deep(&summary, messages, language),
        AnalysisMode::Market => market(transactions, messages, language),
    };

    AnalysisResult::local(text)
}

fn quick(
    transactions: &[Transaction],
    summary: &FinancialSummary,
    messages: &Messages,
    language: Language,
) -> String {
    let status = if summary.balance >= Decimal::ZERO {
        fill(
            messages.quick_healthy,
            &[("balance", &money(summary.balance, language))],
        )
    } else {
        let ratio_clause = match expense_ratio(summary) {
            Some(ratio) => fill(messages.quick_ratio_clause, &[("ratio", &percent(ratio))]),
            None => String::new(),
        };
        fill(
            messages.quick_warning,
            &[
                ("expense", &money(summary.total_expense, language)),
                ("ratio_clause", &ratio_clause),
            ],
        )
    };

    match top_expense_category(transactions) {
        Some(top) => {
            let tip = fill(
                messages.quick_tip,
                &[("category", &bold(top.category.label(language)))],
            );
            format!("{status}{LINE_BREAK}{LINE_BREAK}{tip}")
        }
        None => status,
    }
}

fn deep(summary: &FinancialSummary, messages: &Messages, language: Language) -> String {
    let expense = money(summary.total_expense, language);
    let reserve = summary
        .total_expense
        .saturating_mul(Decimal::from(RESERVE_MONTHS));
    let ideal = summary.total_income.saturating_mul(Decimal::new(5, 1));
    let reserve = bold(&money(reserve, language));
    let ideal = money(ideal, language);

    let reserve_line = fill(
        messages.deep_reserve,
        &[("expense", &expense), ("reserve", &reserve)],
    );
    let ratio_line = fill(
        messages.deep_ratio,
        &[("ideal", &ideal), ("expense", &expense)],
    );

    [messages.deep_title, reserve_line.as_str(), ratio_line.as_str()]
        .join(&format!("{LINE_BREAK}{LINE_BREAK}"))
}

fn market(transactions: &[Transaction], messages: &Messages, language: Language) -> String {
    let categories: Vec<&str> = category_totals(transactions)
        .iter()
        .map(|total| total.category.label(language))
        .collect();

    let mut sections = vec![messages.market_title.to_string()];
    if !categories.is_empty() {
        sections.push(fill(
            messages.market_context,
            &[("categories", &categories.join(", "))],
        ));
    }
    sections.push(list(messages.market_tips));

    sections.join(&format!("{LINE_BREAK}{LINE_BREAK}"))
}
