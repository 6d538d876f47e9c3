//! Domain models for FinCasal

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single recorded income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identifier assigned by the store (`tx-<millis>`)
    pub id: String,
    pub category: Category,
    pub description: String,
    /// Always positive; the direction lives in `transaction_type`
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Locale date string captured at creation, never rewritten
    pub date: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// Direction of a transaction
///
/// The aliases accept blobs written by the original web app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "income", alias = "Entrada")]
    Income,
    #[serde(rename = "expense", alias = "Saída")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "entrada" | "in" => Ok(Self::Income),
            "expense" | "saída" | "saida" | "out" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spending categories offered by the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Income,
    Housing,
    Food,
    Transport,
    Leisure,
    Health,
    Education,
    Others,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Housing => "HOUSING",
            Self::Food => "FOOD",
            Self::Transport => "TRANSPORT",
            Self::Leisure => "LEISURE",
            Self::Health => "HEALTH",
            Self::Education => "EDUCATION",
            Self::Others => "OTHERS",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Income,
            Self::Housing,
            Self::Food,
            Self::Transport,
            Self::Leisure,
            Self::Health,
            Self::Education,
            Self::Others,
        ]
    }

    /// Display name in the given language
    pub fn label(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Pt, Self::Income) => "Renda",
            (Language::Pt, Self::Housing) => "Moradia",
            (Language::Pt, Self::Food) => "Alimentação",
            (Language::Pt, Self::Transport) => "Transporte",
            (Language::Pt, Self::Leisure) => "Lazer",
            (Language::Pt, Self::Health) => "Saúde",
            (Language::Pt, Self::Education) => "Educação",
            (Language::Pt, Self::Others) => "Outros",
            (Language::En, Self::Income) => "Income",
            (Language::En, Self::Housing) => "Housing",
            (Language::En, Self::Food) => "Food",
            (Language::En, Self::Transport) => "Transport",
            (Language::En, Self::Leisure) => "Leisure",
            (Language::En, Self::Health) => "Health",
            (Language::En, Self::Education) => "Education",
            (Language::En, Self::Others) => "Others",
            (Language::Es, Self::Income) => "Ingresos",
            (Language::Es, Self::Housing) => "Vivienda",
            (Language::Es, Self::Food) => "Alimentación",
            (Language::Es, Self::Transport) => "Transporte",
            (Language::Es, Self::Leisure) => "Ocio",
            (Language::Es, Self::Health) => "Salud",
            (Language::Es, Self::Education) => "Educación",
            (Language::Es, Self::Others) => "Otros",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Totals derived from a transaction set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// Depth/focus of a requested analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Short diagnosis plus one tip
    Quick,
    /// Strategic plan (reserve target, 50/30/20 check)
    Deep,
    /// Market context and general saving guidance
    Market,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Deep => "deep",
            Self::Market => "market",
        }
    }

    pub fn all() -> &'static [AnalysisMode] {
        &[Self::Quick, Self::Deep, Self::Market]
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "deep" => Ok(Self::Deep),
            "market" => Ok(Self::Market),
            _ => Err(format!("Unknown analysis mode: {}", s)),
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Interface language; Portuguese is the canonical default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Resolve a language tag, falling back to Portuguese for anything unknown
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.split(['-', '_']).next().unwrap_or_default() {
            "en" => Self::En,
            "es" => Self::Es,
            _ => Self::Pt,
        }
    }

    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Self::Pt => "R$",
            Self::En | Self::Es => "$",
        }
    }

    /// Locale date string used when a transaction is created
    pub fn format_date(&self, date: NaiveDate) -> String {
        let pattern = match self {
            Self::Pt => "%d/%m/%Y",
            Self::En => "%-m/%-d/%Y",
            Self::Es => "%-d/%-m/%Y",
        };
        date.format(pattern).to_string()
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Language> for &'static str {
    fn from(language: Language) -> Self {
        language.as_str()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where an analysis result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Produced by the remote generative service
    Remote,
    /// Produced by the offline rule engine
    Local,
}

impl Provenance {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

/// Grounding reference attached to a remote analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// Advice ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Advice text using the markup subset in [`crate::markup`]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    pub provenance: Provenance,
}

impl AnalysisResult {
    pub fn local(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            provenance: Provenance::Local,
        }
    }

    pub fn remote(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources,
            provenance: Provenance::Remote,
        }
    }
}

/// Validated input for a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// Build from raw form input
    ///
    /// The description is trimmed and must not be empty, the amount accepts
    /// either `,` or `.` as decimal separator and must be positive.
    pub fn parse(
        description: &str,
        amount: &str,
        category: Option<Category>,
        transaction_type: TransactionType,
    ) -> Result<Self> {
        let description = validate_description(description)?;
        let amount = parse_amount(amount)?;
        let category =
            category.ok_or_else(|| Error::InvalidData("Category is required".into()))?;

        Ok(Self {
            description,
            amount,
            category,
            transaction_type,
        })
    }
}

/// Partial edit of an existing transaction; `id` and `date` are not editable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.transaction_type.is_none()
    }

    /// Apply onto a transaction after validating the provided fields
    pub fn apply(&self, tx: &mut Transaction) -> Result<()> {
        let description = self
            .description
            .as_deref()
            .map(validate_description)
            .transpose()?;
        if let Some(amount) = self.amount {
            ensure_positive(amount)?;
        }

        if let Some(description) = description {
            tx.description = description;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(transaction_type) = self.transaction_type {
            tx.transaction_type = transaction_type;
        }
        Ok(())
    }
}

/// Parse a user-entered amount such as `12,50` or `12.50`
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let normalized = input.trim().replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| Error::InvalidData(format!("Invalid amount: {}", input)))?;
    ensure_positive(amount)?;
    Ok(amount)
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidData(format!(
            "Amount must be greater than zero (got {})",
            amount
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidData("Description must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Color palette of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Ruby,
    #[default]
    Classic,
    Forest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Inter,
}

macro_rules! impl_lowercase_from_str {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(format!("Unknown {}: {}", stringify!($ty), s)),
                }
            }
        }
    };
}

impl_lowercase_from_str!(Theme { Ruby => "ruby", Classic => "classic", Forest => "forest" });
impl_lowercase_from_str!(FontSize { Small => "small", Medium => "medium", Large => "large" });
impl_lowercase_from_str!(FontFamily { Sans => "sans", Serif => "serif", Inter => "inter" });

/// Persisted application preferences (the second stored blob)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub language: Language,
    pub theme: Theme,
    pub light_mode: bool,
    pub font_size: FontSize,
    pub font_family: FontFamily,
}
