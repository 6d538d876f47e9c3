//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// FinCasal - Couple finance tracker with an AI advisor
#[derive(Parser)]
#[command(name = "fincasal")]
#[command(about = "Track a couple's income and expenses and get financial advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to ~/.local/share/fincasal)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new transaction
    Add {
        /// What the money was for
        description: String,

        /// Amount, with `,` or `.` as decimal separator
        amount: String,

        /// Category: income, housing, food, transport, leisure, health, education, others
        #[arg(short, long)]
        category: String,

        /// Transaction type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
    },

    /// Edit an existing transaction (id and date never change)
    Edit {
        /// Transaction ID (e.g. tx-1741350000000)
        id: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        amount: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List recent transactions
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show totals, balance and spending by category
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Results report: totals, expense ratio and largest expenses
    Report {
        /// Number of largest expenses to list
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Ask the advisor for an analysis
    Advise {
        /// Analysis mode: quick, deep, market
        #[arg(default_value = "quick")]
        mode: String,

        /// Language for local advice: pt, en, es (defaults to settings)
        #[arg(short, long)]
        lang: Option<String>,

        /// Skip the remote advisor and compute advice locally
        #[arg(long)]
        offline: bool,
    },

    /// Show or change application settings
    Settings(SettingsArgs),

    /// Manage advisor prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

/// Settings to change; with no flags the current settings are shown
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Interface language: pt, en, es
    #[arg(long)]
    pub language: Option<String>,

    /// Color theme: ruby, classic, forest
    #[arg(long)]
    pub theme: Option<String>,

    /// Light mode on or off
    #[arg(long)]
    pub light_mode: Option<bool>,

    /// Font size: small, medium, large
    #[arg(long)]
    pub font_size: Option<String>,

    /// Font family: sans, serif, inter
    #[arg(long)]
    pub font_family: Option<String>,
}

impl SettingsArgs {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.theme.is_none()
            && self.light_mode.is_none()
            && self.font_size.is_none()
            && self.font_family.is_none()
    }
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (quick_advice, deep_advice, market_advice)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
