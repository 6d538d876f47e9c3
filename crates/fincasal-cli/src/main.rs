//! FinCasal CLI - Couple finance tracker
//!
//! Usage:
//!   fincasal add "Mercado" 80,50 -c food     Record an expense
//!   fincasal summary                         Totals and balance
//!   fincasal advise deep                     Ask the advisor for a plan
//!   fincasal settings --language en          Change preferences

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Add {
            description,
            amount,
            category,
            kind,
        } => {
            let mut store = commands::open_store(data_dir)?;
            commands::cmd_add(&mut store, &description, &amount, &category, &kind)
        }
        Commands::Edit {
            id,
            description,
            amount,
            category,
            kind,
        } => {
            let mut store = commands::open_store(data_dir)?;
            commands::cmd_edit(
                &mut store,
                &id,
                description.as_deref(),
                amount.as_deref(),
                category.as_deref(),
                kind.as_deref(),
            )
        }
        Commands::Delete { id } => {
            let mut store = commands::open_store(data_dir)?;
            commands::cmd_delete(&mut store, &id)
        }
        Commands::List { limit } => commands::cmd_list(&commands::open_store(data_dir)?, limit),
        Commands::Summary { json } => commands::cmd_summary(&commands::open_store(data_dir)?, json),
        Commands::Report { top } => commands::cmd_report(&commands::open_store(data_dir)?, top),
        Commands::Advise {
            mode,
            lang,
            offline,
        } => {
            let store = commands::open_store(data_dir)?;
            commands::cmd_advise(&store, &mode, lang.as_deref(), offline).await
        }
        Commands::Settings(args) => {
            let mut store = commands::open_store(data_dir)?;
            commands::cmd_settings(&mut store, &args)
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
