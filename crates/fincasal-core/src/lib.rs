//! FinCasal Core Library
//!
//! Shared functionality for the FinCasal couple finance tracker:
//! - Transaction model and the aggregator (totals, balance, category ranking)
//! - Offline advisor producing templated advice in pt/en/es
//! - Remote advisor backends (Gemini) with local failover
//! - Prompt library for customizable advisor prompts
//! - Advisor configuration (embedded defaults plus override file)
//! - Transaction store with JSON file persistence

pub mod advisor;
pub mod ai;
pub mod config;
pub mod context;
pub mod error;
pub mod markup;
pub mod models;
pub mod prompts;
pub mod store;
pub mod summary;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{local_advice, AdvisorService, InFlightGuard};
pub use ai::{AIClient, AdvisorBackend, GeminiBackend, MockBackend, MockReply, RemoteAdvice};
pub use config::{AdvisorConfig, ModeConfig};
pub use context::PromptContext;
pub use error::{Error, Result};
pub use models::{
    AnalysisMode, AnalysisResult, AppSettings, Category, FinancialSummary, Language,
    NewTransaction, Provenance, Source, Transaction, TransactionType, TransactionUpdate,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use store::{JsonFileStorage, MemoryStorage, Storage, TransactionStore};
pub use summary::{summarize, CategoryTotal};
