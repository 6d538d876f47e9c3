//! Error types for FinCasal

use thiserror::Error;

use crate::models::AnalysisMode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Remote advisor error: {0}")]
    Remote(String),

    #[error("An analysis is already running for mode {0}")]
    Busy(AnalysisMode),
}

pub type Result<T> = std::result::Result<T, Error>;
