//! Remote advisor response types

use serde::{Deserialize, Serialize};

use crate::models::Source;

/// Successful reply from a remote advisor
///
/// Transport and provider failures are reported as `Err`, never folded into
/// `text`. The text itself may still be empty or error-shaped; the advisor
/// service decides whether to trust it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAdvice {
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl RemoteAdvice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}
