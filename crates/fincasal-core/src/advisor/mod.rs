//! Financial advice
//!
//! - [`local`]: offline rule engine, always available
//! - [`templates`]: per-language strings for the rule engine
//! - [`service`]: remote-first controller with local fallback

pub mod local;
pub mod service;
pub mod templates;

pub use local::local_advice;
pub use service::{AdvisorService, InFlightGuard};
