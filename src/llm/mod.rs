//! # Prompt enhancement
//!
//! Sends a composed prompt to an OpenAI-compatible chat completions service
//! and turns the answers into an improved positive prompt plus a companion
//! negative prompt.
//!
//! ## Architecture
//!
//! ```text
//! base text → enhance.rs (instructions, two calls, fallback)
//!           → send.rs (HTTP transport) → receive.rs (parse & normalize) → EnhancementResult
//! ```
//!
//! Failures never leave this module as errors: [`Enhancer::enhance`] always
//! returns a usable result and records what went wrong in the diagnostic log.

pub mod enhance;
pub mod receive;
pub mod send;

pub use enhance::{
    EnhancementIssue, EnhancementOutcome, EnhancementResult, EnhancementStage, Enhancer,
    FALLBACK_NEGATIVE,
};
pub use send::{BackendConfig, ChatBackend, HttpChatBackend, Message};

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnhancementError {
    #[error("Enhancement service not configured: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed service response: {0}")]
    Protocol(String),
}

impl EnhancementError {
    /// What the user can do about it.
    pub fn user_hint(&self) -> &'static str {
        match self {
            EnhancementError::Configuration(_) => {
                "Check configuration: API_KEY, API_URL and MODEL must be set."
            }
            EnhancementError::Network(_) | EnhancementError::Timeout { .. } => {
                "The enhancement service could not be reached. Try again in a moment."
            }
            EnhancementError::Status { status: 401 | 403, .. } => {
                "The service rejected the credentials. Check your API key."
            }
            EnhancementError::Status { status: 429, .. } => {
                "Rate limit reached. Wait a little and try again."
            }
            EnhancementError::Status { .. } | EnhancementError::Protocol(_) => {
                "The enhancement service returned an unusable answer. Try again."
            }
        }
    }
}

pub type LlmResult<T> = Result<T, EnhancementError>;
