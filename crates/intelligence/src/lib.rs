//! Code intelligence backends.
//!
//! [`CodeIntelligence`] is the capability set the lifecycle engine and the
//! advisory handlers depend on. Two implementations are provided:
//!
//! - [`OpenAiBackend`] talks to an OpenAI-compatible chat completions API.
//! - [`MockBackend`] returns deterministic canned results for tests and
//!   offline runs.
//!
//! Callers hold an `Arc<dyn CodeIntelligence>` and never know which one is
//! wired in.

use async_trait::async_trait;
use refactorer_core::analysis::{QualityAnalysis, Suggestion};

pub mod mock;
pub mod openai;
pub mod prompts;

pub use mock::MockBackend;
pub use openai::{OpenAiBackend, OpenAiConfig};

/// Focus areas used when a submission does not name any.
pub const DEFAULT_FOCUS_AREAS: &[&str] = &["readability", "performance", "best_practices"];

/// Refactored source plus a description of what changed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RefactorOutput {
    pub refactored_code: String,
    pub explanation: String,
}

/// Errors from a code intelligence call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend answered, but the content was not in the expected shape.
    #[error("Unparsable backend response: {0}")]
    Parse(String),

    /// The backend refused to serve the call.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Short description that is safe to show to API clients.
    ///
    /// Upstream response bodies and parser output are left out; they belong
    /// in logs only.
    pub fn summary(&self) -> String {
        match self {
            BackendError::Request(e) if e.is_timeout() => "backend request timed out".to_string(),
            BackendError::Request(_) => "backend request failed".to_string(),
            BackendError::Api { status, .. } => format!("backend returned HTTP {status}"),
            BackendError::Parse(_) => "backend response was unparsable".to_string(),
            BackendError::Unavailable(reason) => format!("Backend unavailable: {reason}"),
        }
    }
}

/// The code intelligence capability set.
#[async_trait]
pub trait CodeIntelligence: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Best-effort language guess. Never fails.
    async fn detect_language(&self, code: &str) -> String;

    /// Structured quality analysis of `code`.
    async fn analyze_quality(
        &self,
        code: &str,
        language: &str,
    ) -> Result<QualityAnalysis, BackendError>;

    /// Rewrite `code`, prioritising `focus_areas` (or [`DEFAULT_FOCUS_AREAS`]).
    async fn refactor(
        &self,
        code: &str,
        language: &str,
        focus_areas: Option<&[String]>,
    ) -> Result<RefactorOutput, BackendError>;

    /// Ordered improvement suggestions without rewriting the code.
    async fn suggest(&self, code: &str, language: &str) -> Result<Vec<Suggestion>, BackendError>;

    /// Free-text walkthrough of what the code does.
    async fn explain(&self, code: &str, language: &str) -> Result<String, BackendError>;
}

/// Join focus areas for prompts and log lines, applying the defaults.
pub fn focus_areas_label(focus_areas: Option<&[String]>) -> String {
    match focus_areas {
        Some(areas) if !areas.is_empty() => areas.join(", "),
        _ => DEFAULT_FOCUS_AREAS.join(", "),
    }
}
