//! Deterministic stand-in backend.
//!
//! Returns the same canned results for every input, so lifecycle and HTTP
//! tests can assert on exact values. `refactor` sleeps for the configured
//! latency to imitate a slow model call.

use std::time::Duration;

use async_trait::async_trait;
use refactorer_core::analysis::{QualityAnalysis, QualityIssue, Suggestion};
use refactorer_core::language::detect_language;

use crate::{focus_areas_label, BackendError, CodeIntelligence, RefactorOutput};

/// Default artificial latency of [`MockBackend::refactor`].
pub const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

pub const REFACTORED_CODE: &str = "def efficient_sum(numbers):\n    \"\"\"Calculates the sum of a list of numbers.\"\"\"\n    return sum(numbers)";

pub const REFACTOR_EXPLANATION: &str = "The original for-loop was replaced with Python's built-in `sum()` function. This is more efficient, readable, and less prone to errors.";

#[derive(Debug, Clone)]
pub struct MockBackend {
    latency: Duration,
    fail_with: Option<String>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            fail_with: None,
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the latency applied to `refactor`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every fallible capability return [`BackendError::Unavailable`].
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }

    fn check(&self) -> Result<(), BackendError> {
        match &self.fail_with {
            Some(reason) => Err(BackendError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CodeIntelligence for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn detect_language(&self, code: &str) -> String {
        detect_language(code).to_string()
    }

    async fn analyze_quality(
        &self,
        _code: &str,
        _language: &str,
    ) -> Result<QualityAnalysis, BackendError> {
        self.check()?;
        Ok(QualityAnalysis {
            complexity_score: 3,
            readability_score: 7,
            issues: vec![QualityIssue {
                kind: "readability".to_string(),
                severity: "low".to_string(),
                description: "The function can be simplified using Python's built-in `sum()` function.".to_string(),
                line_numbers: vec![1, 2, 3, 4],
                suggestion: "Replace the for loop with `return sum(numbers)`.".to_string(),
            }],
            overall_assessment: "The code is functional but can be more concise and Pythonic."
                .to_string(),
        })
    }

    async fn refactor(
        &self,
        _code: &str,
        language: &str,
        focus_areas: Option<&[String]>,
    ) -> Result<RefactorOutput, BackendError> {
        tracing::debug!(
            language,
            focus_areas = %focus_areas_label(focus_areas),
            latency_ms = self.latency.as_millis() as u64,
            "Mock refactor",
        );
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.check()?;
        Ok(RefactorOutput {
            refactored_code: REFACTORED_CODE.to_string(),
            explanation: REFACTOR_EXPLANATION.to_string(),
        })
    }

    async fn suggest(&self, _code: &str, _language: &str) -> Result<Vec<Suggestion>, BackendError> {
        self.check()?;
        Ok(vec![Suggestion {
            category: "best_practice".to_string(),
            priority: "medium".to_string(),
            title: "Use Built-in `sum()` function".to_string(),
            description: "The current implementation uses a manual loop to sum numbers. Python's built-in `sum()` function is more idiomatic and performant.".to_string(),
            example: "return sum(numbers)".to_string(),
            rationale: "Built-in functions are highly optimized and improve code readability."
                .to_string(),
        }])
    }

    async fn explain(&self, _code: &str, language: &str) -> Result<String, BackendError> {
        self.check()?;
        Ok(format!(
            "This {language} function `inefficient_sum` takes a list of numbers, initializes a \
             variable `s` to 0, iterates through the list, adds each number to `s`, and finally \
             returns the total sum."
        ))
    }
}
