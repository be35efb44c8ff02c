//! Quality-analysis and suggestion payloads produced by the code
//! intelligence backend.
//!
//! The analysis is stored as an opaque serialized blob on the refactoring
//! record and decoded only at the read boundary. Decoding is lenient: a
//! malformed blob downgrades to "no analysis" instead of failing the read.

use serde::{Deserialize, Deserializer, Serialize};

/// Lowest score a backend may report.
pub const MIN_SCORE: u8 = 1;

/// Highest score a backend may report.
pub const MAX_SCORE: u8 = 10;

/// Structured quality analysis of a code sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    /// 1 (trivial) to 10 (very complex).
    #[serde(deserialize_with = "deserialize_score")]
    pub complexity_score: u8,
    /// 1 (unreadable) to 10 (very readable).
    #[serde(deserialize_with = "deserialize_score")]
    pub readability_score: u8,
    #[serde(default)]
    pub issues: Vec<QualityIssue>,
    #[serde(default)]
    pub overall_assessment: String,
}

/// A single finding inside a [`QualityAnalysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// complexity, readability, performance, security or best_practice.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// low, medium, high or critical.
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub line_numbers: Vec<u32>,
    #[serde(default)]
    pub suggestion: String,
}

/// An actionable improvement returned by the advisory suggestions call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub rationale: String,
}

/// Round any numeric score and clamp it into `MIN_SCORE..=MAX_SCORE`.
///
/// NaN maps to [`MIN_SCORE`].
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u8
}

/// Scores arrive from a language model; fractional, negative or oversized
/// numbers are accepted and clamped. Non-numeric values are still an error.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_score)
}

impl QualityAnalysis {
    /// Clamp both scores into `MIN_SCORE..=MAX_SCORE`.
    pub fn normalized(mut self) -> Self {
        self.complexity_score = self.complexity_score.clamp(MIN_SCORE, MAX_SCORE);
        self.readability_score = self.readability_score.clamp(MIN_SCORE, MAX_SCORE);
        self
    }

    /// Serialize into the opaque text form persisted on the record.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a stored blob, treating any failure as "no analysis available".
    pub fn decode_lenient(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Self>(raw) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                tracing::warn!(error = %e, "Stored analysis result could not be decoded, omitting it");
                None
            }
        }
    }
}
