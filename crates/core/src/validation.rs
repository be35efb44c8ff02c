//! Input limits and validation for refactoring submissions and feedback.
//!
//! Structural checks (such as the rating range) live on the DTOs via
//! `validator`; the functions here cover the rules that need trimming or
//! per-element inspection.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum accepted source length in characters.
pub const MAX_CODE_CHARS: usize = 100_000;

/// Maximum number of focus areas per submission.
pub const MAX_FOCUS_AREAS: usize = 10;

/// Maximum length of a single focus area.
pub const MAX_FOCUS_AREA_CHARS: usize = 64;

/// Maximum length of a feedback comment.
pub const MAX_COMMENT_CHARS: usize = 5_000;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Source code must be present, not blank, and within [`MAX_CODE_CHARS`].
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.trim().is_empty() {
        return Err(CoreError::Validation(
            "code must not be empty".to_string(),
        ));
    }
    let len = code.chars().count();
    if len > MAX_CODE_CHARS {
        return Err(CoreError::Validation(format!(
            "code must be at most {MAX_CODE_CHARS} characters, got {len}"
        )));
    }
    Ok(())
}

/// An explicit language is free text passed through unchanged; it only has
/// to be non-blank.
pub fn validate_language(language: Option<&str>) -> Result<(), CoreError> {
    let Some(language) = language else {
        return Ok(());
    };
    if language.trim().is_empty() {
        return Err(CoreError::Validation(
            "language must not be blank when provided".to_string(),
        ));
    }
    Ok(())
}

/// Focus areas are optional; when given, each entry must be non-blank.
pub fn validate_focus_areas(focus_areas: Option<&[String]>) -> Result<(), CoreError> {
    let Some(areas) = focus_areas else {
        return Ok(());
    };
    if areas.len() > MAX_FOCUS_AREAS {
        return Err(CoreError::Validation(format!(
            "at most {MAX_FOCUS_AREAS} focus areas are allowed, got {}",
            areas.len()
        )));
    }
    for area in areas {
        if area.trim().is_empty() {
            return Err(CoreError::Validation(
                "focus areas must not be blank".to_string(),
            ));
        }
        if area.chars().count() > MAX_FOCUS_AREA_CHARS {
            return Err(CoreError::Validation(format!(
                "focus area '{area}' exceeds {MAX_FOCUS_AREA_CHARS} characters"
            )));
        }
    }
    Ok(())
}

/// Feedback comments are optional and bounded by [`MAX_COMMENT_CHARS`].
pub fn validate_comment(comment: Option<&str>) -> Result<(), CoreError> {
    match comment {
        Some(c) if c.chars().count() > MAX_COMMENT_CHARS => Err(CoreError::Validation(format!(
            "comment must be at most {MAX_COMMENT_CHARS} characters"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_code -------------------------------------------------------

    #[test]
    fn accepts_regular_code() {
        assert!(validate_code("def f():\n    return 1").is_ok());
    }

    #[test]
    fn rejects_empty_code() {
        assert!(validate_code("").is_err());
    }

    #[test]
    fn rejects_whitespace_only_code() {
        assert!(validate_code(" \n\t ").is_err());
    }

    #[test]
    fn rejects_oversized_code() {
        let code = "x".repeat(MAX_CODE_CHARS + 1);
        assert!(validate_code(&code).is_err());
    }

    #[test]
    fn accepts_code_at_limit() {
        let code = "x".repeat(MAX_CODE_CHARS);
        assert!(validate_code(&code).is_ok());
    }

    // -- validate_language ---------------------------------------------------

    #[test]
    fn absent_language_is_fine() {
        assert!(validate_language(None).is_ok());
    }

    #[test]
    fn unknown_language_is_passed_through() {
        assert!(validate_language(Some("brainfuck")).is_ok());
    }

    #[test]
    fn long_free_text_language_is_accepted() {
        let language = "x".repeat(500);
        assert!(validate_language(Some(&language)).is_ok());
    }

    #[test]
    fn blank_language_is_rejected() {
        assert!(validate_language(Some("  ")).is_err());
    }

    // -- validate_focus_areas ------------------------------------------------

    #[test]
    fn focus_areas_accept_normal_list() {
        let areas = vec!["performance".to_string(), "readability".to_string()];
        assert!(validate_focus_areas(Some(areas.as_slice())).is_ok());
    }

    #[test]
    fn focus_areas_reject_blank_entry() {
        let areas = vec!["performance".to_string(), "".to_string()];
        assert!(validate_focus_areas(Some(areas.as_slice())).is_err());
    }

    #[test]
    fn focus_areas_reject_too_many() {
        let areas: Vec<String> = (0..=MAX_FOCUS_AREAS).map(|i| format!("area{i}")).collect();
        assert!(validate_focus_areas(Some(areas.as_slice())).is_err());
    }

    // -- validate_comment ----------------------------------------------------

    #[test]
    fn comment_within_limit_is_ok() {
        assert!(validate_comment(Some("Nice!")).is_ok());
        assert!(validate_comment(None).is_ok());
    }

    #[test]
    fn oversized_comment_is_rejected() {
        let comment = "a".repeat(MAX_COMMENT_CHARS + 1);
        assert!(validate_comment(Some(&comment)).is_err());
    }
}
