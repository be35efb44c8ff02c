//! Synchronous advisory endpoints.
//!
//! These call the code intelligence backend directly and return its answer
//! in the response. Nothing is persisted and the lifecycle is not involved,
//! so backend failures surface as `502 BACKEND_ERROR`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use indexmap::IndexMap;
use refactorer_core::analysis::{QualityAnalysis, Suggestion};
use refactorer_core::language::SUPPORTED_LANGUAGES;
use refactorer_core::validation::{validate_code, validate_language};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body shared by the advisory endpoints.
#[derive(Debug, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default)]
    pub code: String,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub language: String,
    #[serde(flatten)]
    pub analysis: QualityAnalysis,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    pub language: String,
    pub code_length: usize,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
    pub language: String,
}

/// Validate the request and settle on a language, detecting it if absent.
async fn prepare(state: &AppState, input: AdvisoryRequest) -> AppResult<(String, String)> {
    validate_code(&input.code)?;
    validate_language(input.language.as_deref())?;

    let language = match input.language {
        Some(language) => language,
        None => state.backend.detect_language(&input.code).await,
    };
    Ok((input.code, language))
}

/// POST /api/v1/refactoring/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<AdvisoryRequest>,
) -> AppResult<impl IntoResponse> {
    let (code, language) = prepare(&state, input).await?;
    let analysis = state.backend.analyze_quality(&code, &language).await?;

    Ok(Json(DataResponse {
        data: AnalyzeResponse { language, analysis },
    }))
}

/// POST /api/v1/refactoring/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    Json(input): Json<AdvisoryRequest>,
) -> AppResult<impl IntoResponse> {
    let (code, language) = prepare(&state, input).await?;
    let suggestions = state.backend.suggest(&code, &language).await?;

    Ok(Json(DataResponse {
        data: SuggestionsResponse {
            suggestions,
            language,
            code_length: code.chars().count(),
        },
    }))
}

/// POST /api/v1/refactoring/explain
pub async fn explain(
    State(state): State<AppState>,
    Json(input): Json<AdvisoryRequest>,
) -> AppResult<impl IntoResponse> {
    let (code, language) = prepare(&state, input).await?;
    let explanation = state.backend.explain(&code, &language).await?;

    Ok(Json(DataResponse {
        data: ExplainResponse {
            explanation,
            language,
        },
    }))
}

/// GET /api/v1/refactoring/languages
///
/// Known languages mapped to their file extension, in table order.
pub async fn list_languages() -> impl IntoResponse {
    let languages: IndexMap<&str, &str> = SUPPORTED_LANGUAGES.iter().copied().collect();

    Json(DataResponse { data: languages })
}
