//! Client for an OpenAI-compatible chat completions API.
//!
//! Every capability except language detection is one `POST
//! {base_url}/chat/completions` call. Structured capabilities ask the model
//! for JSON; the reply is stripped of Markdown code fences before it is
//! parsed.

use std::time::Duration;

use async_trait::async_trait;
use refactorer_core::analysis::{QualityAnalysis, Suggestion};
use refactorer_core::language::detect_language;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::prompts::{self, Prompt};
use crate::{focus_areas_label, BackendError, CodeIntelligence, RefactorOutput};

/// Connection settings for [`OpenAiBackend`].
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Base URL without the trailing `/chat/completions`,
    /// e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Network-backed [`CodeIntelligence`] implementation.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsEnvelope {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl OpenAiBackend {
    /// Build a backend with its own connection pool and request timeout.
    pub fn new(config: OpenAiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Build a backend reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Run one chat completion and return the assistant's text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = Self::parse_response(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| BackendError::Parse("completion contained no content".to_string()))
    }

    /// Run a completion whose content must be a JSON document of type `T`.
    async fn complete_json<T: DeserializeOwned>(&self, prompt: &Prompt) -> Result<T, BackendError> {
        let content = self.complete(prompt).await?;
        parse_json_content(&content)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or return
    /// [`BackendError::Api`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CodeIntelligence for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn detect_language(&self, code: &str) -> String {
        detect_language(code).to_string()
    }

    async fn analyze_quality(
        &self,
        code: &str,
        language: &str,
    ) -> Result<QualityAnalysis, BackendError> {
        let analysis: QualityAnalysis = self
            .complete_json(&prompts::analysis(code, language))
            .await?;
        Ok(analysis.normalized())
    }

    async fn refactor(
        &self,
        code: &str,
        language: &str,
        focus_areas: Option<&[String]>,
    ) -> Result<RefactorOutput, BackendError> {
        let focus = focus_areas_label(focus_areas);
        let output: RefactorOutput = self
            .complete_json(&prompts::refactor(code, language, &focus))
            .await?;
        if output.refactored_code.trim().is_empty() {
            return Err(BackendError::Parse(
                "refactored_code was empty".to_string(),
            ));
        }
        Ok(output)
    }

    async fn suggest(&self, code: &str, language: &str) -> Result<Vec<Suggestion>, BackendError> {
        let envelope: SuggestionsEnvelope = self
            .complete_json(&prompts::suggestions(code, language))
            .await?;
        Ok(envelope.suggestions)
    }

    async fn explain(&self, code: &str, language: &str) -> Result<String, BackendError> {
        self.complete(&prompts::explanation(code, language)).await
    }
}

// ---------------------------------------------------------------------------
// Content parsing
// ---------------------------------------------------------------------------

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
///
/// Text without a leading fence is returned trimmed but otherwise untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `python`, ...) on the opening line.
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse model output as JSON, tolerating code fences and surrounding prose.
pub fn parse_json_content<T: DeserializeOwned>(content: &str) -> Result<T, BackendError> {
    let stripped = strip_code_fences(content);
    match serde_json::from_str(stripped) {
        Ok(value) => Ok(value),
        Err(first) => {
            let object = match (stripped.find('{'), stripped.rfind('}')) {
                (Some(start), Some(end)) if start < end => &stripped[start..=end],
                _ => return Err(BackendError::Parse(first.to_string())),
            };
            serde_json::from_str(object).map_err(|e| BackendError::Parse(e.to_string()))
        }
    }
}
