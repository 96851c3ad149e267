//! Core `StoryAi` trait and `ApiGateway` implementation.
//!
//! `ApiGateway` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! — OpenAI, Groq, Ollama (OpenAI mode), LM Studio, vLLM, etc.  All
//! connection details come from [`AiConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AiConfig;

use super::payload::{CharacterPersona, DetailKind, StoryContext, SuggestionSet};
use super::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// AiError
// ---------------------------------------------------------------------------

/// Errors that can occur during AI generation.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("AI request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse AI response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("AI returned an empty response")]
    EmptyResponse,

    /// The request payload failed boundary validation.
    #[error("invalid request payload: {0}")]
    InvalidPayload(&'static str),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StoryAi trait
// ---------------------------------------------------------------------------

/// Async trait for AI story assistance.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn StoryAi>`).  All operations are stateless
/// request/response calls; continuity comes from the context payloads.
#[async_trait]
pub trait StoryAi: Send + Sync {
    /// Structured writing suggestions for the current story state.
    async fn suggestions(&self, context: &StoryContext) -> Result<SuggestionSet, AiError>;

    /// An in-character reply from `persona` to `prompt`.
    async fn character_reply(
        &self,
        persona: &CharacterPersona,
        prompt: &str,
    ) -> Result<String, AiError>;

    /// One or two paragraphs continuing the story in the given direction.
    async fn continue_story(
        &self,
        context: &StoryContext,
        direction: &str,
    ) -> Result<String, AiError>;

    /// Flesh out a world/character/genre brief into usable detail.
    async fn expand_details(&self, kind: DetailKind, brief: &str) -> Result<String, AiError>;
}

// Compile-time assertion: Box<dyn StoryAi> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn StoryAi>) {}
};

// ---------------------------------------------------------------------------
// ApiGateway
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`AiConfig`] passed to [`ApiGateway::from_config`].
pub struct ApiGateway {
    client: reqwest::Client,
    config: AiConfig,
    prompt_builder: PromptBuilder,
}

impl ApiGateway {
    /// Build an `ApiGateway` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    /// The single wire path: send one (system, user) pair, return the
    /// assistant text.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — safe for
    /// local providers that require no authentication.
    async fn chat(&self, system_msg: &str, user_msg: &str) -> Result<String, AiError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  512
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let text = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(AiError::EmptyResponse)?
            .trim()
            .to_string();

        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        Ok(text)
    }
}

#[async_trait]
impl StoryAi for ApiGateway {
    async fn suggestions(&self, context: &StoryContext) -> Result<SuggestionSet, AiError> {
        context.validate()?;
        let (system, user) = self.prompt_builder.suggestion_chat(context);
        let text = self.chat(&system, &user).await?;
        parse_suggestions(&text)
    }

    async fn character_reply(
        &self,
        persona: &CharacterPersona,
        prompt: &str,
    ) -> Result<String, AiError> {
        persona.validate()?;
        let (system, user) = self.prompt_builder.character_chat(persona, prompt);
        self.chat(&system, &user).await
    }

    async fn continue_story(
        &self,
        context: &StoryContext,
        direction: &str,
    ) -> Result<String, AiError> {
        context.validate()?;
        let (system, user) = self.prompt_builder.continuation_chat(context, direction);
        self.chat(&system, &user).await
    }

    async fn expand_details(&self, kind: DetailKind, brief: &str) -> Result<String, AiError> {
        let (system, user) = self.prompt_builder.detail_chat(kind, brief);
        self.chat(&system, &user).await
    }
}

// ---------------------------------------------------------------------------
// Suggestion parsing
// ---------------------------------------------------------------------------

/// Parse the model's suggestion JSON, tolerating a markdown code fence
/// around it (models add one despite instructions often enough).
fn parse_suggestions(text: &str) -> Result<SuggestionSet, AiError> {
    let body = strip_code_fences(text);
    serde_json::from_str::<SuggestionSet>(body).map_err(|e| AiError::Parse(e.to_string()))
}

/// Strip a surrounding ```/```json fence, if any.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::payload::StoryContext;

    fn make_config(api_key: Option<&str>) -> AiConfig {
        AiConfig {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "qwen2.5:3b".into(),
            temperature: 0.7,
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _gateway = ApiGateway::from_config(&make_config(None));
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _gateway = ApiGateway::from_config(&make_config(Some("")));
    }

    /// Verify that `ApiGateway` is object-safe (usable as `dyn StoryAi`).
    #[test]
    fn gateway_is_object_safe() {
        let gateway: Box<dyn StoryAi> = Box::new(ApiGateway::from_config(&make_config(None)));
        drop(gateway);
    }

    /// Payload validation rejects before any request is attempted.
    #[tokio::test]
    async fn invalid_context_is_rejected_at_the_boundary() {
        let gateway = ApiGateway::from_config(&make_config(None));
        let err = gateway
            .suggestions(&StoryContext::from_synopsis(""))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidPayload(_)));
    }

    // ---- suggestion parsing ---

    #[test]
    fn parses_bare_suggestion_json() {
        let set = parse_suggestions(
            r#"{"plotSuggestions": ["a"], "characterInteractions": ["b"], "styleSuggestions": []}"#,
        )
        .unwrap();
        assert_eq!(set.plot_suggestions, vec!["a"]);
        assert_eq!(set.character_interactions, vec!["b"]);
        assert!(set.style_suggestions.is_empty());
    }

    #[test]
    fn parses_fenced_suggestion_json() {
        let set = parse_suggestions(
            "```json\n{\"plotSuggestions\": [\"a storm\"], \"characterInteractions\": [], \"styleSuggestions\": []}\n```",
        )
        .unwrap();
        assert_eq!(set.plot_suggestions, vec!["a storm"]);
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let set = parse_suggestions("```\n{\"plotSuggestions\": []}\n```").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn non_json_reply_is_a_parse_error() {
        let err = parse_suggestions("Here are some ideas: ...").unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));
    }

    #[test]
    fn strip_code_fences_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
