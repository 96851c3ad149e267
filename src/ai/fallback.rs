//! Best-effort wrapper — wraps any [`StoryAi`] and degrades to safe values
//! on error.
//!
//! Suggestions and character chat are nice-to-have features: when the
//! backend is unreachable the UI must still have something renderable, not
//! an unhandled rejection.  [`BestEffortAi`] maps every failure to the
//! documented fallback value and logs the cause.

use async_trait::async_trait;

use super::gateway::{AiError, StoryAi};
use super::payload::{CharacterPersona, DetailKind, StoryContext, SuggestionSet};

/// What a character says when the backend fails mid-conversation.
pub const FALLBACK_REPLY: &str =
    "Sorry — I lost my train of thought. Could you ask me that again in a moment?";

// ---------------------------------------------------------------------------
// BestEffortAi
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`StoryAi`] that never returns an
/// error:
///
/// * `suggestions` falls back to an empty [`SuggestionSet`];
/// * `character_reply` falls back to [`FALLBACK_REPLY`];
/// * `continue_story` and `expand_details` fall back to an empty string
///   (callers render their own "try again" notice for empty prose).
///
/// # Example
/// ```rust
/// use storyloom::ai::{ApiGateway, BestEffortAi};
/// use storyloom::config::AiConfig;
///
/// let inner = ApiGateway::from_config(&AiConfig::default());
/// let ai = BestEffortAi::new(inner);
/// // `ai` now implements StoryAi and is safe to use even when the backend
/// // is unavailable.
/// ```
pub struct BestEffortAi<A: StoryAi> {
    inner: A,
}

impl<A: StoryAi> BestEffortAi<A> {
    /// Wrap `inner` with fallback behaviour.
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped gateway.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: StoryAi + Send + Sync> StoryAi for BestEffortAi<A> {
    /// This implementation **never** returns `Err(_)`.
    async fn suggestions(&self, context: &StoryContext) -> Result<SuggestionSet, AiError> {
        match self.inner.suggestions(context).await {
            Ok(set) => Ok(set),
            Err(err) => {
                log::warn!("ai: suggestions failed, returning empty set: {err}");
                Ok(SuggestionSet::default())
            }
        }
    }

    async fn character_reply(
        &self,
        persona: &CharacterPersona,
        prompt: &str,
    ) -> Result<String, AiError> {
        match self.inner.character_reply(persona, prompt).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                log::warn!("ai: character reply failed, using stock line: {err}");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }

    async fn continue_story(
        &self,
        context: &StoryContext,
        direction: &str,
    ) -> Result<String, AiError> {
        match self.inner.continue_story(context, direction).await {
            Ok(prose) => Ok(prose),
            Err(err) => {
                log::warn!("ai: continuation failed, returning nothing: {err}");
                Ok(String::new())
            }
        }
    }

    async fn expand_details(&self, kind: DetailKind, brief: &str) -> Result<String, AiError> {
        match self.inner.expand_details(kind, brief).await {
            Ok(prose) => Ok(prose),
            Err(err) => {
                log::warn!("ai: {} detail expansion failed: {err}", kind.label());
                Ok(String::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
