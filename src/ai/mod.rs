//! AI gateway for story assistance.
//!
//! This module provides:
//! * [`StoryAi`] — async trait implemented by all gateway backends.
//! * [`ApiGateway`] — OpenAI-compatible REST API backend.
//! * [`BestEffortAi`] — wraps any gateway; degrades to safe fallback
//!   values instead of erroring.
//! * [`PromptBuilder`] — builds (system, user) message pairs per operation.
//! * [`StoryContext`] / [`CharacterPersona`] / [`DetailKind`] — validated
//!   request payloads.
//! * [`SuggestionSet`] — structured suggestion response.
//! * [`AiError`] — error variants for AI operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use storyloom::ai::{ApiGateway, BestEffortAi, StoryAi, StoryContext};
//! use storyloom::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!
//!     // Build a gateway that never fails (falls back to empty values).
//!     let ai = BestEffortAi::new(ApiGateway::from_config(&config.ai));
//!
//!     let context = StoryContext::from_synopsis(
//!         "A lighthouse keeper finds a message in a bottle.",
//!     );
//!     let suggestions = ai.suggestions(&context).await.unwrap();
//!     for idea in &suggestions.plot_suggestions {
//!         println!("- {idea}");
//!     }
//! }
//! ```

pub mod fallback;
pub mod gateway;
pub mod payload;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use fallback::{BestEffortAi, FALLBACK_REPLY};
pub use gateway::{AiError, ApiGateway, StoryAi};
pub use payload::{CharacterPersona, DetailKind, StoryContext, SuggestionSet};
pub use prompt::PromptBuilder;
