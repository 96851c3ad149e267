//! Typed payloads crossing the AI-gateway boundary.
//!
//! The story and character shapes arriving from the UI are validated here,
//! before any prompt is built: required fields are explicit, everything
//! else defaults.  Responses use camelCase keys on the wire.

use serde::{Deserialize, Serialize};

use super::gateway::AiError;

// ---------------------------------------------------------------------------
// StoryContext
// ---------------------------------------------------------------------------

/// What the model needs to know about the story for suggestions and
/// continuations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryContext {
    /// One-paragraph summary of the story so far.  Required.
    pub synopsis: String,

    /// Genre hint, e.g. `"gothic mystery"`.
    #[serde(default)]
    pub genre: Option<String>,

    /// The most recent passages of the draft, oldest first.
    #[serde(default)]
    pub recent_passages: Vec<String>,

    /// Names of characters on stage.
    #[serde(default)]
    pub characters: Vec<String>,
}

impl StoryContext {
    /// A minimal context carrying only a synopsis.
    pub fn from_synopsis(synopsis: impl Into<String>) -> Self {
        Self {
            synopsis: synopsis.into(),
            genre: None,
            recent_passages: Vec::new(),
            characters: Vec::new(),
        }
    }

    /// Check the required fields before the payload enters the gateway.
    pub fn validate(&self) -> Result<(), AiError> {
        if self.synopsis.trim().is_empty() {
            return Err(AiError::InvalidPayload("story synopsis must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CharacterPersona
// ---------------------------------------------------------------------------

/// A character the user can talk to in the story chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPersona {
    /// Character name.  Required.
    pub name: String,

    /// Free-form persona description.
    #[serde(default)]
    pub description: String,

    /// Trait keywords, e.g. `["stoic", "sea-weary"]`.
    #[serde(default)]
    pub traits: Vec<String>,
}

impl CharacterPersona {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.name.trim().is_empty() {
            return Err(AiError::InvalidPayload("character name must not be empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DetailKind
// ---------------------------------------------------------------------------

/// Which foundation aspect a detail-expansion request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailKind {
    World,
    Character,
    Genre,
}

impl DetailKind {
    pub fn label(&self) -> &'static str {
        match self {
            DetailKind::World => "world",
            DetailKind::Character => "character",
            DetailKind::Genre => "genre",
        }
    }
}

// ---------------------------------------------------------------------------
// SuggestionSet
// ---------------------------------------------------------------------------

/// Structured writing suggestions returned by the gateway.
///
/// `Default` is the documented fallback value when the backend is
/// unavailable: all three lists empty, still renderable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionSet {
    pub plot_suggestions: Vec<String>,
    pub character_interactions: Vec<String>,
    pub style_suggestions: Vec<String>,
}

impl SuggestionSet {
    /// `true` when no list carries a suggestion.
    pub fn is_empty(&self) -> bool {
        self.plot_suggestions.is_empty()
            && self.character_interactions.is_empty()
            && self.style_suggestions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- validation ---

    #[test]
    fn context_with_synopsis_is_valid() {
        let ctx = StoryContext::from_synopsis("A lighthouse keeper finds a message in a bottle.");
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn blank_synopsis_is_rejected() {
        let ctx = StoryContext::from_synopsis("   ");
        assert!(matches!(
            ctx.validate().unwrap_err(),
            AiError::InvalidPayload(_)
        ));
    }

    #[test]
    fn persona_requires_a_name() {
        let persona = CharacterPersona {
            name: "".into(),
            description: "an old sailor".into(),
            traits: vec![],
        };
        assert!(persona.validate().is_err());

        let persona = CharacterPersona {
            name: "Edda".into(),
            description: String::new(),
            traits: vec![],
        };
        assert!(persona.validate().is_ok());
    }

    // ---- wire format ---

    #[test]
    fn suggestion_set_uses_camel_case_keys() {
        let set = SuggestionSet {
            plot_suggestions: vec!["a storm rolls in".into()],
            character_interactions: vec![],
            style_suggestions: vec![],
        };
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["plotSuggestions"][0], "a storm rolls in");
        assert!(json.get("characterInteractions").is_some());
        assert!(json.get("styleSuggestions").is_some());
    }

    #[test]
    fn suggestion_set_missing_fields_default_to_empty() {
        let set: SuggestionSet =
            serde_json::from_str(r#"{"plotSuggestions": ["x"]}"#).unwrap();
        assert_eq!(set.plot_suggestions, vec!["x"]);
        assert!(set.character_interactions.is_empty());
        assert!(set.style_suggestions.is_empty());
    }

    #[test]
    fn default_suggestion_set_is_empty_but_valid() {
        let set = SuggestionSet::default();
        assert!(set.is_empty());
        // Still serializes to a fully-shaped object for the UI.
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["plotSuggestions"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn context_optional_fields_default() {
        let ctx: StoryContext = serde_json::from_str(r#"{"synopsis": "s"}"#).unwrap();
        assert!(ctx.genre.is_none());
        assert!(ctx.recent_passages.is_empty());
        assert!(ctx.characters.is_empty());
    }

    #[test]
    fn detail_kind_labels() {
        assert_eq!(DetailKind::World.label(), "world");
        assert_eq!(DetailKind::Character.label(), "character");
        assert_eq!(DetailKind::Genre.label(), "genre");
    }
}
