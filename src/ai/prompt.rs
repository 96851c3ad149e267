//! Prompt construction for the story AI.
//!
//! Every gateway operation maps to one (system, user) message pair.  The
//! system message fixes the assistant's role and output contract; the user
//! message carries the validated payload.

use super::payload::{CharacterPersona, DetailKind, StoryContext};

/// Builds chat messages for each gateway operation.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    fn context_block(context: &StoryContext) -> String {
        let mut block = format!("Synopsis: {}", context.synopsis.trim());
        if let Some(genre) = &context.genre {
            block.push_str(&format!("\nGenre: {genre}"));
        }
        if !context.characters.is_empty() {
            block.push_str(&format!("\nCharacters: {}", context.characters.join(", ")));
        }
        if !context.recent_passages.is_empty() {
            block.push_str("\nMost recent passages:\n");
            for passage in &context.recent_passages {
                block.push_str(&format!("> {passage}\n"));
            }
        }
        block
    }

    /// Messages asking for structured writing suggestions.
    ///
    /// The system message pins the exact JSON keys so the response can be
    /// deserialized as a `SuggestionSet`.
    pub fn suggestion_chat(&self, context: &StoryContext) -> (String, String) {
        let system = "You are a writing-room assistant for a fiction author. \
                      Given the story context, propose short, concrete suggestions. \
                      Respond with JSON only, using exactly these keys: \
                      {\"plotSuggestions\": [], \"characterInteractions\": [], \
                      \"styleSuggestions\": []}. Each list holds at most three \
                      one-sentence strings."
            .to_string();

        (system, Self::context_block(context))
    }

    /// Messages asking a character to answer in voice.
    pub fn character_chat(&self, persona: &CharacterPersona, prompt: &str) -> (String, String) {
        let mut system = format!(
            "You are {name}, a character in a novel. Stay in character and \
             answer in {name}'s voice, in at most three sentences.",
            name = persona.name.trim()
        );
        if !persona.description.trim().is_empty() {
            system.push_str(&format!(" Persona: {}.", persona.description.trim()));
        }
        if !persona.traits.is_empty() {
            system.push_str(&format!(" Traits: {}.", persona.traits.join(", ")));
        }

        (system, prompt.to_string())
    }

    /// Messages asking for the story to be continued in a given direction.
    pub fn continuation_chat(&self, context: &StoryContext, direction: &str) -> (String, String) {
        let system = "You are co-writing a novel. Continue the story in the \
                      author's established voice with one or two paragraphs of \
                      prose. Return prose only, no commentary."
            .to_string();

        let user = format!(
            "{}\n\nContinue the story. Direction from the author: {}",
            Self::context_block(context),
            direction.trim()
        );
        (system, user)
    }

    /// Messages asking for a foundation aspect to be fleshed out.
    pub fn detail_chat(&self, kind: DetailKind, brief: &str) -> (String, String) {
        let system = format!(
            "You are helping an author build their story's foundation. \
             Expand the given {} brief into two or three vivid paragraphs of \
             usable detail. Return prose only.",
            kind.label()
        );
        (system, brief.trim().to_string())
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
