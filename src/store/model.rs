//! Wire model for the persistence service.
//!
//! Field names follow the service's JSON convention (camelCase keys,
//! kebab-case tag strings). [`VersionRecord`]s are immutable snapshots:
//! the service appends them per chapter and never rewrites one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SaveTag
// ---------------------------------------------------------------------------

/// Classifies what triggered a version snapshot.
///
/// Serialized as `"auto"`, `"manual"`, `"ai-assisted"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveTag {
    /// Written by the debounced auto-save timer.
    Auto,
    /// Explicit user checkpoint ("Save Now").
    Manual,
    /// Written after AI-generated text was accepted into the draft.
    AiAssisted,
}

impl SaveTag {
    /// The wire string for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveTag::Auto => "auto",
            SaveTag::Manual => "manual",
            SaveTag::AiAssisted => "ai-assisted",
        }
    }
}

impl std::fmt::Display for SaveTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// VersionRecord
// ---------------------------------------------------------------------------

/// One persisted snapshot of chapter content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: String,
    pub chapter_id: String,
    pub content: String,
    pub word_count: usize,
    pub tag: SaveTag,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chapter
// ---------------------------------------------------------------------------

/// A chapter as served by the persistence service.
///
/// `content` is the rich-text markup string the editor works on;
/// `position` is the chapter's ordinal inside its story.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub content: String,
    pub position: u32,
    pub word_count: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- SaveTag wire format ---

    #[test]
    fn save_tag_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&SaveTag::Auto).unwrap(), "\"auto\"");
        assert_eq!(
            serde_json::to_string(&SaveTag::Manual).unwrap(),
            "\"manual\""
        );
        assert_eq!(
            serde_json::to_string(&SaveTag::AiAssisted).unwrap(),
            "\"ai-assisted\""
        );
    }

    #[test]
    fn save_tag_deserializes_from_wire_strings() {
        let tag: SaveTag = serde_json::from_str("\"ai-assisted\"").unwrap();
        assert_eq!(tag, SaveTag::AiAssisted);
    }

    #[test]
    fn save_tag_display_matches_wire_string() {
        assert_eq!(SaveTag::AiAssisted.to_string(), "ai-assisted");
    }

    // ---- VersionRecord ---

    #[test]
    fn version_record_uses_camel_case_keys() {
        let record = VersionRecord {
            id: "v1".into(),
            chapter_id: "ch1".into(),
            content: "<p>Once upon a time</p>".into(),
            word_count: 4,
            tag: SaveTag::Manual,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["chapterId"], "ch1");
        assert_eq!(json["wordCount"], 4);
        assert_eq!(json["tag"], "manual");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn version_record_round_trips() {
        let record = VersionRecord {
            id: "v2".into(),
            chapter_id: "ch9".into(),
            content: "draft".into(),
            word_count: 1,
            tag: SaveTag::Auto,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: VersionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "v2");
        assert_eq!(back.chapter_id, "ch9");
        assert_eq!(back.tag, SaveTag::Auto);
        assert_eq!(back.created_at, record.created_at);
    }

    // ---- Chapter ---

    #[test]
    fn chapter_deserializes_from_service_json() {
        let json = r#"{
            "id": "ch1",
            "title": "The Lighthouse",
            "content": "<p>It was a dark night.</p>",
            "position": 3,
            "wordCount": 6
        }"#;

        let chapter: Chapter = serde_json::from_str(json).unwrap();
        assert_eq!(chapter.title, "The Lighthouse");
        assert_eq!(chapter.position, 3);
        assert_eq!(chapter.word_count, 6);
    }
}
