//! Editing-session state machine and shared session state.
//!
//! [`EditorPhase`] drives the coordinator's state machine.  The UI reads it
//! via [`SharedEditorState`] to render the save indicator.
//!
//! [`EditorSessionState`] is the single source of truth for one open
//! chapter: current draft, last durably saved snapshot, dirty flag,
//! auto-save settings, and the in-flight-save flag.  Only the coordinator
//! mutates it; everything else holds a read handle.
//!
//! [`SharedEditorState`] is a type alias for `Arc<Mutex<EditorSessionState>>`
//! — cheap to clone and safe to share across tasks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::EditorConfig;

// ---------------------------------------------------------------------------
// Auto-save interval bounds
// ---------------------------------------------------------------------------

/// Shortest accepted auto-save interval.
pub const MIN_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);
/// Longest accepted auto-save interval.
pub const MAX_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(120);

/// Clamp a requested auto-save interval to the accepted 5-120 s range.
pub fn clamp_autosave_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_AUTOSAVE_INTERVAL, MAX_AUTOSAVE_INTERVAL)
}

// ---------------------------------------------------------------------------
// EditorPhase
// ---------------------------------------------------------------------------

/// States of the chapter editing session.
///
/// The state machine transitions are:
///
/// ```text
/// Clean ──edit──▶ DirtyWaiting ──timer fires──▶ Saving
///                              ──manual save──▶ Saving  (pending timer cancelled)
/// Saving ──success, no newer edits──▶ Clean
///        ──success, newer edits────▶ DirtyWaiting
///        ──failure──▶ Error  (content stays dirty)
/// Error ──edit──▶ DirtyWaiting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// Content matches the last saved snapshot; nothing pending.
    Clean,

    /// Content differs from the last saved snapshot; waiting on the
    /// debounce timer or an explicit save.
    DirtyWaiting,

    /// A version write is in flight.
    Saving,

    /// The last save failed; content is still dirty and no retry is
    /// scheduled until the next edit or settings change.
    Error,
}

impl EditorPhase {
    /// Returns `true` while a version write is in flight.
    pub fn is_saving(&self) -> bool {
        matches!(self, EditorPhase::Saving)
    }

    /// A short human-readable label suitable for a save-status indicator.
    pub fn label(&self) -> &'static str {
        match self {
            EditorPhase::Clean => "Saved",
            EditorPhase::DirtyWaiting => "Unsaved changes",
            EditorPhase::Saving => "Saving…",
            EditorPhase::Error => "Save failed",
        }
    }
}

impl Default for EditorPhase {
    fn default() -> Self {
        EditorPhase::Clean
    }
}

// ---------------------------------------------------------------------------
// EditorSessionState
// ---------------------------------------------------------------------------

/// Shared state of one open chapter editing session.
///
/// Held behind [`SharedEditorState`].  The coordinator mutates it; the UI
/// reads it to render content, word count and save status.
pub struct EditorSessionState {
    /// The draft as currently edited.
    pub current_content: String,

    /// The snapshot most recently confirmed persisted.
    pub last_saved_content: String,

    /// When the last successful save completed.  `None` until the first
    /// save of this session.
    pub last_saved_at: Option<DateTime<Utc>>,

    /// `current_content != last_saved_content && !current_content.trim().is_empty()`
    /// — kept up to date by [`refresh_dirty`](Self::refresh_dirty).
    pub dirty: bool,

    /// Whether the debounced auto-save timer is armed on edits.
    pub autosave_enabled: bool,

    /// Quiet period before an auto-save fires.  Always within the
    /// 5-120 s bounds.
    pub autosave_interval: Duration,

    /// `true` while a version write is in flight.  At most one save runs
    /// per session at any time.
    pub save_in_flight: bool,

    /// `true` when the most recent save attempt failed and no edit has
    /// happened since.
    pub last_save_failed: bool,

    /// Message describing the last save failure, for the UI.
    pub error_message: Option<String>,

    /// Current phase, derived from the flags above.
    pub phase: EditorPhase,
}

impl EditorSessionState {
    /// Create session state for a freshly opened chapter.
    ///
    /// The chapter's persisted content seeds both the draft and the
    /// last-saved snapshot, so a new session starts clean.
    pub fn new(initial_content: impl Into<String>, config: &EditorConfig) -> Self {
        let content = initial_content.into();
        Self {
            current_content: content.clone(),
            last_saved_content: content,
            last_saved_at: None,
            dirty: false,
            autosave_enabled: config.autosave_enabled,
            autosave_interval: clamp_autosave_interval(config.autosave_interval()),
            save_in_flight: false,
            last_save_failed: false,
            error_message: None,
            phase: EditorPhase::Clean,
        }
    }

    /// Recompute the dirty flag from the content fields.
    pub fn refresh_dirty(&mut self) {
        self.dirty = self.current_content != self.last_saved_content
            && !self.current_content.trim().is_empty();
    }

    /// Recompute the phase from the flags.
    pub fn refresh_phase(&mut self) {
        self.phase = if self.save_in_flight {
            EditorPhase::Saving
        } else if self.last_save_failed && self.dirty {
            EditorPhase::Error
        } else if self.dirty {
            EditorPhase::DirtyWaiting
        } else {
            EditorPhase::Clean
        };
    }
}

// ---------------------------------------------------------------------------
// SharedEditorState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`EditorSessionState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedEditorState = Arc<Mutex<EditorSessionState>>;

/// Construct a new [`SharedEditorState`] for an opened chapter.
pub fn new_shared_state(
    initial_content: impl Into<String>,
    config: &EditorConfig,
) -> SharedEditorState {
    Arc::new(Mutex::new(EditorSessionState::new(initial_content, config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state(initial: &str) -> EditorSessionState {
        EditorSessionState::new(initial, &EditorConfig::default())
    }

    // ---- dirty flag ---

    #[test]
    fn fresh_session_is_clean() {
        let state = make_state("<p>hello</p>");
        assert!(!state.dirty);
        assert_eq!(state.phase, EditorPhase::Clean);
        assert!(state.last_saved_at.is_none());
    }

    #[test]
    fn changed_content_is_dirty() {
        let mut state = make_state("old");
        state.current_content = "new".into();
        state.refresh_dirty();
        assert!(state.dirty);
    }

    #[test]
    fn reverting_to_saved_content_clears_dirty() {
        let mut state = make_state("old");
        state.current_content = "new".into();
        state.refresh_dirty();
        state.current_content = "old".into();
        state.refresh_dirty();
        assert!(!state.dirty);
    }

    #[test]
    fn empty_content_is_never_dirty() {
        let mut state = make_state("old");
        state.current_content = String::new();
        state.refresh_dirty();
        assert!(!state.dirty);
    }

    #[test]
    fn whitespace_only_content_is_never_dirty() {
        let mut state = make_state("old");
        state.current_content = "   \n\t ".into();
        state.refresh_dirty();
        assert!(!state.dirty);
    }

    // ---- phase derivation ---

    #[test]
    fn in_flight_save_wins_over_dirty() {
        let mut state = make_state("old");
        state.current_content = "new".into();
        state.refresh_dirty();
        state.save_in_flight = true;
        state.refresh_phase();
        assert_eq!(state.phase, EditorPhase::Saving);
        assert!(state.phase.is_saving());
    }

    #[test]
    fn dirty_without_failure_is_dirty_waiting() {
        let mut state = make_state("old");
        state.current_content = "new".into();
        state.refresh_dirty();
        state.refresh_phase();
        assert_eq!(state.phase, EditorPhase::DirtyWaiting);
    }

    #[test]
    fn failed_save_with_dirty_content_is_error() {
        let mut state = make_state("old");
        state.current_content = "new".into();
        state.refresh_dirty();
        state.last_save_failed = true;
        state.refresh_phase();
        assert_eq!(state.phase, EditorPhase::Error);
    }

    #[test]
    fn clean_content_is_clean_even_after_failure_flag_clears() {
        let mut state = make_state("same");
        state.current_content = "same".into();
        state.refresh_dirty();
        state.refresh_phase();
        assert_eq!(state.phase, EditorPhase::Clean);
    }

    // ---- interval clamping ---

    #[test]
    fn interval_below_minimum_clamps_up() {
        assert_eq!(
            clamp_autosave_interval(Duration::from_secs(1)),
            MIN_AUTOSAVE_INTERVAL
        );
    }

    #[test]
    fn interval_above_maximum_clamps_down() {
        assert_eq!(
            clamp_autosave_interval(Duration::from_secs(600)),
            MAX_AUTOSAVE_INTERVAL
        );
    }

    #[test]
    fn interval_inside_bounds_is_untouched() {
        assert_eq!(
            clamp_autosave_interval(Duration::from_secs(45)),
            Duration::from_secs(45)
        );
    }

    #[test]
    fn session_clamps_configured_interval() {
        let config = EditorConfig {
            autosave_enabled: true,
            autosave_interval_secs: 2,
        };
        let state = EditorSessionState::new("", &config);
        assert_eq!(state.autosave_interval, MIN_AUTOSAVE_INTERVAL);
    }

    // ---- labels ---

    #[test]
    fn phase_labels() {
        assert_eq!(EditorPhase::Clean.label(), "Saved");
        assert_eq!(EditorPhase::DirtyWaiting.label(), "Unsaved changes");
        assert_eq!(EditorPhase::Saving.label(), "Saving…");
        assert_eq!(EditorPhase::Error.label(), "Save failed");
    }

    // ---- SharedEditorState ---

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedEditorState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state("draft", &EditorConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().unwrap().current_content = "changed".into();
        assert_eq!(state2.lock().unwrap().current_content, "changed");
    }
}
