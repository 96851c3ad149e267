//! Chapter editing session: dirty tracking, debounced auto-save,
//! versioning.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │              EditorCoordinator (state machine)             │
//! │                                                            │
//! │  EditorCommand ──▶ Clean ⇄ DirtyWaiting ──▶ Saving         │
//! │                                 ▲             │            │
//! │                    debounce ────┘             ▼            │
//! │                    timer              Clean / Error        │
//! │                                                            │
//! │  outcomes ──▶ EditorEvent (Saved / SaveFailed)             │
//! └──────────────┬─────────────────────────────────────────────┘
//!                │ create_version
//!                ▼
//!        VersionStore (persistence service)
//! ```
//!
//! This module provides:
//! * [`EditorCoordinator`] — the autosave/versioning coordinator.
//! * [`EditorCommand`] / [`EditorEvent`] — its command/outcome channels.
//! * [`EditorSessionState`] / [`SharedEditorState`] — per-chapter session
//!   state, created when a chapter is opened and discarded with it.
//! * [`words`] — markup-aware word counting for version records.

pub mod coordinator;
pub mod state;
pub mod words;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use coordinator::{EditorCommand, EditorCoordinator, EditorEvent};
pub use state::{
    clamp_autosave_interval, new_shared_state, EditorPhase, EditorSessionState,
    SharedEditorState, MAX_AUTOSAVE_INTERVAL, MIN_AUTOSAVE_INTERVAL,
};
pub use words::{strip_markup, word_count};
