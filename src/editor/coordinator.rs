//! Editing-session coordinator — decides when and what to persist as the
//! draft is edited, without writing on every keystroke and without losing
//! data.
//!
//! [`EditorCoordinator`] owns the [`SharedEditorState`] of one open chapter
//! and responds to [`EditorCommand`]s received over a `tokio::sync::mpsc`
//! channel.
//!
//! # Save flow
//!
//! ```text
//! EditorCommand::Edit { content }
//!   └─▶ recompute dirty, clear pending timer,
//!       re-arm it only while dirty and auto-save is enabled
//!
//! debounce timer fires                       [DirtyWaiting → Saving]
//!   └─▶ still dirty, nothing in flight  → spawn save tagged `auto`
//!       save already in flight          → dropped, not queued
//!
//! EditorCommand::ManualSave                  [→ Saving]
//!   └─▶ cancels the pending timer; saves even when content is unchanged
//!
//! save completes
//!   ├─ Ok  → adopt snapshot as last-saved, re-check current content:
//!   │        newer edits → stay dirty, re-arm timer   [→ DirtyWaiting]
//!   │        no edits    → clean                      [→ Clean]
//!   └─ Err → stay dirty, no retry scheduled           [→ Error]
//!            `manual` failures are emitted, `auto` failures only logged
//! ```
//!
//! At most one save is in flight per session; the completion is reported
//! back over an internal channel so the command loop stays responsive while
//! the network request runs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::store::{SaveTag, StoreError, VersionRecord, VersionStore};

use super::state::{clamp_autosave_interval, SharedEditorState};
use super::words::word_count;

// ---------------------------------------------------------------------------
// EditorCommand / EditorEvent
// ---------------------------------------------------------------------------

/// Commands accepted by a running [`EditorCoordinator`].
#[derive(Debug, Clone)]
pub enum EditorCommand {
    /// The draft changed (keystroke, paste, voice insert, AI acceptance).
    Edit { content: String },

    /// Explicit "Save Now".  Saves even when content is unchanged.
    ManualSave,

    /// Turn the debounced auto-save on or off.
    SetAutoSaveEnabled(bool),

    /// Change the auto-save quiet period.  Clamped to 5-120 s.
    SetAutoSaveInterval(std::time::Duration),
}

/// Save outcomes reported to the UI layer.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A version was persisted.
    Saved { record: VersionRecord },

    /// A save failed visibly.  Only `manual` saves emit this; auto-save
    /// failures are logged and retried passively through further edits.
    SaveFailed { tag: SaveTag, message: String },
}

// ---------------------------------------------------------------------------
// Save completion (internal)
// ---------------------------------------------------------------------------

/// What a spawned save task reports back to the command loop.
struct SaveOutcome {
    tag: SaveTag,
    /// The exact snapshot that was sent to the store.
    content: String,
    result: Result<VersionRecord, StoreError>,
}

// ---------------------------------------------------------------------------
// EditorCoordinator
// ---------------------------------------------------------------------------

/// Drives the autosave/versioning state machine for one open chapter.
///
/// Create with [`EditorCoordinator::new`], then call [`run`](Self::run)
/// inside a tokio task.  Dropping all command senders tears the session
/// down; only committed versions survive.
pub struct EditorCoordinator {
    chapter_id: String,
    store: Arc<dyn VersionStore>,
    state: SharedEditorState,
    event_tx: mpsc::Sender<EditorEvent>,
}

impl EditorCoordinator {
    /// Create a new coordinator.
    ///
    /// # Arguments
    ///
    /// * `chapter_id` — the chapter this session edits.
    /// * `store`      — persistence client (e.g. `HttpVersionStore`).
    /// * `state`      — shared session state (also read by the UI).
    /// * `event_tx`   — channel for save outcomes.
    pub fn new(
        chapter_id: impl Into<String>,
        store: Arc<dyn VersionStore>,
        state: SharedEditorState,
        event_tx: mpsc::Sender<EditorEvent>,
    ) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            store,
            state,
            event_tx,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the coordinator until `commands` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task.  The
    /// loop multiplexes incoming commands, the debounce deadline, and the
    /// completion of an in-flight save.
    pub async fn run(self, mut commands: mpsc::Receiver<EditorCommand>) {
        // Save tasks report back here so the loop never blocks on the store.
        let (done_tx, mut done_rx) = mpsc::channel::<SaveOutcome>(1);
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                maybe_cmd = commands.recv() => {
                    let Some(cmd) = maybe_cmd else { break };
                    match cmd {
                        EditorCommand::Edit { content } => {
                            self.on_edit(content, &mut deadline);
                        }
                        EditorCommand::ManualSave => {
                            self.on_manual_save(&mut deadline, &done_tx);
                        }
                        EditorCommand::SetAutoSaveEnabled(enabled) => {
                            self.on_set_enabled(enabled, &mut deadline);
                        }
                        EditorCommand::SetAutoSaveInterval(interval) => {
                            self.on_set_interval(interval, &mut deadline);
                        }
                    }
                }
                _ = sleep_until_deadline(deadline), if deadline.is_some() => {
                    deadline = None;
                    self.on_timer(&done_tx);
                }
                maybe_outcome = done_rx.recv() => {
                    if let Some(outcome) = maybe_outcome {
                        self.on_save_done(outcome, &mut deadline).await;
                    }
                }
            }
        }

        // An in-flight request may still complete; its result is discarded
        // with the session.
        log::debug!("editor: command channel closed, session torn down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    /// Adopt new content, recompute dirty, and reschedule the timer.
    fn on_edit(&self, content: String, deadline: &mut Option<Instant>) {
        let mut st = self.state.lock().unwrap();
        st.current_content = content;
        st.last_save_failed = false;
        st.refresh_dirty();

        // Re-arming rule: any pending timer is cleared; a fresh one is
        // scheduled only while dirty and enabled.
        *deadline = if st.dirty && st.autosave_enabled {
            Some(Instant::now() + st.autosave_interval)
        } else {
            None
        };

        st.refresh_phase();
    }

    /// The debounce interval elapsed with no further edits.
    fn on_timer(&self, done_tx: &mpsc::Sender<SaveOutcome>) {
        let mut st = self.state.lock().unwrap();
        if !st.autosave_enabled || !st.dirty {
            return;
        }
        if st.save_in_flight {
            // Dropped, not queued.  The completion handler re-arms the
            // timer if the content is still dirty afterwards.
            log::debug!("editor: auto-save skipped, a save is already in flight");
            return;
        }
        self.spawn_save_locked(&mut st, SaveTag::Auto, done_tx);
    }

    /// Explicit "Save Now".
    fn on_manual_save(&self, deadline: &mut Option<Instant>, done_tx: &mpsc::Sender<SaveOutcome>) {
        // A manual save supersedes whatever the timer was waiting for.
        *deadline = None;

        let mut st = self.state.lock().unwrap();
        if st.save_in_flight {
            log::debug!("editor: manual save dropped, a save is already in flight");
            return;
        }
        self.spawn_save_locked(&mut st, SaveTag::Manual, done_tx);
    }

    fn on_set_enabled(&self, enabled: bool, deadline: &mut Option<Instant>) {
        let mut st = self.state.lock().unwrap();
        st.autosave_enabled = enabled;

        *deadline = if enabled && st.dirty {
            Some(Instant::now() + st.autosave_interval)
        } else {
            None
        };

        log::debug!("editor: auto-save {}", if enabled { "enabled" } else { "disabled" });
    }

    fn on_set_interval(&self, interval: std::time::Duration, deadline: &mut Option<Instant>) {
        let interval = clamp_autosave_interval(interval);

        let mut st = self.state.lock().unwrap();
        st.autosave_interval = interval;

        // Same re-arming rule as edits: the old deadline is dead either way.
        *deadline = if st.autosave_enabled && st.dirty {
            Some(Instant::now() + interval)
        } else {
            None
        };

        log::debug!("editor: auto-save interval set to {interval:?}");
    }

    // -----------------------------------------------------------------------
    // The single persistence path
    // -----------------------------------------------------------------------

    /// Guard preconditions and spawn the version write.
    ///
    /// Callers must hold the state lock and have verified that no save is
    /// in flight.
    fn spawn_save_locked(
        &self,
        st: &mut crate::editor::state::EditorSessionState,
        tag: SaveTag,
        done_tx: &mpsc::Sender<SaveOutcome>,
    ) {
        let content = st.current_content.clone();

        // Empty drafts are never worth a version, for any tag.
        if content.trim().is_empty() {
            log::debug!("editor: {tag} save skipped, draft is empty");
            return;
        }

        // Unchanged content only gets a version when explicitly requested.
        if tag != SaveTag::Manual && content == st.last_saved_content {
            log::debug!("editor: {tag} save skipped, content unchanged");
            return;
        }

        st.save_in_flight = true;
        st.refresh_phase();

        let words = word_count(&content);
        let store = Arc::clone(&self.store);
        let chapter_id = self.chapter_id.clone();
        let done_tx = done_tx.clone();

        log::debug!("editor: {tag} save started ({words} words)");

        tokio::spawn(async move {
            let result = store
                .create_version(&chapter_id, &content, words, tag)
                .await;
            let _ = done_tx
                .send(SaveOutcome {
                    tag,
                    content,
                    result,
                })
                .await;
        });
    }

    /// Apply a completed save opportunistically against the current state.
    async fn on_save_done(&self, outcome: SaveOutcome, deadline: &mut Option<Instant>) {
        let event = {
            let mut st = self.state.lock().unwrap();
            st.save_in_flight = false;

            match outcome.result {
                Ok(record) => {
                    st.last_saved_content = outcome.content;
                    st.last_saved_at = Some(chrono::Utc::now());
                    st.last_save_failed = false;
                    st.error_message = None;

                    // Edits may have landed while the request was out; the
                    // clean transition only applies when they did not.
                    st.refresh_dirty();
                    if st.dirty && st.autosave_enabled {
                        *deadline = Some(Instant::now() + st.autosave_interval);
                    }
                    st.refresh_phase();

                    log::debug!("editor: {} save confirmed as {}", outcome.tag, record.id);
                    Some(EditorEvent::Saved { record })
                }
                Err(err) => {
                    st.last_save_failed = true;
                    st.error_message = Some(err.to_string());
                    st.refresh_dirty();
                    st.refresh_phase();

                    match outcome.tag {
                        SaveTag::Manual => Some(EditorEvent::SaveFailed {
                            tag: outcome.tag,
                            message: err.to_string(),
                        }),
                        _ => {
                            log::warn!("editor: {} save failed: {err}", outcome.tag);
                            None
                        }
                    }
                }
            }
        };

        if let Some(event) = event {
            let _ = self.event_tx.send(event).await;
        }
    }
}

/// Sleep until `deadline`.  Only polled when the caller's guard has checked
/// that a deadline exists.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    time::sleep_until(deadline.expect("guarded by deadline.is_some()")).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
