//! Dictation session manager — wraps the recognition capability in a
//! start/stop contract with auto-restart.
//!
//! [`SpeechSession`] owns the [`SharedSpeechState`] and responds to
//! [`SpeechCommand`]s and [`RecognizerEvent`]s received over
//! `tokio::sync::mpsc` channels.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ Listening ──stop / capability end──▶ Idle
//!
//! continuous mode, capability ended without stop():
//!   Listening ──▶ Idle ──(fixed delay)──▶ Listening      (auto-restart)
//!
//! unsupported capability:
//!   any ──start──▶ Unavailable                            (terminal)
//! ```
//!
//! Interim transcripts are forwarded as live previews and buffered in the
//! shared state; a final transcript commits the utterance and clears the
//! buffer.  The buffer survives auto-restarts so no utterance text is lost
//! or duplicated across the gap.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::config::SpeechConfig;

use super::recognizer::{RecognizerEvent, SpeechError, SpeechRecognizer};

// ---------------------------------------------------------------------------
// SpeechPhase
// ---------------------------------------------------------------------------

/// States of the dictation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechPhase {
    /// Not listening.
    Idle,

    /// The capability is actively recognizing.
    Listening,

    /// The platform has no recognition capability.  Terminal; surfaced
    /// once and the feature stays disabled for the session.
    Unavailable,
}

impl SpeechPhase {
    pub fn is_listening(&self) -> bool {
        matches!(self, SpeechPhase::Listening)
    }
}

impl Default for SpeechPhase {
    fn default() -> Self {
        SpeechPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// Shared session state
// ---------------------------------------------------------------------------

/// Shared dictation state, read by the UI to render the microphone
/// indicator and the live preview.
#[derive(Debug, Default)]
pub struct SpeechSessionState {
    /// Current phase of the session.
    pub phase: SpeechPhase,

    /// Live preview of the utterance in progress.  Cleared when the
    /// recognizer commits a final transcript.
    pub interim: String,

    /// Message describing the most recent failure, for the UI.
    pub error_message: Option<String>,
}

/// Thread-safe handle to [`SpeechSessionState`].
pub type SharedSpeechState = Arc<Mutex<SpeechSessionState>>;

/// Construct a new [`SharedSpeechState`] in the idle phase.
pub fn new_shared_state() -> SharedSpeechState {
    Arc::new(Mutex::new(SpeechSessionState::default()))
}

// ---------------------------------------------------------------------------
// Commands and outputs
// ---------------------------------------------------------------------------

/// Commands accepted by a running [`SpeechSession`].
#[derive(Debug, Clone, Copy)]
pub enum SpeechCommand {
    /// Begin listening.  Failures (unsupported, already active) are
    /// recorded in the shared state, never propagated.
    Start,

    /// Stop listening.  Idempotent; suppresses the auto-restart for the
    /// end event it causes.
    Stop,
}

/// Transcripts forwarded to the caller (prompt dictation, recording modal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Text that may still change while the utterance continues.
    Interim(String),

    /// Text the recognizer has committed to.
    Final(String),
}

// ---------------------------------------------------------------------------
// SpeechSession
// ---------------------------------------------------------------------------

/// Drives the dictation state machine.
///
/// Create with [`SpeechSession::new`], then call [`run`](Self::run) inside
/// a tokio task.  The same session instance serves every call site that
/// wants dictation; they share the start/stop contract.
pub struct SpeechSession {
    recognizer: Arc<dyn SpeechRecognizer>,
    state: SharedSpeechState,
    continuous: bool,
    restart_delay: Duration,
    /// Set by `Stop`, consumed by the matching `Ended` event.
    explicit_stop: bool,
}

impl SpeechSession {
    /// Create a new session manager.
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        state: SharedSpeechState,
        config: &SpeechConfig,
    ) -> Self {
        Self {
            recognizer,
            state,
            continuous: config.continuous,
            restart_delay: config.restart_delay(),
            explicit_stop: false,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the session until both channels are closed.
    ///
    /// * `commands`    — start/stop requests from the UI.
    /// * `events`      — pushed by the recognition capability.
    /// * `transcripts` — interim/final text forwarded to the caller.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SpeechCommand>,
        mut events: mpsc::Receiver<RecognizerEvent>,
        transcripts: mpsc::Sender<TranscriptEvent>,
    ) {
        let mut restart_at: Option<Instant> = None;

        loop {
            tokio::select! {
                maybe_cmd = commands.recv() => {
                    let Some(cmd) = maybe_cmd else { break };
                    match cmd {
                        SpeechCommand::Start => self.on_start(&mut restart_at),
                        SpeechCommand::Stop => self.on_stop(&mut restart_at),
                    }
                }
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else { break };
                    match event {
                        RecognizerEvent::Transcript { text, is_final } => {
                            self.on_transcript(text, is_final, &transcripts).await;
                        }
                        RecognizerEvent::Ended => self.on_ended(&mut restart_at),
                        RecognizerEvent::Error(message) => {
                            self.on_error(message, &mut restart_at);
                        }
                    }
                }
                _ = sleep_until_restart(restart_at), if restart_at.is_some() => {
                    restart_at = None;
                    self.on_restart();
                }
            }
        }

        log::debug!("speech: channels closed, session torn down");
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    fn on_start(&mut self, restart_at: &mut Option<Instant>) {
        let mut st = self.state.lock().unwrap();

        if st.phase == SpeechPhase::Unavailable {
            // Already surfaced once; stays disabled.
            return;
        }
        if !self.recognizer.is_supported() {
            st.phase = SpeechPhase::Unavailable;
            st.error_message = Some(SpeechError::Unsupported.to_string());
            log::warn!("speech: {}", SpeechError::Unsupported);
            return;
        }
        if st.phase == SpeechPhase::Listening {
            st.error_message = Some(SpeechError::AlreadyActive.to_string());
            return;
        }

        match self.recognizer.begin() {
            Ok(()) => {
                st.phase = SpeechPhase::Listening;
                st.error_message = None;
                st.interim.clear();
                self.explicit_stop = false;
                *restart_at = None;
                log::debug!("speech: listening");
            }
            Err(e) => {
                st.error_message = Some(e.to_string());
                log::warn!("speech: start failed: {e}");
            }
        }
    }

    fn on_stop(&mut self, restart_at: &mut Option<Instant>) {
        self.explicit_stop = true;
        *restart_at = None;
        self.recognizer.end();

        let mut st = self.state.lock().unwrap();
        if st.phase == SpeechPhase::Listening {
            st.phase = SpeechPhase::Idle;
            log::debug!("speech: stopped");
        }
    }

    async fn on_transcript(
        &self,
        text: String,
        is_final: bool,
        transcripts: &mpsc::Sender<TranscriptEvent>,
    ) {
        let event = {
            let mut st = self.state.lock().unwrap();
            if is_final {
                st.interim.clear();
                TranscriptEvent::Final(text)
            } else {
                st.interim = text.clone();
                TranscriptEvent::Interim(text)
            }
        };
        let _ = transcripts.send(event).await;
    }

    /// The capability stopped.  Restart only when it ended on its own and
    /// continuous mode asks for it.
    fn on_ended(&mut self, restart_at: &mut Option<Instant>) {
        let mut st = self.state.lock().unwrap();
        if st.phase == SpeechPhase::Unavailable {
            return;
        }
        st.phase = SpeechPhase::Idle;

        if self.explicit_stop {
            self.explicit_stop = false;
            return;
        }
        if self.continuous {
            *restart_at = Some(Instant::now() + self.restart_delay);
            log::debug!("speech: ended unexpectedly, restarting in {:?}", self.restart_delay);
        }
    }

    /// Mid-session failure: surface, go idle, never auto-restart.
    fn on_error(&mut self, message: String, restart_at: &mut Option<Instant>) {
        *restart_at = None;

        let mut st = self.state.lock().unwrap();
        if st.phase == SpeechPhase::Unavailable {
            return;
        }
        st.phase = SpeechPhase::Idle;
        log::warn!("speech: capability error: {message}");
        st.error_message = Some(message);
    }

    fn on_restart(&mut self) {
        if self.explicit_stop {
            return;
        }
        let mut st = self.state.lock().unwrap();
        match self.recognizer.begin() {
            Ok(()) => {
                st.phase = SpeechPhase::Listening;
                log::debug!("speech: restarted");
            }
            Err(e) => {
                st.phase = SpeechPhase::Idle;
                st.error_message = Some(e.to_string());
                log::warn!("speech: restart failed: {e}");
            }
        }
    }
}

/// Sleep until the restart deadline.  Only polled when the caller's guard
/// has checked that a deadline exists.
async fn sleep_until_restart(restart_at: Option<Instant>) {
    time::sleep_until(restart_at.expect("guarded by restart_at.is_some()")).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
