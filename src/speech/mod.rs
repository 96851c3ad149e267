//! Dictation and narration over opaque platform speech capabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 SpeechSession (state machine)           │
//! │                                                         │
//! │  SpeechCommand ──▶ Idle ⇄ Listening ──▶ TranscriptEvent │
//! │                      │        ▲                         │
//! │                      │ ended  │ auto-restart            │
//! │                      ▼        │ (continuous mode)       │
//! │                    restart timer                        │
//! └──────────────┬──────────────────────────────────────────┘
//!                │ begin / end
//!                ▼
//!      SpeechRecognizer (platform capability)
//! ```
//!
//! This module provides:
//! * [`SpeechSession`] — start/stop/listen state machine with auto-restart.
//! * [`SpeechRecognizer`] / [`RecognizerEvent`] — the capability seam.
//! * [`TranscriptEvent`] — interim (live preview) vs. final (commit) text.
//! * [`Synthesizer`] / [`MutedSynthesizer`] — the synthesis seam.
//! * [`SpeechError`] — error variants for speech operations.

pub mod recognizer;
pub mod session;
pub mod synthesis;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use recognizer::{RecognizerEvent, SpeechError, SpeechRecognizer};
pub use session::{
    new_shared_state, SharedSpeechState, SpeechCommand, SpeechPhase, SpeechSession,
    SpeechSessionState, TranscriptEvent,
};
pub use synthesis::{MutedSynthesizer, Synthesizer};

// test-only re-export for state-machine tests elsewhere in the crate.
#[cfg(test)]
pub use recognizer::MockRecognizer;
