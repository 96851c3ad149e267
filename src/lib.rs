//! Storyloom — session engine for an AI-assisted story-writing studio.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       frontend (out of scope)              │
//! └──────┬──────────────────┬──────────────────┬───────────────┘
//!        │ EditorCommand    │ SpeechCommand    │ StoryAi calls
//!        ▼                  ▼                  ▼
//! ┌──────────────┐  ┌───────────────┐  ┌──────────────┐
//! │ editor::     │  │ speech::      │  │ ai::         │
//! │ Coordinator  │  │ SpeechSession │  │ BestEffortAi │
//! └──────┬───────┘  └───────┬───────┘  └──────┬───────┘
//!        │ create_version   │ begin/end       │ chat completions
//!        ▼                  ▼                  ▼
//! ┌──────────────┐  ┌───────────────┐  ┌──────────────┐
//! │ store::      │  │ platform      │  │ remote LLM   │
//! │ VersionStore │  │ recognizer    │  │ endpoint     │
//! └──────────────┘  └───────────────┘  └──────────────┘
//! ```
//!
//! The editor coordinator owns the draft of one open chapter: it tracks the
//! dirty flag, debounces auto-saves, serializes version writes, and reports
//! save outcomes. The speech session wraps an opaque recognition capability
//! into a start/stop contract with auto-restart in continuous mode. The AI
//! gateway turns story payloads into chat-completion requests and degrades
//! to safe fallback values when the backend is unreachable.
//!
//! All external collaborators sit behind object-safe async traits
//! ([`store::VersionStore`], [`ai::StoryAi`], [`speech::SpeechRecognizer`],
//! [`speech::Synthesizer`]) so the state machines are testable without a
//! network or a microphone.

pub mod ai;
pub mod config;
pub mod editor;
pub mod speech;
pub mod store;
