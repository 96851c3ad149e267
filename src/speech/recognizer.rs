//! Speech-recognition capability seam.
//!
//! The actual recognition engine (a browser primitive, an OS service) is an
//! opaque platform collaborator.  [`SpeechRecognizer`] is the narrow
//! contract the session manager drives: query support, begin, end.  The
//! capability reports back asynchronously by pushing [`RecognizerEvent`]s
//! into an mpsc channel handed to it at construction time, the same way a
//! platform callback thread would.
//!
//! [`MockRecognizer`] (available under `#[cfg(test)]`) counts `begin`
//! calls and lets tests inject events directly, so the session state
//! machine is testable without any platform capability.

use thiserror::Error;

// ---------------------------------------------------------------------------
// RecognizerEvent
// ---------------------------------------------------------------------------

/// Events emitted by the underlying recognition capability.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// Recognized text.  `is_final` distinguishes a live preview that may
    /// still change from text the recognizer has committed to.
    Transcript { text: String, is_final: bool },

    /// The capability stopped listening, either because it was ended
    /// explicitly or on its own (silence cutoff, service timeout).
    Ended,

    /// A mid-session failure (permission revoked, recognition error).
    Error(String),
}

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can arise from the speech subsystem.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    /// The platform offers no recognition capability.  Terminal for the
    /// session; surfaced once.
    #[error("speech recognition is not available on this platform")]
    Unsupported,

    /// `begin` was called while the capability was already listening.
    #[error("a recognition session is already active")]
    AlreadyActive,

    /// The capability failed to start or aborted.
    #[error("speech capability failed: {0}")]
    Capability(String),
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the recognition capability.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn SpeechRecognizer>` by the session manager.
///
/// # Contract
///
/// - `begin` returns `Err(SpeechError::Unsupported)` when the platform has
///   no capability and `Err(SpeechError::AlreadyActive)` when listening is
///   already underway.
/// - After a successful `begin`, the capability pushes
///   [`RecognizerEvent`]s until it ends; ending (for any reason) emits
///   `RecognizerEvent::Ended` exactly once.
/// - `end` is idempotent.
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the platform offers recognition at all.
    fn is_supported(&self) -> bool;

    /// Start listening.
    fn begin(&self) -> Result<(), SpeechError>;

    /// Stop listening.  Safe to call when not listening.
    fn end(&self);
}

// Compile-time assertion: Box<dyn SpeechRecognizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechRecognizer>) {}
};

// ---------------------------------------------------------------------------
// MockRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that tracks `begin`/`end` calls without any platform
/// capability behind it.  Tests inject [`RecognizerEvent`]s directly into
/// the session's event channel.
#[cfg(test)]
pub struct MockRecognizer {
    supported: bool,
    active: std::sync::atomic::AtomicBool,
    begins: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockRecognizer {
    pub fn supported() -> Self {
        Self {
            supported: true,
            active: std::sync::atomic::AtomicBool::new(false),
            begins: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::supported()
        }
    }

    /// How many times `begin` succeeded.
    pub fn begin_count(&self) -> usize {
        self.begins.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Simulate the capability ending on its own (as before an injected
    /// `RecognizerEvent::Ended`).
    pub fn simulate_end(&self) {
        self.active.store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl SpeechRecognizer for MockRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn begin(&self) -> Result<(), SpeechError> {
        use std::sync::atomic::Ordering;

        if !self.supported {
            return Err(SpeechError::Unsupported);
        }
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(SpeechError::AlreadyActive);
        }
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn end(&self) {
        self.active.store(false, std::sync::atomic::Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_begin_tracks_activity() {
        let rec = MockRecognizer::supported();
        assert!(!rec.is_active());
        rec.begin().unwrap();
        assert!(rec.is_active());
        assert_eq!(rec.begin_count(), 1);
    }

    #[test]
    fn mock_begin_twice_reports_already_active() {
        let rec = MockRecognizer::supported();
        rec.begin().unwrap();
        let err = rec.begin().unwrap_err();
        assert!(matches!(err, SpeechError::AlreadyActive));
        assert_eq!(rec.begin_count(), 1);
    }

    #[test]
    fn mock_unsupported_rejects_begin() {
        let rec = MockRecognizer::unsupported();
        let err = rec.begin().unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported));
        assert_eq!(rec.begin_count(), 0);
    }

    #[test]
    fn mock_end_is_idempotent() {
        let rec = MockRecognizer::supported();
        rec.end();
        rec.begin().unwrap();
        rec.end();
        rec.end();
        assert!(!rec.is_active());
    }

    #[test]
    fn recognizer_is_object_safe() {
        let rec: Box<dyn SpeechRecognizer> = Box::new(MockRecognizer::supported());
        assert!(rec.is_supported());
    }

    #[test]
    fn speech_error_display() {
        assert!(SpeechError::Unsupported.to_string().contains("not available"));
        assert!(SpeechError::Capability("mic gone".into())
            .to_string()
            .contains("mic gone"));
    }
}
