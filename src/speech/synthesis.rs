//! Speech-synthesis capability seam.
//!
//! Synthesis is entirely platform-owned; the application only needs a
//! speak/cancel/pause/resume surface for voicing AI prompts and character
//! replies during the guided story flow.

/// Object-safe interface to the platform's speech-synthesis primitive.
pub trait Synthesizer: Send + Sync {
    /// Queue `text` for speaking, replacing nothing already queued.
    fn speak(&self, text: &str);

    /// Drop everything queued and stop speaking.
    fn cancel(&self);

    /// Pause mid-utterance.
    fn pause(&self);

    /// Resume a paused utterance.
    fn resume(&self);
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Synthesizer>) {}
};

/// A synthesizer for headless deployments: logs what would be spoken and
/// otherwise does nothing.
pub struct MutedSynthesizer;

impl Synthesizer for MutedSynthesizer {
    fn speak(&self, text: &str) {
        log::debug!("synthesis (muted): {text}");
    }

    fn cancel(&self) {}

    fn pause(&self) {}

    fn resume(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_synthesizer_is_usable_as_trait_object() {
        let synth: Box<dyn Synthesizer> = Box::new(MutedSynthesizer);
        synth.speak("hello");
        synth.pause();
        synth.resume();
        synth.cancel();
    }
}
