//! Read-aloud toggle over an injectable speech capability.
//!
//! There is no queue: asking to speak while speaking stops the current
//! utterance and discards the new text.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechState {
    Idle,
    Speaking,
}

/// Text-to-speech backend owned outside the dashboard.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, text: &str);
    fn cancel(&self);
    fn is_speaking(&self) -> bool;
}

/// Start speaking `text` when idle, stop when already speaking.
///
/// Without a synthesizer nothing happens and the state stays idle.
pub fn toggle_speech(synth: Option<&dyn SpeechSynthesizer>, text: &str) -> SpeechState {
    let Some(synth) = synth else {
        tracing::warn!("Text-to-speech not supported");
        return SpeechState::Idle;
    };

    if synth.is_speaking() {
        synth.cancel();
        SpeechState::Idle
    } else {
        synth.speak(text);
        SpeechState::Speaking
    }
}

/// Synthesizer that only records what it was asked to say.
///
/// An utterance stays active until cancelled.
#[derive(Debug, Default)]
pub struct InMemorySynthesizer {
    current: Mutex<Option<String>>,
    spoken: Mutex<Vec<String>>,
}

impl InMemorySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().clone()
    }

    /// Every text passed to `speak`, oldest first.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

impl SpeechSynthesizer for InMemorySynthesizer {
    fn speak(&self, text: &str) {
        tracing::debug!(chars = text.chars().count(), "Speaking");
        *self.current.lock() = Some(text.to_string());
        self.spoken.lock().push(text.to_string());
    }

    fn cancel(&self) {
        tracing::debug!("Speech cancelled");
        *self.current.lock() = None;
    }

    fn is_speaking(&self) -> bool {
        self.current.lock().is_some()
    }
}
