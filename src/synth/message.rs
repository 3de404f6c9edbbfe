use std::fmt;

use rtrb::Consumer;

use crate::keymap::Pitch;

/// Identity of one press. Never reused, so a late teardown can only ever
/// reach the voice it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoiceId(pub(crate) u64);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Control messages from the key handlers to the audio side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceMessage {
    /// Allocate an oscillator + gain chain and start its attack ramp.
    Start { voice: VoiceId, pitch: Pitch },
    /// Begin the release ramp.
    Release { voice: VoiceId },
    /// Tear the voice down once it is silent.
    Stop { voice: VoiceId },
    /// Release everything immediately (shutdown).
    StopAll,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<VoiceMessage>;
}

impl MessageReceiver for Consumer<VoiceMessage> {
    fn pop(&mut self) -> Option<VoiceMessage> {
        Consumer::pop(self).ok()
    }
}
