//! The explicitly owned audio engine.
//!
//! [`AudioBackend`] is the seam between control code and the audio thread:
//! the voice manager only ever sends messages and reads the audio clock.
//! [`AudioEngine`] plays through the default cpal device;
//! [`OfflineEngine`] renders the same mixer synchronously.

mod audio;
mod offline;
pub mod scheduler;
pub mod tap;

pub use audio::AudioEngine;
pub use offline::OfflineEngine;
pub use scheduler::{Scheduler, Teardown};
pub use tap::{AnalysisTap, TapWriter};

use crate::{error::EngineError, synth::message::VoiceMessage};

pub trait AudioBackend {
    /// Current position of the audio timeline, in seconds.
    fn now(&self) -> f64;

    /// Hand a control message to the audio side. Never blocks.
    fn send(&mut self, msg: VoiceMessage) -> Result<(), EngineError>;
}

impl<B: AudioBackend + ?Sized> AudioBackend for &mut B {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn send(&mut self, msg: VoiceMessage) -> Result<(), EngineError> {
        (**self).send(msg)
    }
}
