//! Keyboard instrument core: click-free per-key voices and a live
//! generative scope.
//!
//! Key events flow into [`synth::VoiceManager`], which starts and releases
//! oscillator + gain voices on an explicitly owned audio engine. Every voice
//! sums into one [`engine::AnalysisTap`], and [`render::RenderLoop`] samples
//! that tap once per frame to draw the waveform over a slowly evolving
//! background pattern.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Oscillator -> gain signal chains
pub mod keymap;
pub mod render; // Frame loop and drawing surfaces
pub mod synth; // Voice lifecycle, on both sides of the audio thread

pub use config::InstrumentConfig;
pub use error::{ConfigError, EngineError, Error};
pub use keymap::{KeyMap, NoteId, Pitch};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
