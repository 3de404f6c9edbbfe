//! Low-level DSP primitives used by the graph nodes.
//!
//! Both are allocation-free and realtime-safe, so voices can embed them
//! directly and render inside the audio callback.

/// Linear attack/sustain/release gain ramp.
pub mod envelope;
/// Sine oscillator.
pub mod oscillator;

pub use envelope::EnvelopeStage;
