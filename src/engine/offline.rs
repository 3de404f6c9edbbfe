use std::sync::Arc;

use crate::{
    config::InstrumentConfig,
    dsp::EnvelopeStage,
    engine::{
        tap::{AnalysisTap, TapWriter},
        AudioBackend,
    },
    error::EngineError,
    keymap::Pitch,
    synth::{
        message::{VoiceId, VoiceMessage},
        mixer::{VoiceCounters, VoiceMixer},
    },
    MAX_BLOCK_SIZE,
};

/// Deterministic engine: the audio timeline only advances when
/// [`render`](Self::render) is called. Messages apply immediately.
pub struct OfflineEngine {
    mixer: VoiceMixer,
    tap: TapWriter,
    render_buf: Vec<f32>,
    frames: u64,
    sample_rate: f32,
}

impl OfflineEngine {
    pub fn new(config: &InstrumentConfig, sample_rate: f32) -> (Self, AnalysisTap) {
        let (tap, reader) = AnalysisTap::new(config.tap_len);
        let engine = Self {
            mixer: VoiceMixer::new(sample_rate, config.max_voices, &config.envelope),
            tap,
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
            frames: 0,
            sample_rate,
        };
        (engine, reader)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Advance the timeline by `frames`, feeding the analysis tap.
    pub fn render(&mut self, frames: usize) {
        let mut remaining = frames;
        while remaining > 0 {
            let n = remaining.min(MAX_BLOCK_SIZE);
            let block = &mut self.render_buf[..n];
            self.mixer.render_block(block);
            self.tap.push_block(block);
            self.frames += n as u64;
            remaining -= n;
        }
    }

    /// Advance by at least `seconds`, rounded up to whole frames.
    pub fn render_seconds(&mut self, seconds: f64) {
        let frames = (seconds * self.sample_rate as f64).ceil().max(0.0) as usize;
        self.render(frames);
    }

    pub fn voice_gain(&self, id: VoiceId) -> Option<f32> {
        self.mixer.voice_gain(id)
    }

    pub fn voice_stage(&self, id: VoiceId) -> Option<EnvelopeStage> {
        self.mixer.voice_stage(id)
    }

    pub fn voice_pitch(&self, id: VoiceId) -> Option<Pitch> {
        self.mixer.voice_pitch(id)
    }

    pub fn active_voices(&self) -> usize {
        self.mixer.active_voices()
    }

    pub fn counters(&self) -> Arc<VoiceCounters> {
        self.mixer.counters()
    }
}

impl AudioBackend for OfflineEngine {
    fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn send(&mut self, msg: VoiceMessage) -> Result<(), EngineError> {
        self.mixer.handle(msg);
        Ok(())
    }
}
