use crate::{
    config::EnvelopeConfig,
    dsp::EnvelopeStage,
    graph::{
        amplify::Amplify,
        extensions::NodeExt,
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    keymap::Pitch,
    synth::message::VoiceId,
};

/// Oscillator feeding its own gain stage.
pub type VoiceChain = Amplify<OscNode, GainNode>;

/// Audio-side slot holding one voice's signal chain.
///
/// Slots are allocated up front and recycled, so starting a note never
/// allocates on the audio thread.
pub struct Voice {
    id: Option<VoiceId>,
    pitch: Option<Pitch>,
    age: u64,
    /// Teardown arrived while the release ramp was still running.
    stop_pending: bool,
    sample_rate: f32,
    chain: VoiceChain,
}

impl Voice {
    pub fn new(envelope: &EnvelopeConfig, sample_rate: f32) -> Self {
        Self {
            id: None,
            pitch: None,
            age: 0,
            stop_pending: false,
            sample_rate,
            chain: OscNode::sine().amplify(GainNode::from_config(envelope)),
        }
    }

    pub fn start(&mut self, id: VoiceId, pitch: Pitch, age: u64) {
        self.id = Some(id);
        self.pitch = Some(pitch);
        self.age = age;
        self.stop_pending = false;

        let ctx = RenderCtx::from_pitch(self.sample_rate, pitch);
        self.chain.note_on(&ctx);
    }

    pub fn release(&mut self) {
        if let Some(pitch) = self.pitch {
            let ctx = RenderCtx::from_pitch(self.sample_rate, pitch);
            self.chain.note_off(&ctx);
        }
    }

    /// Free the slot now if the gain has reached zero, otherwise as soon as
    /// the release ramp does. A voice is never cut off mid-waveform.
    pub fn stop(&mut self) {
        if self.chain.is_active() {
            self.release();
            self.stop_pending = true;
        } else {
            self.free();
        }
    }

    /// Render and add into `out`. `scratch` must be at least `out.len()`.
    pub fn render_into(&mut self, out: &mut [f32], scratch: &mut [f32]) {
        let Some(pitch) = self.pitch else {
            return;
        };
        let ctx = RenderCtx::from_pitch(self.sample_rate, pitch);
        let block = &mut scratch[..out.len()];
        block.fill(0.0);
        self.chain.render_block(block, &ctx);

        for (o, v) in out.iter_mut().zip(block.iter()) {
            *o += v;
        }

        if self.stop_pending && !self.chain.is_active() {
            self.free();
        }
    }

    pub fn free(&mut self) {
        self.id = None;
        self.pitch = None;
        self.stop_pending = false;
    }

    pub fn is_free(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Option<VoiceId> {
        self.id
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn stage(&self) -> EnvelopeStage {
        if self.is_free() {
            EnvelopeStage::Dead
        } else {
            self.chain.modulator.stage()
        }
    }

    pub fn gain(&self) -> f32 {
        self.chain.get_envelope_level().unwrap_or(0.0)
    }

    pub fn pitch(&self) -> Option<Pitch> {
        self.pitch
    }
}
