use crate::{
    config::EnvelopeConfig,
    dsp::envelope::{EnvelopeStage, GainEnvelope},
    graph::node::{GraphNode, RenderCtx},
};

/// A voice's gain stage: renders the envelope as a control signal that
/// [`crate::graph::amplify::Amplify`] multiplies into the oscillator.
pub struct GainNode {
    env: GainEnvelope,
}

impl GainNode {
    pub fn new(attack: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: GainEnvelope::new(attack, sustain, release),
        }
    }

    pub fn from_config(config: &EnvelopeConfig) -> Self {
        Self::new(config.attack, config.sustain, config.release)
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.env.stage()
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }
}
