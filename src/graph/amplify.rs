use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiplies a signal by a control signal (oscillator × gain).
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator.get_envelope_level()
    }

    // The oscillator never stops on its own, so the gain stage decides.
    fn is_active(&self) -> bool {
        self.modulator.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, gain::GainNode, oscillator::OscNode};

    #[test]
    fn output_is_bounded_by_gain() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);
        let mut voice = OscNode::sine().amplify(GainNode::new(0.01, 0.5, 0.01));
        voice.note_on(&ctx);

        let mut out = vec![0.0f32; 1024];
        voice.render_block(&mut out, &ctx);
        assert!(out.iter().all(|s| s.abs() <= 0.5 + 1e-6));
        assert!(out.iter().any(|s| s.abs() > 0.4));
    }

    #[test]
    fn goes_inactive_once_released() {
        let ctx = RenderCtx::from_freq(48_000.0, 440.0);
        let mut voice = OscNode::sine().amplify(GainNode::new(0.01, 0.5, 0.01));
        voice.note_on(&ctx);
        let mut out = vec![0.0f32; 1024];
        voice.render_block(&mut out, &ctx);

        voice.note_off(&ctx);
        voice.render_block(&mut out, &ctx);
        assert!(!voice.is_active());
        assert_eq!(voice.get_envelope_level(), Some(0.0));
        assert!(out[600..].iter().all(|&s| s == 0.0));
    }
}
