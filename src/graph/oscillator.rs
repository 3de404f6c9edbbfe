use crate::dsp::oscillator::OscillatorBlock;
use crate::graph::node::{GraphNode, RenderCtx};

/// Pitched sine source. Tracks `ctx.frequency`, so one node serves any key.
pub struct OscNode {
    osc: OscillatorBlock,
}

impl OscNode {
    pub fn sine() -> Self {
        Self {
            osc: OscillatorBlock::sine(),
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Every press starts at a zero crossing
        self.osc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::from_freq(sample_rate, 261.63);
        let mut osc = OscNode::sine();
        osc.note_on(&ctx);

        let mut buffer = vec![0.0f32; 128];
        osc.render_block(&mut buffer, &ctx);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * ctx.frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn stays_in_unit_range_over_long_runs() {
        let ctx = RenderCtx::from_freq(44_100.0, 587.33);
        let mut osc = OscNode::sine();
        let mut buffer = vec![0.0f32; 1024];
        for _ in 0..200 {
            osc.render_block(&mut buffer, &ctx);
            assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }
}
