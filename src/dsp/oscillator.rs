use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/// Sine oscillator driven by a normalised phase accumulator.
pub struct OscillatorBlock {
    /// Position in the current cycle, 0.0..1.0.
    phase: f32,
}

impl OscillatorBlock {
    pub fn sine() -> Self {
        Self { phase: 0.0 }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let step = ctx.frequency / ctx.sample_rate;
        for sample in out.iter_mut() {
            *sample = (TAU * self.phase).sin();
            self.phase += step;
            // Keep the accumulator small so f32 precision holds for long notes
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }
}
