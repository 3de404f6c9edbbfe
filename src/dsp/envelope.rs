use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Gain Envelope
=============

Every voice fades in and out through a linear gain ramp. Starting or stopping
a sine at full amplitude puts a step into the waveform, which is heard as a
click; a ramp of a few milliseconds removes it without softening the note.

  Level
    S   ┐   ________________
        │  ╱                ╲
        │ ╱                  ╲
    0.0 └╱────────────────────╲──→ Time
       Attack    Sustain    Release

  attack    seconds to ramp 0 → sustain
  sustain   gain held while the key is down (0.5 by default)
  release   seconds to ramp from the current level → 0

There is no decay stage: the attack lands directly on the sustain level.

Release always starts from wherever the level is, so a key let go half way
through the attack ramps down from that point instead of jumping. The release
is counted in whole samples and ends at exactly 0.0, after which the envelope
is Dead and its voice can be torn down.

    increment = sustain / (attack_time * sample_rate)
    level     = release_start * (1 - elapsed / total)
*/

/// Lifecycle of a voice's gain stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attacking,
    Sustaining,
    Releasing,
    /// Silent, never triggered or fully released.
    Dead,
}

pub struct GainEnvelope {
    attack_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeStage,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl GainEnvelope {
    pub fn new(attack: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeStage::Dead,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Gate high: ramp up from zero.
    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Attacking;
        self.release_elapsed_samples = 0;
    }

    /// Gate low: ramp down from the current level.
    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if matches!(self.stage, EnvelopeStage::Dead | EnvelopeStage::Releasing) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Releasing;
    }

    /// Advance by one sample.
    pub fn next_sample(&mut self, ctx: &RenderCtx) {
        match self.stage {
            EnvelopeStage::Dead => {
                self.level = 0.0;
            }

            EnvelopeStage::Attacking => {
                let increment = self.sustain_level / (self.attack_time * ctx.sample_rate);
                self.level += increment;

                if self.level >= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeStage::Sustaining;
                }
            }

            EnvelopeStage::Sustaining => {
                self.level = self.sustain_level;
            }

            EnvelopeStage::Releasing => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Dead;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            self.next_sample(ctx);
            *sample = self.level;
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeStage::Dead)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
