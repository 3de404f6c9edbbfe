use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::{
    config::EnvelopeConfig,
    dsp::EnvelopeStage,
    keymap::Pitch,
    synth::{
        message::{MessageReceiver, VoiceId, VoiceMessage},
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Degradation counters, written by the audio thread and read by the host.
#[derive(Debug, Default)]
pub struct VoiceCounters {
    stolen: AtomicU64,
    dropped: AtomicU64,
}

impl VoiceCounters {
    /// Releasing voices cut short to make room for a new press.
    pub fn stolen(&self) -> u64 {
        self.stolen.load(Ordering::Relaxed)
    }

    /// Presses that found no slot at all and stayed silent.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Audio-side owner of every sounding voice.
///
/// Applies control messages at block boundaries and sums all voices into
/// one mono block, which is what the analysis tap sees.
pub struct VoiceMixer {
    voices: Vec<Voice>,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
    counters: Arc<VoiceCounters>,
}

impl VoiceMixer {
    pub fn new(sample_rate: f32, max_voices: usize, envelope: &EnvelopeConfig) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(envelope, sample_rate))
            .collect();

        Self {
            voices,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
            counters: Arc::default(),
        }
    }

    pub fn counters(&self) -> Arc<VoiceCounters> {
        Arc::clone(&self.counters)
    }

    pub fn drain(&mut self, rx: &mut impl MessageReceiver) {
        while let Some(msg) = rx.pop() {
            self.handle(msg);
        }
    }

    pub fn handle(&mut self, msg: VoiceMessage) {
        match msg {
            VoiceMessage::Start { voice, pitch } => self.start(voice, pitch),
            VoiceMessage::Release { voice } => {
                if let Some(v) = self.find_voice(voice) {
                    v.release();
                }
            }
            VoiceMessage::Stop { voice } => {
                // Unknown ids were stolen or never started
                if let Some(v) = self.find_voice(voice) {
                    v.stop();
                }
            }
            VoiceMessage::StopAll => {
                for v in self.voices.iter_mut().filter(|v| !v.is_free()) {
                    v.stop();
                }
            }
        }
    }

    /// Render one block of at most [`MAX_BLOCK_SIZE`] frames.
    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        out.fill(0.0);
        for voice in self.voices.iter_mut().filter(|v| !v.is_free()) {
            voice.render_into(out, &mut self.temp_buffer);
        }

        self.frame_counter += out.len() as u64;
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    pub fn voice_gain(&self, id: VoiceId) -> Option<f32> {
        self.voices.iter().find(|v| v.id() == Some(id)).map(Voice::gain)
    }

    pub fn voice_stage(&self, id: VoiceId) -> Option<EnvelopeStage> {
        self.voices.iter().find(|v| v.id() == Some(id)).map(Voice::stage)
    }

    pub fn voice_pitch(&self, id: VoiceId) -> Option<Pitch> {
        self.voices.iter().find(|v| v.id() == Some(id)).and_then(Voice::pitch)
    }

    fn start(&mut self, id: VoiceId, pitch: Pitch) {
        let age = self.frame_counter;
        match self.allocate_voice() {
            Some(voice) => voice.start(id, pitch, age),
            None => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn allocate_voice(&mut self) -> Option<&mut Voice> {
        // First pass: a free slot, or one whose release already finished
        let free_idx = self
            .voices
            .iter()
            .position(|v| v.is_free())
            .or_else(|| self.voices.iter().position(|v| v.stage() == EnvelopeStage::Dead));
        if let Some(idx) = free_idx {
            return Some(&mut self.voices[idx]);
        }

        // Second pass: steal oldest releasing voice
        let steal_idx = self
            .voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.stage() == EnvelopeStage::Releasing)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)?;

        self.counters.stolen.fetch_add(1, Ordering::Relaxed);
        Some(&mut self.voices[steal_idx])
    }

    fn find_voice(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.id() == Some(id))
    }
}
