//! Analysis tap: a read-only view of the mixed output for visualisation.
//!
//! The audio thread pushes every mixed sample into an `rtrb` ring through
//! [`TapWriter`]; pushing never blocks and drops samples once the ring is
//! full. The UI side drains the ring into a rolling window of fixed length.

use std::collections::VecDeque;

use rtrb::{Consumer, Producer, RingBuffer};

/// Ring capacity, in snapshot lengths. Covers UI stalls of several frames.
pub const TAP_RING_BLOCKS: usize = 16;

/// Peak magnitude below which a snapshot counts as silence.
pub const SILENCE_THRESHOLD: f32 = 1e-4;

/// Audio-thread end of the tap.
pub struct TapWriter {
    tx: Producer<f32>,
}

impl TapWriter {
    /// Push a mixed block, clipped to the device range -1..=1.
    pub fn push_block(&mut self, block: &[f32]) {
        for &s in block {
            if self.tx.push(s.clamp(-1.0, 1.0)).is_err() {
                break; // drop remainder if full
            }
        }
    }
}

/// UI end of the tap.
pub struct AnalysisTap {
    rx: Consumer<f32>,
    window: VecDeque<f32>,
    len: usize,
}

impl AnalysisTap {
    /// Create a tap whose snapshots hold `len` samples.
    pub fn new(len: usize) -> (TapWriter, AnalysisTap) {
        let len = len.max(1);
        let (tx, rx) = RingBuffer::<f32>::new(len * TAP_RING_BLOCKS);
        let window = std::iter::repeat(0.0).take(len).collect();
        (TapWriter { tx }, AnalysisTap { rx, window, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pull whatever the audio thread produced since the last call and
    /// return the newest `len` samples, oldest first.
    pub fn snapshot(&mut self) -> &[f32] {
        // Anything older than one window would be overwritten anyway
        let backlog = self.rx.slots();
        if backlog > self.len {
            if let Ok(chunk) = self.rx.read_chunk(backlog - self.len) {
                chunk.commit_all();
            }
        }

        while let Ok(s) = self.rx.pop() {
            self.window.pop_front();
            self.window.push_back(s);
        }
        self.window.make_contiguous()
    }

    /// Whether the current window carries no signal. Reflects the last
    /// [`snapshot`](Self::snapshot).
    pub fn is_silent(&self) -> bool {
        self.window.iter().all(|s| s.abs() < SILENCE_THRESHOLD)
    }
}

/// Whether every sample is below [`SILENCE_THRESHOLD`]. True for an empty slice.
pub fn is_silence(samples: &[f32]) -> bool {
    samples.iter().all(|s| s.abs() < SILENCE_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_as_silence_of_fixed_length() {
        let (_writer, mut tap) = AnalysisTap::new(8);
        assert_eq!(tap.snapshot(), &[0.0; 8]);
        assert!(tap.is_silent());
    }

    #[test]
    fn keeps_newest_samples_in_order() {
        let (mut writer, mut tap) = AnalysisTap::new(4);
        writer.push_block(&[0.1, 0.2, 0.3]);
        assert_eq!(tap.snapshot(), &[0.0, 0.1, 0.2, 0.3]);

        writer.push_block(&[0.4, 0.5]);
        assert_eq!(tap.snapshot(), &[0.2, 0.3, 0.4, 0.5]);
        assert!(!tap.is_silent());
    }

    #[test]
    fn backlog_larger_than_window_keeps_tail() {
        let (mut writer, mut tap) = AnalysisTap::new(4);
        let block: Vec<f32> = (0..20).map(|i| i as f32 / 100.0).collect();
        writer.push_block(&block);
        assert_eq!(tap.snapshot(), &[0.16, 0.17, 0.18, 0.19]);
    }

    #[test]
    fn writer_drops_when_ring_is_full() {
        let (mut writer, mut tap) = AnalysisTap::new(2);
        let block = vec![0.5; 2 * TAP_RING_BLOCKS + 10];
        writer.push_block(&block);
        assert_eq!(tap.snapshot(), &[0.5, 0.5]);
    }
}
