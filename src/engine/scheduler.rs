use crate::{keymap::NoteId, synth::message::VoiceId};

/// A voice teardown due once its release ramp has run out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teardown {
    /// Audio-timeline seconds.
    pub due: f64,
    pub voice: VoiceId,
    pub note: NoteId,
}

/// Pending teardowns, ordered by due time.
///
/// Each entry names the exact voice it tears down, so a key pressed again
/// during its own release gets a voice no earlier entry can touch.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<Teardown>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, teardown: Teardown) {
        // Equal due times keep insertion order
        let idx = self.pending.partition_point(|t| t.due <= teardown.due);
        self.pending.insert(idx, teardown);
    }

    /// Take the earliest teardown if it is due at `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<Teardown> {
        match self.pending.first() {
            Some(first) if first.due <= now => Some(self.pending.remove(0)),
            _ => None,
        }
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|t| t.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Teardown> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyMap;

    fn teardown(due: f64, id: u64) -> Teardown {
        Teardown {
            due,
            voice: VoiceId(id),
            note: KeyMap::default().note('a').unwrap(),
        }
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.enqueue(teardown(0.3, 3));
        s.enqueue(teardown(0.1, 1));
        s.enqueue(teardown(0.2, 2));

        assert_eq!(s.pop_due(0.05), None);
        assert_eq!(s.pop_due(0.25).map(|t| t.voice), Some(VoiceId(1)));
        assert_eq!(s.pop_due(0.25).map(|t| t.voice), Some(VoiceId(2)));
        assert_eq!(s.pop_due(0.25), None);
        assert_eq!(s.next_due(), Some(0.3));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut s = Scheduler::new();
        s.enqueue(teardown(0.1, 1));
        s.enqueue(teardown(0.1, 2));
        assert_eq!(s.pop_due(1.0).map(|t| t.voice), Some(VoiceId(1)));
        assert_eq!(s.pop_due(1.0).map(|t| t.voice), Some(VoiceId(2)));
    }
}
