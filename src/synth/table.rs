use std::collections::BTreeMap;

use crate::{keymap::NoteId, keymap::Pitch, synth::message::VoiceId};

/// Control-side record of one sounding press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveVoice {
    pub id: VoiceId,
    pub note: NoteId,
    pub pitch: Pitch,
    /// Audio-timeline seconds.
    pub started_at: f64,
    /// Set once the key is up; the voice is fading out.
    pub released_at: Option<f64>,
}

impl LiveVoice {
    pub fn is_releasing(&self) -> bool {
        self.released_at.is_some()
    }
}

/// Which notes are sounding, and through which voice.
///
/// At most one *held* voice per note. Released voices move to a separate
/// list until their teardown fires, so pressing the key again mid-fade
/// starts a new voice instead of reviving or cutting the old one.
#[derive(Debug, Default)]
pub struct VoiceTable {
    held: BTreeMap<NoteId, LiveVoice>,
    releasing: Vec<LiveVoice>,
}

impl VoiceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self, note: NoteId) -> Option<&LiveVoice> {
        self.held.get(&note)
    }

    pub fn is_held(&self, note: NoteId) -> bool {
        self.held.contains_key(&note)
    }

    /// Held or still fading out.
    pub fn is_sounding(&self, note: NoteId) -> bool {
        self.is_held(note) || self.releasing.iter().any(|v| v.note == note)
    }

    pub fn insert(&mut self, voice: LiveVoice) {
        debug_assert!(!self.held.contains_key(&voice.note));
        self.held.insert(voice.note, voice);
    }

    /// Move the held voice for `note` to the releasing list.
    pub fn release(&mut self, note: NoteId, at: f64) -> Option<LiveVoice> {
        let mut voice = self.held.remove(&note)?;
        voice.released_at = Some(at);
        self.releasing.push(voice);
        Some(voice)
    }

    /// Drop a voice entirely, wherever it is.
    pub fn remove(&mut self, id: VoiceId) -> Option<LiveVoice> {
        if let Some(idx) = self.releasing.iter().position(|v| v.id == id) {
            return Some(self.releasing.swap_remove(idx));
        }
        let note = self.held.values().find(|v| v.id == id)?.note;
        self.held.remove(&note)
    }

    pub fn held_notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.held.keys().copied()
    }

    pub fn voices(&self) -> impl Iterator<Item = &LiveVoice> {
        self.held.values().chain(self.releasing.iter())
    }

    /// Every live voice, held or releasing.
    pub fn len(&self) -> usize {
        self.held.len() + self.releasing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.releasing.clear();
    }
}
