//! Key events in, click-free voices out.
//!
//! The manager runs on the control timeline. It never waits on audio: a
//! press sends `Start`, a release sends `Release` and books a teardown for
//! when the release ramp will have reached zero. [`VoiceManager::poll`]
//! fires due teardowns and must be called regularly by the host loop.

use tracing::{debug, warn};

use crate::{
    config::{EnvelopeConfig, InstrumentConfig},
    engine::{
        scheduler::{Scheduler, Teardown},
        AudioBackend,
    },
    keymap::{KeyMap, NoteId},
    synth::{
        message::{VoiceId, VoiceMessage},
        table::{LiveVoice, VoiceTable},
    },
};

/// Presentation-layer signal: style the key as pressed or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSignal {
    Active(NoteId),
    Inactive(NoteId),
}

pub struct VoiceManager<B: AudioBackend> {
    backend: B,
    keymap: KeyMap,
    envelope: EnvelopeConfig,
    table: VoiceTable,
    scheduler: Scheduler,
    signals: Vec<NoteSignal>,
    next_id: u64,
}

impl<B: AudioBackend> VoiceManager<B> {
    pub fn new(backend: B, config: &InstrumentConfig) -> Self {
        Self {
            backend,
            keymap: config.keymap.clone(),
            envelope: config.envelope,
            table: VoiceTable::new(),
            scheduler: Scheduler::new(),
            signals: Vec::new(),
            next_id: 0,
        }
    }

    /// Raw key-down. Symbols outside the keymap are ignored.
    pub fn key_down(&mut self, symbol: char) {
        if let Some(note) = self.keymap.note(symbol) {
            self.note_on(note);
        }
    }

    /// Raw key-up. Symbols outside the keymap are ignored.
    pub fn key_up(&mut self, symbol: char) {
        if let Some(note) = self.keymap.note(symbol) {
            self.note_off(note);
        }
    }

    /// Start a voice for `note` unless one is already held (key repeat).
    pub fn note_on(&mut self, note: NoteId) {
        if self.table.is_held(note) {
            return;
        }
        let Some(pitch) = self.keymap.pitch(note) else {
            return;
        };

        let id = VoiceId(self.next_id);
        self.next_id += 1;

        if let Err(err) = self.backend.send(VoiceMessage::Start { voice: id, pitch }) {
            warn!(%note, %id, "voice not started: {err}");
            return;
        }

        let now = self.backend.now();
        self.table.insert(LiveVoice {
            id,
            note,
            pitch,
            started_at: now,
            released_at: None,
        });
        self.signals.push(NoteSignal::Active(note));
        debug!(%note, %id, hz = pitch.hz(), "note on");
    }

    /// Fade out the held voice for `note`. The key shows as released at
    /// once; the voice itself is torn down after the release ramp.
    pub fn note_off(&mut self, note: NoteId) {
        if !self.table.is_held(note) {
            return;
        }

        let now = self.backend.now();
        let Some(voice) = self.table.release(note, now) else {
            return;
        };

        // A lost release still gets faded by the teardown's Stop
        if let Err(err) = self.backend.send(VoiceMessage::Release { voice: voice.id }) {
            warn!(%note, id = %voice.id, "release not delivered: {err}");
        }

        self.scheduler.enqueue(Teardown {
            due: now + self.envelope.release as f64,
            voice: voice.id,
            note,
        });
        self.signals.push(NoteSignal::Inactive(note));
        debug!(%note, id = %voice.id, "note off");
    }

    /// Fire every teardown that is due on the audio timeline.
    pub fn poll(&mut self) {
        let now = self.backend.now();
        while let Some(teardown) = self.scheduler.pop_due(now) {
            self.tear_down(teardown);
        }
    }

    /// Release every held note, as if all keys went up together.
    pub fn release_all(&mut self) {
        let held: Vec<NoteId> = self.table.held_notes().collect();
        for note in held {
            self.note_off(note);
        }
    }

    /// Stop everything and forget all pending teardowns.
    pub fn shutdown(&mut self) {
        self.release_all();
        let pending: Vec<Teardown> = self.scheduler.drain().collect();
        for teardown in pending {
            self.tear_down(teardown);
        }
        if let Err(err) = self.backend.send(VoiceMessage::StopAll) {
            warn!("stop-all not delivered: {err}");
        }
        self.table.clear();
    }

    pub fn is_held(&self, note: NoteId) -> bool {
        self.table.is_held(note)
    }

    pub fn is_sounding(&self, note: NoteId) -> bool {
        self.table.is_sounding(note)
    }

    pub fn held_notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.table.held_notes()
    }

    /// Held plus releasing voices.
    pub fn live_voices(&self) -> usize {
        self.table.len()
    }

    pub fn pending_teardowns(&self) -> usize {
        self.scheduler.len()
    }

    pub fn table(&self) -> &VoiceTable {
        &self.table
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, NoteSignal> {
        self.signals.drain(..)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn tear_down(&mut self, teardown: Teardown) {
        // The voice leaves the table even if the audio side never hears
        // about it; the mixer frees unknown silent slots on reuse.
        if let Err(err) = self.backend.send(VoiceMessage::Stop { voice: teardown.voice }) {
            warn!(note = %teardown.note, id = %teardown.voice, "teardown not delivered: {err}");
        }
        if self.table.remove(teardown.voice).is_some() {
            debug!(note = %teardown.note, id = %teardown.voice, "voice torn down");
        }
    }
}
