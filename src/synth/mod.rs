// Purpose: Voice lifecycle on both sides of the audio thread.
//
// Control side: `VoiceManager` + `VoiceTable` decide which notes sound.
// Audio side: `VoiceMixer` + `Voice` own the oscillator and gain stages.
// The two only talk through `VoiceMessage`s.

pub mod manager;
pub mod message;
pub mod mixer;
pub mod table;
pub mod voice;

pub use manager::{NoteSignal, VoiceManager};
pub use message::{VoiceId, VoiceMessage};
pub use mixer::VoiceMixer;
pub use table::{LiveVoice, VoiceTable};
