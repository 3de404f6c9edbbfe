//! Key strip: every mapped key in pitch order, held keys highlighted.

use std::collections::BTreeSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use fluid_keys::{synth::NoteSignal, KeyMap, NoteId};

/// Which keys the presentation layer shows as pressed.
#[derive(Debug, Default)]
pub struct KeyboardState {
    pressed: BTreeSet<NoteId>,
}

impl KeyboardState {
    pub fn apply(&mut self, signal: NoteSignal) {
        match signal {
            NoteSignal::Active(note) => {
                self.pressed.insert(note);
            }
            NoteSignal::Inactive(note) => {
                self.pressed.remove(&note);
            }
        }
    }

    pub fn is_pressed(&self, note: NoteId) -> bool {
        self.pressed.contains(&note)
    }
}

pub struct KeyStrip<'a> {
    keymap: &'a KeyMap,
    state: &'a KeyboardState,
}

impl<'a> KeyStrip<'a> {
    pub fn new(keymap: &'a KeyMap, state: &'a KeyboardState) -> Self {
        Self { keymap, state }
    }
}

impl Widget for KeyStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut notes: Vec<(NoteId, f32)> = self
            .keymap
            .notes()
            .filter_map(|n| self.keymap.pitch(n).map(|p| (n, p.hz())))
            .collect();
        notes.sort_by(|a, b| a.1.total_cmp(&b.1));

        let idle = Style::default().fg(Color::Gray);
        let held = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let spans: Vec<Span> = notes
            .iter()
            .map(|&(note, _)| {
                let style = if self.state.is_pressed(note) { held } else { idle };
                Span::styled(format!(" {} ", note.symbol().to_ascii_uppercase()), style)
            })
            .collect();

        let block = Block::default()
            .title(" fluid-keys · Esc quit ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(Line::from(spans)).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_toggle_pressed() {
        let keymap = KeyMap::default();
        let a = keymap.note('a').unwrap();
        let mut state = KeyboardState::default();

        state.apply(NoteSignal::Active(a));
        assert!(state.is_pressed(a));
        state.apply(NoteSignal::Inactive(a));
        assert!(!state.is_pressed(a));
    }

    #[test]
    fn strip_lists_keys_in_pitch_order() {
        let keymap = KeyMap::default();
        let state = KeyboardState::default();
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);
        KeyStrip::new(&keymap, &state).render(area, &mut buf);

        let row: String = (1..area.width - 1).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.starts_with(" A  W  S  E  D "), "got {row:?}");
    }
}
