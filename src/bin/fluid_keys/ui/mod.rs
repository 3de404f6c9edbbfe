//! TUI module for fluid-keys
//!
//! The scope canvas fills the screen above a one-line key strip.

mod canvas;
mod keyboard;

use ratatui::{
    layout::{Constraint, Direction, Layout, Size},
    Frame,
};

use fluid_keys::{render::PixelCanvas, KeyMap};

pub use canvas::CanvasView;
pub use keyboard::{KeyStrip, KeyboardState};

/// Rows taken by the key strip, border included.
pub const STRIP_HEIGHT: u16 = 3;

/// Canvas pixels for a terminal of `size` cells. Each cell shows two
/// vertically stacked pixels.
pub fn canvas_size(size: Size) -> (u32, u32) {
    let rows = size.height.saturating_sub(STRIP_HEIGHT);
    (size.width as u32, rows as u32 * 2)
}

pub fn draw(frame: &mut Frame, canvas: &PixelCanvas, keymap: &KeyMap, keys: &KeyboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(STRIP_HEIGHT)])
        .split(frame.area());

    frame.render_widget(CanvasView::new(canvas), chunks[0]);
    frame.render_widget(KeyStrip::new(keymap, keys), chunks[1]);
}
