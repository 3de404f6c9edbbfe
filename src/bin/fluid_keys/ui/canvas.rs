//! Half-block presentation of a [`PixelCanvas`].

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use fluid_keys::render::{PixelCanvas, Rgba};

const UPPER_HALF: &str = "▀";

pub struct CanvasView<'a> {
    canvas: &'a PixelCanvas,
}

impl<'a> CanvasView<'a> {
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self { canvas }
    }
}

fn to_color(px: Option<Rgba>) -> Color {
    let [r, g, b] = px.unwrap_or(Rgba::BLACK).to_rgb8();
    Color::Rgb(r, g, b)
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (col as u32, row as u32 * 2);
                let top = to_color(self.canvas.pixel(x, y));
                let bottom = to_color(self.canvas.pixel(x, y + 1));
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}
