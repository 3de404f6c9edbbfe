//! 2D drawing surfaces.
//!
//! The render loop only needs four primitives, all composited source-over:
//! a translucent rectangle, a gradient-filled triangle, and a stroked
//! polyline, plus resizing. [`PixelCanvas`] rasterises them in software.

use crate::render::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// Colour varies along `start -> end`; constant across it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    /// `(offset, colour)`, offsets ascending in 0..=1.
    pub stops: Vec<(f32, Rgba)>,
}

impl LinearGradient {
    pub fn color_at(&self, p: Point) -> Rgba {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len2 = dx * dx + dy * dy;
        let t = if len2 > 0.0 {
            (((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let Some(&(first_off, first)) = self.stops.first() else {
            return Rgba::BLACK.with_alpha(0.0);
        };
        if t <= first_off {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                return if span > 0.0 { c0.lerp(c1, (t - o0) / span) } else { c1 };
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

pub trait Surface {
    /// Width and height in drawing units.
    fn size(&self) -> (f32, f32);

    /// Change dimensions. Contents may be discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Fill a triangle with `paint`, scaled by a global `alpha`.
    fn fill_triangle(&mut self, vertices: [Point; 3], paint: &LinearGradient, alpha: f32);

    /// Connected line through `points`.
    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, width: f32);
}

/// Software RGB canvas, initially opaque black. One unit = one pixel.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[self.index(x, y)];
        Some(Rgba::rgb(r, g, b))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, alpha: f32) {
        let a = (color.a * alpha).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = self.index(x, y);
        let px = &mut self.pixels[idx];
        px[0] += (color.r - px[0]) * a;
        px[1] += (color.g - px[1]) * a;
        px[2] += (color.b - px[2]) * a;
    }

    /// Pixel index range whose centres fall inside `[lo, hi)`.
    fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<u32> {
        let start = (lo - 0.5).ceil().max(0.0) as u32;
        let end = ((hi - 0.5).ceil().max(0.0) as u32).min(limit);
        start.min(end)..end
    }

    fn stroke_segment(&mut self, a: Point, b: Point, color: Rgba, half_width: f32) {
        let xs = Self::span(a.x.min(b.x) - half_width, a.x.max(b.x) + half_width + 1.0, self.width);
        let ys = Self::span(a.y.min(b.y) - half_width, a.y.max(b.y) + half_width + 1.0, self.height);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;

        for y in ys {
            for x in xs.clone() {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let t = if len2 > 0.0 {
                    (((px - a.x) * dx + (py - a.y) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (cx, cy) = (a.x + t * dx - px, a.y + t * dy - py);
                if cx * cx + cy * cy <= half_width * half_width {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        // Like a canvas element: resizing clears to the initial state
        *self = Self::new(width, height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let xs = Self::span(rect.x, rect.x + rect.width, self.width);
        let ys = Self::span(rect.y, rect.y + rect.height, self.height);
        for y in ys {
            for x in xs.clone() {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn fill_triangle(&mut self, vertices: [Point; 3], paint: &LinearGradient, alpha: f32) {
        let [a, b, c] = vertices;
        let area = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        let edge = |p: Point, q: Point, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);
        let min_x = a.x.min(b.x).min(c.x);
        let max_x = a.x.max(b.x).max(c.x);
        let min_y = a.y.min(b.y).min(c.y);
        let max_y = a.y.max(b.y).max(c.y);

        for y in Self::span(min_y, max_y, self.height) {
            for x in Self::span(min_x, max_x, self.width) {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, px, py) * area;
                let w1 = edge(c, a, px, py) * area;
                let w2 = edge(a, b, px, py) * area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let color = paint.color_at(Point::new(px, py));
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, width: f32) {
        let half_width = (width / 2.0).max(0.5);
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], color, half_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> LinearGradient {
        LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 0.0),
            stops: vec![(0.0, Rgba::rgb(1.0, 0.0, 0.0)), (1.0, Rgba::rgb(0.0, 0.0, 1.0))],
        }
    }

    #[test]
    fn gradient_interpolates_along_axis() {
        let g = gradient();
        assert_eq!(g.color_at(Point::new(-5.0, 3.0)), Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(g.color_at(Point::new(15.0, 3.0)), Rgba::rgb(0.0, 0.0, 1.0));
        let mid = g.color_at(Point::new(5.0, 100.0));
        assert!((mid.r - 0.5).abs() < 1e-6 && (mid.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn translucent_rect_accumulates() {
        let mut canvas = PixelCanvas::new(4, 4);
        let white = Rgba::rgb(1.0, 1.0, 1.0).with_alpha(0.5);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), white);
        assert!((canvas.pixel(1, 1).unwrap().r - 0.5).abs() < 1e-6);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), white);
        assert!((canvas.pixel(1, 1).unwrap().r - 0.75).abs() < 1e-6);
    }

    #[test]
    fn triangle_covers_inside_only_either_winding() {
        for vertices in [
            [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)],
            [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 0.0)],
        ] {
            let mut canvas = PixelCanvas::new(10, 10);
            canvas.fill_triangle(vertices, &gradient(), 1.0);
            assert!(canvas.pixel(1, 1).unwrap().r > 0.5, "inside is painted");
            assert_eq!(canvas.pixel(9, 9), Some(Rgba::BLACK), "outside is untouched");
        }
    }

    #[test]
    fn degenerate_triangle_paints_nothing() {
        let mut canvas = PixelCanvas::new(10, 10);
        let flat = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0)];
        canvas.fill_triangle(flat, &gradient(), 1.0);
        assert!((0..10).all(|x| canvas.pixel(x, 0) == Some(Rgba::BLACK)));
    }

    #[test]
    fn polyline_hits_pixels_on_path() {
        let mut canvas = PixelCanvas::new(20, 10);
        let green = Rgba::rgb(0.0, 1.0, 0.0);
        canvas.stroke_polyline(&[Point::new(0.0, 5.0), Point::new(20.0, 5.0)], green, 2.0);
        assert_eq!(canvas.pixel(10, 4), Some(green));
        assert_eq!(canvas.pixel(10, 5), Some(green));
        assert_eq!(canvas.pixel(10, 0), Some(Rgba::BLACK));
    }

    #[test]
    fn resize_clears_and_clips() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill_rect(Rect::from_size(4.0, 4.0), Rgba::rgb(1.0, 1.0, 1.0));
        canvas.resize(8, 2);
        assert_eq!(canvas.size(), (8.0, 2.0));
        assert_eq!(canvas.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(canvas.pixel(0, 2), None);

        // Drawing past the edge is clipped, not a panic
        canvas.fill_rect(Rect { x: -5.0, y: -5.0, width: 100.0, height: 100.0 }, Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(canvas.pixel(7, 1), Some(Rgba::rgb(1.0, 0.0, 0.0)));
    }
}
