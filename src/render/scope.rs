//! Waveform trace
//!
//! Sample `i` of `n` sits at `x = i · w / n`; amplitude `s` at
//! `y = (1 + s) · h / 2`, so silence runs along the vertical centre. The
//! trace closes with a segment to `(w, h/2)` and its hue turns once every
//! 18 seconds.

use crate::{
    config::VisualConfig,
    render::{
        color::Rgba,
        surface::{Point, Surface},
    },
};

pub struct Scope {
    line_width: f32,
    /// Reused between frames.
    points: Vec<Point>,
}

impl Scope {
    pub fn new(visuals: &VisualConfig) -> Self {
        Self {
            line_width: visuals.line_width,
            points: Vec::new(),
        }
    }

    pub fn paint<S: Surface>(&mut self, surface: &mut S, samples: &[f32], t: f64) {
        if samples.is_empty() {
            return;
        }
        let (w, h) = surface.size();
        trace_points(samples, w, h, &mut self.points);
        surface.stroke_polyline(&self.points, Rgba::vivid(hue(t)), self.line_width);
    }
}

pub fn hue(t: f64) -> f32 {
    ((t / 50.0) % 360.0) as f32
}

pub fn trace_points(samples: &[f32], w: f32, h: f32, out: &mut Vec<Point>) {
    out.clear();
    let slice_width = w / samples.len() as f32;
    out.extend(
        samples
            .iter()
            .enumerate()
            .map(|(i, &s)| Point::new(i as f32 * slice_width, (1.0 + s) * h / 2.0)),
    );
    out.push(Point::new(w, h / 2.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_samples_across_width() {
        let mut pts = Vec::new();
        trace_points(&[0.0, 1.0, -1.0, 0.5], 400.0, 300.0, &mut pts);

        assert_eq!(pts.len(), 5);
        assert_eq!(pts[0], Point::new(0.0, 150.0));
        assert_eq!(pts[1], Point::new(100.0, 300.0));
        assert_eq!(pts[2], Point::new(200.0, 0.0));
        assert_eq!(pts[3], Point::new(300.0, 225.0));
        assert_eq!(pts[4], Point::new(400.0, 150.0));
    }

    #[test]
    fn hue_rotates_slowly() {
        assert_eq!(hue(0.0), 0.0);
        assert_eq!(hue(5_000.0), 100.0);
        assert_eq!(hue(18_000.0), 0.0);
    }
}
