//! Generative background.
//!
//! Each frame washes the surface with a faint black rectangle, so earlier
//! frames linger as trails, then lays a faint gradient triangle on top. All
//! motion is a pure function of the clock `t` (milliseconds):
//!
//! ```text
//!   top vertex A     x = w/2 + w/2 · sin(0.01 t)    y = 0
//!   bottom vertex    x = w/2 + w/2 · cos(0.02 t)    y = h
//!   top vertex B     x = w/2 + w/2 · sin(0.03 t)    y = 0
//!
//!   gradient (0,0) → (w,h), stops at 0, ½, 1 with hues t, t+120, t+240
//! ```
//!
//! Because nothing is accumulated, a resize only changes `w` and `h`; the
//! phase continues from wherever the clock is.

use crate::{
    config::VisualConfig,
    render::{
        color::Rgba,
        surface::{LinearGradient, Point, Rect, Surface},
    },
};

pub struct Backdrop {
    trail_alpha: f32,
    pattern_alpha: f32,
}

impl Backdrop {
    pub fn new(visuals: &VisualConfig) -> Self {
        Self {
            trail_alpha: visuals.trail_alpha,
            pattern_alpha: visuals.pattern_alpha,
        }
    }

    pub fn paint<S: Surface>(&self, surface: &mut S, t: f64) {
        let (w, h) = surface.size();
        surface.fill_rect(Rect::from_size(w, h), Rgba::BLACK.with_alpha(self.trail_alpha));
        surface.fill_triangle(triangle(t, w, h), &gradient(t, w, h), self.pattern_alpha);
    }
}

pub fn triangle(t: f64, w: f32, h: f32) -> [Point; 3] {
    let half = w as f64 / 2.0;
    let x = |f: f64| (f * half + half) as f32;
    [
        Point::new(x((t * 0.01).sin()), 0.0),
        Point::new(x((t * 0.02).cos()), h),
        Point::new(x((t * 0.03).sin()), 0.0),
    ]
}

pub fn gradient(t: f64, w: f32, h: f32) -> LinearGradient {
    let hue = |offset: f64| ((t + offset) % 360.0) as f32;
    LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(w, h),
        stops: vec![
            (0.0, Rgba::vivid(hue(0.0))),
            (0.5, Rgba::vivid(hue(120.0))),
            (1.0, Rgba::vivid(hue(240.0))),
        ],
    }
}
