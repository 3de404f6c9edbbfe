//! Visual side of the instrument.
//!
//! [`RenderLoop`] runs once per display frame: it fades the previous frame
//! into a trail, lays the clock-driven gradient triangle over it, then traces
//! the latest [`AnalysisTap`](crate::engine::AnalysisTap) snapshot. Drawing
//! goes through the [`Surface`] trait; [`PixelCanvas`] is the software
//! implementation used by the terminal front end and the tests.

pub mod backdrop;
pub mod color;
mod frame_loop;
pub mod scope;
pub mod surface;

pub use color::Rgba;
pub use frame_loop::{AnimationClock, FrameHost, FrameReport, RenderLoop};
pub use surface::{LinearGradient, PixelCanvas, Point, Rect, Surface};
