use std::time::Instant;

use crate::{
    config::VisualConfig,
    engine::tap::{is_silence, AnalysisTap},
    render::{backdrop::Backdrop, scope::Scope, surface::Surface},
};

/// Milliseconds since the clock was started. Drives all background motion.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
}

impl AnimationClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1_000.0
    }
}

/// What a host provides to keep the loop running.
pub trait FrameHost<S: Surface> {
    type Error;

    /// Yield until the display can take another frame, then return the
    /// clock value for it. `None` means the surface is gone and the loop
    /// should end.
    ///
    /// The host may call [`RenderLoop::resize`] here.
    fn next_frame(&mut self, render: &mut RenderLoop<S>) -> Result<Option<f64>, Self::Error>;

    /// Show the finished frame.
    fn present(&mut self, surface: &S) -> Result<(), Self::Error>;
}

/// Outcome of one painted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the waveform trace was drawn. `false` while the tap is
    /// missing or silent.
    pub trace_drawn: bool,
}

/// Per-frame compositor: trail wash, gradient triangle, waveform trace.
///
/// Only reads the analysis tap; never touches voice state.
pub struct RenderLoop<S: Surface> {
    surface: S,
    tap: Option<AnalysisTap>,
    backdrop: Backdrop,
    scope: Scope,
    pending_size: Option<(u32, u32)>,
    frames: u64,
}

impl<S: Surface> RenderLoop<S> {
    pub fn new(surface: S, visuals: &VisualConfig) -> Self {
        Self {
            surface,
            tap: None,
            backdrop: Backdrop::new(visuals),
            scope: Scope::new(visuals),
            pending_size: None,
            frames: 0,
        }
    }

    pub fn with_tap(mut self, tap: AnalysisTap) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn attach_tap(&mut self, tap: AnalysisTap) {
        self.tap = Some(tap);
    }

    /// Hand the tap back, e.g. at teardown.
    pub fn detach_tap(&mut self) -> Option<AnalysisTap> {
        self.tap.take()
    }

    /// New surface dimensions, applied before the next frame is painted.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pending_size = Some((width, height));
    }

    pub fn render_frame(&mut self, t: f64) -> FrameReport {
        if let Some((w, h)) = self.pending_size.take() {
            self.surface.resize(w, h);
        }

        self.backdrop.paint(&mut self.surface, t);

        let mut trace_drawn = false;
        if let Some(tap) = self.tap.as_mut() {
            let samples = tap.snapshot();
            if !is_silence(samples) {
                self.scope.paint(&mut self.surface, samples, t);
                trace_drawn = true;
            }
        }

        self.frames += 1;
        FrameReport { trace_drawn }
    }

    /// Paint frames until the host reports the surface is gone. Returns the
    /// number of frames painted during this run.
    pub fn run<H: FrameHost<S>>(&mut self, host: &mut H) -> Result<u64, H::Error> {
        let first = self.frames;
        while let Some(t) = host.next_frame(self)? {
            self.render_frame(t);
            host.present(&self.surface)?;
        }
        tracing::debug!(frames = self.frames - first, "render loop stopped");
        Ok(self.frames - first)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
