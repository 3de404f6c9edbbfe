//! Event loop: keys drive the voice manager, frames drive the render loop.

use std::{
    io::stdout,
    time::{Duration, Instant},
};

use color_eyre::eyre::{Report, Result as EyreResult};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;
use tracing::{info, warn};

use fluid_keys::{
    engine::{AnalysisTap, AudioEngine},
    render::{AnimationClock, FrameHost, PixelCanvas, RenderLoop},
    synth::VoiceManager,
    InstrumentConfig,
};

use super::{
    input::KeyTracker,
    ui::{self, KeyboardState},
};

pub fn run(
    terminal: DefaultTerminal,
    engine: AudioEngine,
    tap: AnalysisTap,
    config: &InstrumentConfig,
    hold: Duration,
) -> EyreResult<()> {
    // Real key-release events need the kitty protocol
    let enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!(enhanced, hold_ms = hold.as_millis() as u64, "keyboard input ready");

    let (width, height) = ui::canvas_size(terminal.size()?);
    let mut render = RenderLoop::new(PixelCanvas::new(width, height), &config.visuals).with_tap(tap);

    let mut app = App::new(terminal, engine, config, (!enhanced).then(|| KeyTracker::new(hold)));
    let result = render.run(&mut app);

    app.voices.shutdown();
    if enhanced {
        if let Err(err) = execute!(stdout(), PopKeyboardEnhancementFlags) {
            warn!("failed to restore keyboard mode: {err}");
        }
    }

    let frames = result?;
    let counters = app.voices.backend().counters();
    info!(
        frames,
        stolen = counters.stolen(),
        dropped = counters.dropped(),
        "session ended"
    );
    Ok(())
}

struct App {
    terminal: DefaultTerminal,
    voices: VoiceManager<AudioEngine>,
    keys: KeyboardState,
    /// Set when the terminal cannot report key releases.
    tracker: Option<KeyTracker>,
    clock: AnimationClock,
    frame_interval: Duration,
    deadline: Instant,
    quit: bool,
}

impl App {
    fn new(
        terminal: DefaultTerminal,
        engine: AudioEngine,
        config: &InstrumentConfig,
        tracker: Option<KeyTracker>,
    ) -> Self {
        let frame_interval = Duration::from_secs_f32(1.0 / config.visuals.frame_rate);
        Self {
            terminal,
            voices: VoiceManager::new(engine, config),
            keys: KeyboardState::default(),
            tracker,
            clock: AnimationClock::start(),
            frame_interval,
            deadline: Instant::now(),
            quit: false,
        }
    }

    fn handle_event(&mut self, event: Event, render: &mut RenderLoop<PixelCanvas>) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(cols, rows) => {
                let (w, h) = ui::canvas_size(ratatui::layout::Size::new(cols, rows));
                render.resize(w, h);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            self.quit = true;
            return;
        }
        let KeyCode::Char(symbol) = key.code else {
            return;
        };
        let symbol = symbol.to_ascii_lowercase();

        match (&mut self.tracker, key.kind) {
            (None, KeyEventKind::Press) => self.voices.key_down(symbol),
            (None, KeyEventKind::Release) => self.voices.key_up(symbol),
            (Some(tracker), KeyEventKind::Press | KeyEventKind::Repeat) => {
                if tracker.press(symbol, Instant::now()) {
                    self.voices.key_down(symbol);
                }
            }
            _ => {}
        }
    }

    fn expire_keys(&mut self, now: Instant) {
        if let Some(tracker) = self.tracker.as_mut() {
            for symbol in tracker.expire(now) {
                self.voices.key_up(symbol);
            }
        }
    }
}

impl FrameHost<PixelCanvas> for App {
    type Error = Report;

    fn next_frame(&mut self, render: &mut RenderLoop<PixelCanvas>) -> EyreResult<Option<f64>> {
        loop {
            self.voices.poll();
            let now = Instant::now();
            self.expire_keys(now);
            if self.quit {
                return Ok(None);
            }
            if now >= self.deadline {
                break;
            }

            let wake = match self.tracker.as_ref().and_then(KeyTracker::next_expiry) {
                Some(expiry) => expiry.min(self.deadline),
                None => self.deadline,
            };
            if event::poll(wake.saturating_duration_since(now))? {
                let event = event::read()?;
                self.handle_event(event, render);
            }
        }

        // Skip missed frames instead of bursting to catch up
        self.deadline = (self.deadline + self.frame_interval).max(Instant::now());
        for signal in self.voices.drain_signals() {
            self.keys.apply(signal);
        }
        Ok(Some(self.clock.now_ms()))
    }

    fn present(&mut self, canvas: &PixelCanvas) -> EyreResult<()> {
        let keymap = self.voices.keymap();
        let keys = &self.keys;
        self.terminal.draw(|frame| ui::draw(frame, canvas, keymap, keys))?;
        Ok(())
    }
}
