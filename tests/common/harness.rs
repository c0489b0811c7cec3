// StudioHarness - virtual terminal environment for scenario tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use aether::app::StudioApp;
use aether::config::Config;
use aether::model::language::Language;
use aether::services::oracle::Oracle;
use aether::view;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

/// Drives a [`StudioApp`] against a `TestBackend` terminal, capturing all
/// rendering without touching a real terminal.
pub struct StudioHarness {
    pub app: StudioApp,
    terminal: Terminal<TestBackend>,
}

impl StudioHarness {
    pub fn new(language: Language, oracle: Arc<dyn Oracle>) -> Self {
        let config = Config::default();
        let app = StudioApp::new(&config, oracle, language);
        let terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        Self { app, terminal }
    }

    /// One frame: draw, then settle — the caret-restore point.
    pub fn draw(&mut self) {
        let Self { app, terminal } = self;
        terminal.draw(|frame| view::render(frame, app)).expect("draw");
        app.settle();
    }

    pub fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.app.handle_key(KeyEvent::new(code, modifiers));
    }

    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.key(KeyCode::Enter, KeyModifiers::NONE);
            } else {
                self.key(KeyCode::Char(c), KeyModifiers::NONE);
            }
        }
    }

    /// The rendered screen as plain text, one row per line.
    pub fn screen_text(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                let idx = buffer.index_of(x, y);
                if let Some(cell) = buffer.content.get(idx) {
                    out.push_str(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Drain async replies until `done` holds, or panic after `timeout`.
    pub fn wait_until(&mut self, timeout: Duration, mut done: impl FnMut(&StudioApp) -> bool) {
        let deadline = Instant::now() + timeout;
        loop {
            self.app.drain_async();
            if done(&self.app) {
                return;
            }
            assert!(Instant::now() < deadline, "condition not reached in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}
