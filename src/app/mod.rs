//! The studio application: one buffer, one output record, one derived
//! preview, and the wiring between user actions and the oracle workers.
//!
//! All state mutation happens here, synchronously, in response to key
//! events or drained async messages. Programmatic content replacements
//! (tab insertion, fix apply) schedule their caret through `pending_caret`,
//! which `settle()` applies after the next draw — the two-phase commit the
//! host UI requires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::highlight::Highlighter;
use crate::model::buffer::SourceBuffer;
use crate::model::language::Language;
use crate::model::output::OutputRecord;
use crate::model::preview;
use crate::services::bridge::{AsyncMessage, OracleBridge};
use crate::services::oracle::Oracle;
use crate::view::scroll::OverlaySync;
use crate::view::theme::Theme;

/// How long a status-bar acknowledgement (e.g. "Copied") stays visible.
const FLASH_DURATION: Duration = Duration::from_secs(2);

pub struct StudioApp {
    pub buffer: SourceBuffer,
    pub output: OutputRecord,
    /// Derived preview document; `Some` only for HTML/CSS.
    pub preview: Option<String>,
    /// `None` when the language has no grammar (SQL): plain text.
    pub highlighter: Option<Highlighter>,
    pub theme: Theme,
    pub viewport: OverlaySync,
    /// `Some(index)` while the language picker popup is open.
    pub language_picker: Option<usize>,
    pub should_quit: bool,

    bridge: OracleBridge,
    oracle: Arc<dyn Oracle>,
    /// Busy flag for the run action class.
    run_in_flight: bool,
    /// Shared busy flag for the explain/fix action class.
    analysis_in_flight: bool,
    /// Caret to restore at the next settle point.
    pending_caret: Option<usize>,
    status_flash: Option<(String, Instant)>,
}

impl StudioApp {
    pub fn new(config: &Config, oracle: Arc<dyn Oracle>, language: Language) -> Self {
        let buffer = SourceBuffer::new(language);
        let preview = preview::compose(language, buffer.text());
        Self {
            buffer,
            output: OutputRecord::new(),
            preview,
            highlighter: highlighter_for(language),
            theme: Theme::by_name(&config.theme),
            viewport: OverlaySync::new(),
            language_picker: None,
            should_quit: false,
            bridge: OracleBridge::new(),
            oracle,
            run_in_flight: false,
            analysis_in_flight: false,
            pending_caret: None,
            status_flash: None,
        }
    }

    pub fn run_in_flight(&self) -> bool {
        self.run_in_flight
    }

    pub fn analysis_in_flight(&self) -> bool {
        self.analysis_in_flight
    }

    pub fn pending_caret(&self) -> Option<usize> {
        self.pending_caret
    }

    /// Status-bar label for the busy state.
    pub fn busy_label(&self) -> &'static str {
        if self.run_in_flight {
            "RUNNING"
        } else if self.analysis_in_flight {
            "ANALYZING"
        } else {
            "READY"
        }
    }

    /// The active acknowledgement message, if it has not expired.
    pub fn status_flash(&self) -> Option<&str> {
        self.status_flash
            .as_ref()
            .filter(|(_, since)| since.elapsed() < FLASH_DURATION)
            .map(|(message, _)| message.as_str())
    }

    /// Switch languages: template replaces the buffer wholesale and the
    /// output record clears, even when re-selecting the current language.
    pub fn set_language(&mut self, language: Language) {
        self.buffer.set_language(language);
        self.output.clear();
        self.highlighter = highlighter_for(language);
        self.refresh_derived();
        self.pending_caret = Some(0);
    }

    /// Ask the oracle to conceptually execute the buffer. No-op in preview
    /// mode and while a run is already outstanding.
    pub fn trigger_run(&mut self) {
        if self.buffer.language().is_preview() || self.run_in_flight {
            return;
        }
        self.run_in_flight = true;
        self.output.replace("Running...", false);
        self.bridge.spawn_run(
            self.oracle.clone(),
            self.buffer.text().to_string(),
            self.buffer.language(),
        );
    }

    pub fn trigger_explain(&mut self) {
        if self.analysis_in_flight {
            return;
        }
        self.analysis_in_flight = true;
        if !self.buffer.language().is_preview() {
            self.output.replace("Analyzing...", false);
        }
        self.bridge
            .spawn_explain(self.oracle.clone(), self.buffer.text().to_string());
    }

    pub fn trigger_fix(&mut self) {
        if self.analysis_in_flight {
            return;
        }
        self.analysis_in_flight = true;
        let context = if self.output.is_empty() {
            "General check".to_string()
        } else {
            self.output.text().to_string()
        };
        self.bridge
            .spawn_fix(self.oracle.clone(), self.buffer.text().to_string(), context);
    }

    /// Drain completed oracle replies. Replies are applied as they arrive,
    /// with no fencing against edits made while the request was in flight:
    /// last writer wins on the output record and, for fix, on the buffer.
    pub fn drain_async(&mut self) {
        while let Some(message) = self.bridge.try_recv() {
            self.apply_async(message);
        }
    }

    fn apply_async(&mut self, message: AsyncMessage) {
        match message {
            AsyncMessage::RunCompleted(reply) => {
                self.run_in_flight = false;
                self.output.replace(reply.text, reply.is_error);
            }
            AsyncMessage::ExplainCompleted(reply) => {
                self.analysis_in_flight = false;
                self.output.replace(reply.text, reply.is_error);
            }
            AsyncMessage::FixCompleted(reply) => {
                self.analysis_in_flight = false;
                if reply.is_error {
                    self.output.replace(reply.text, true);
                } else if !reply.text.is_empty() && reply.text != self.buffer.text() {
                    self.edit_buffer(&reply.text);
                    self.pending_caret = Some(self.buffer.caret());
                    if !self.buffer.language().is_preview() {
                        self.output.replace("Optimized code applied.", false);
                    }
                }
            }
        }
    }

    /// Replace the buffer wholesale and recompute everything derived from
    /// it. No validation: invalid source for any language is accepted.
    pub fn edit_buffer(&mut self, new_text: &str) {
        self.buffer.edit(new_text);
        self.refresh_derived();
    }

    /// The UI settle point, called after each draw: apply the scheduled
    /// caret now that the frame shows the new content.
    pub fn settle(&mut self) {
        if let Some(caret) = self.pending_caret.take() {
            self.buffer.set_caret(caret);
        }
    }

    pub fn copy_buffer(&mut self) {
        let result = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(self.buffer.text().to_string()));
        match result {
            Ok(()) => self.flash("Copied"),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {e}");
                self.flash("Copy failed");
            }
        }
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Write the preview document to a temp file for an external browser.
    pub fn export_preview(&mut self) {
        let Some(document) = &self.preview else {
            return;
        };
        match preview::export_to_temp(document) {
            Ok(path) => self.flash(format!("Preview written to {}", path.display())),
            Err(e) => {
                tracing::warn!("Preview export failed: {e}");
                self.flash("Export failed");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(selected) = self.language_picker {
            self.handle_picker_key(key, selected);
            return;
        }

        match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.should_quit = true,

            KeyEvent {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.trigger_run(),

            KeyEvent {
                code: KeyCode::Char('e'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.trigger_explain(),

            KeyEvent {
                code: KeyCode::Char('f'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.trigger_fix(),

            KeyEvent {
                code: KeyCode::Char('l'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.open_language_picker(),

            KeyEvent {
                code: KeyCode::Char('y'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.copy_buffer(),

            KeyEvent {
                code: KeyCode::Char('k'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.clear_output(),

            KeyEvent {
                code: KeyCode::Char('o'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.export_preview(),

            KeyEvent {
                code: KeyCode::Tab, ..
            } => self.insert_tab(),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                self.buffer.insert_char(c);
                self.refresh_derived();
            }

            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                self.buffer.insert_newline();
                self.refresh_derived();
            }

            KeyEvent {
                code: KeyCode::Backspace,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                self.buffer.backspace();
                self.refresh_derived();
            }

            KeyEvent {
                code: KeyCode::Delete,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                self.buffer.delete_forward();
                self.refresh_derived();
            }

            KeyEvent {
                code: KeyCode::Left,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_left(),

            KeyEvent {
                code: KeyCode::Right,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_right(),

            KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_up(),

            KeyEvent {
                code: KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_down(),

            KeyEvent {
                code: KeyCode::Home,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_line_start(),

            KeyEvent {
                code: KeyCode::End,
                modifiers: KeyModifiers::NONE,
                ..
            } => self.buffer.move_line_end(),

            _ => {}
        }
    }

    /// Tab replaces the selection with the fixed indent; the returned caret
    /// is applied at the next settle point, not now.
    fn insert_tab(&mut self) {
        let (start, end) = self.buffer.selection();
        let restored = self.buffer.insert_tab_at(start, end);
        self.pending_caret = Some(restored);
        self.refresh_derived();
    }

    fn open_language_picker(&mut self) {
        let current = Language::ALL
            .iter()
            .position(|lang| *lang == self.buffer.language())
            .unwrap_or(0);
        self.language_picker = Some(current);
    }

    fn handle_picker_key(&mut self, key: KeyEvent, selected: usize) {
        match key.code {
            KeyCode::Esc => self.language_picker = None,
            KeyCode::Up => self.language_picker = Some(selected.saturating_sub(1)),
            KeyCode::Down => {
                self.language_picker = Some((selected + 1).min(Language::ALL.len() - 1));
            }
            KeyCode::Enter => {
                self.language_picker = None;
                self.set_language(Language::ALL[selected]);
            }
            _ => {}
        }
    }

    /// Recompute everything derived from the buffer: highlight cache and
    /// preview document.
    fn refresh_derived(&mut self) {
        if let Some(highlighter) = &mut self.highlighter {
            highlighter.invalidate();
        }
        self.preview = preview::compose(self.buffer.language(), self.buffer.text());
    }

    fn flash(&mut self, message: impl Into<String>) {
        self.status_flash = Some((message.into(), Instant::now()));
    }
}

fn highlighter_for(language: Language) -> Option<Highlighter> {
    match Highlighter::new(language) {
        Ok(highlighter) => Some(highlighter),
        Err(e) => {
            tracing::warn!("Highlighting disabled for {language}: {e}");
            None
        }
    }
}
