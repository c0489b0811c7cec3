//! The buffer controller: source text, language, caret, derived line count.
//!
//! All mutations happen synchronously on the UI thread. The one subtlety is
//! caret restoration after a programmatic content replacement (tab
//! insertion, fix apply): the new caret must be applied at the next UI
//! settle point, after the frame that shows the new content, so
//! `insert_tab_at` only *returns* the caret and the app layer schedules it.

use super::language::Language;
use super::templates;

/// The fixed indent inserted by the Tab key.
pub const TAB_INDENT: &str = "    ";

pub struct SourceBuffer {
    text: String,
    language: Language,
    /// Byte offset of the caret; always on a char boundary.
    caret: usize,
    /// Derived: number of lines in `text` (at least 1, like the original
    /// status bar's `split('\n').length`).
    line_count: usize,
}

impl SourceBuffer {
    /// Create a buffer holding the template for `language`.
    pub fn new(language: Language) -> Self {
        let text = templates::template(language).to_string();
        let line_count = count_lines(&text);
        Self {
            text,
            language,
            caret: 0,
            line_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// The caret as a (start, end) selection pair. The terminal host has no
    /// range selection, so the pair is always collapsed.
    pub fn selection(&self) -> (usize, usize) {
        (self.caret, self.caret)
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// 1-based (line, column) of the caret, in chars, for the status bar.
    pub fn caret_line_col(&self) -> (usize, usize) {
        let line = self.text[..self.caret].matches('\n').count();
        let start = self.line_start(self.caret);
        let col = self.text[start..self.caret].chars().count();
        (line + 1, col + 1)
    }

    /// Replace the buffer with the template for `language`. The caller owns
    /// the output record and must clear it alongside this call.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.text = templates::template(language).to_string();
        self.caret = 0;
        self.line_count = count_lines(&self.text);
    }

    /// Wholesale replacement, no validation: the buffer accepts
    /// syntactically invalid source for any language. Idempotent for equal
    /// input. The caret is clamped into the new bounds.
    pub fn edit(&mut self, new_text: &str) {
        if self.text != new_text {
            self.text.clear();
            self.text.push_str(new_text);
        }
        self.line_count = count_lines(&self.text);
        self.caret = self.clamp_to_boundary(self.caret);
    }

    /// Delete `[start, end)` and insert the fixed four-space indent at
    /// `start`. Out-of-bounds or inverted ranges are clamped, never a
    /// fault. Returns the caret offset (`start + 4`) the caller must
    /// restore after the next draw; the buffer's own caret is only clamped
    /// back into bounds here.
    pub fn insert_tab_at(&mut self, start: usize, end: usize) -> usize {
        let start = self.clamp_to_boundary(start);
        let end = self.clamp_to_boundary(end).max(start);
        self.text.replace_range(start..end, TAB_INDENT);
        self.line_count = count_lines(&self.text);
        self.caret = self.clamp_to_boundary(self.caret);
        start + TAB_INDENT.len()
    }

    /// Move the caret to `offset`, clamped to the buffer and to a char
    /// boundary. This is the restore half of the two-phase tab/fix commit.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = self.clamp_to_boundary(offset);
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.caret, c);
        self.caret += c.len_utf8();
        self.line_count = count_lines(&self.text);
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
            self.text.remove(self.caret);
            self.line_count = count_lines(&self.text);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.caret < self.text.len() {
            self.text.remove(self.caret);
            self.line_count = count_lines(&self.text);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.text[..self.caret].chars().next_back() {
            self.caret -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.text[self.caret..].chars().next() {
            self.caret += next.len_utf8();
        }
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.caret);
        if start == 0 {
            return;
        }
        let col = self.text[start..self.caret].chars().count();
        let prev_start = self.line_start(start - 1);
        self.caret = self.offset_at_col(prev_start, start - 1, col);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.caret);
        if end == self.text.len() {
            return;
        }
        let start = self.line_start(self.caret);
        let col = self.text[start..self.caret].chars().count();
        let next_start = end + 1;
        let next_end = self.line_end(next_start);
        self.caret = self.offset_at_col(next_start, next_end, col);
    }

    pub fn move_line_start(&mut self) {
        self.caret = self.line_start(self.caret);
    }

    pub fn move_line_end(&mut self) {
        self.caret = self.line_end(self.caret);
    }

    /// Byte offset just after the previous newline (or 0).
    fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    /// Byte offset of the next newline (or end of buffer).
    fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(self.text.len())
    }

    /// Byte offset of the `col`-th char within `[line_start, line_end)`,
    /// clamped to the line end.
    fn offset_at_col(&self, line_start: usize, line_end: usize, col: usize) -> usize {
        self.text[line_start..line_end]
            .char_indices()
            .nth(col)
            .map(|(i, _)| line_start + i)
            .unwrap_or(line_end)
    }

    fn clamp_to_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}
