//! Scroll synchronization between the editable text layer and the
//! highlight overlay.
//!
//! The overlay is drawn over the same cells as the text, so its scroll
//! offset must equal the text layer's at all times — a continuous
//! real-time coupling. Every change to the text offset mirrors into the
//! overlay offset in the same call; there is no deferred catch-up.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    /// Leading chars skipped per line.
    pub x: usize,
    /// Leading lines skipped.
    pub y: usize,
}

#[derive(Debug, Default)]
pub struct OverlaySync {
    text: ScrollOffset,
    overlay: ScrollOffset,
}

impl OverlaySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text layer's scroll offset; the overlay mirrors it before
    /// this call returns.
    pub fn scroll_text_to(&mut self, x: usize, y: usize) {
        self.text = ScrollOffset { x, y };
        self.overlay = self.text;
    }

    /// Adjust the offset so the caret at (col, line) is inside a viewport
    /// of `width` x `height` cells, moving as little as possible.
    pub fn scroll_to_caret(&mut self, col: usize, line: usize, width: usize, height: usize) {
        let min_x = col.saturating_sub(width.saturating_sub(1));
        let min_y = line.saturating_sub(height.saturating_sub(1));
        let x = self.text.x.max(min_x).min(col);
        let y = self.text.y.max(min_y).min(line);
        self.scroll_text_to(x, y);
    }

    pub fn text_offset(&self) -> ScrollOffset {
        self.text
    }

    pub fn overlay_offset(&self) -> ScrollOffset {
        self.overlay
    }
}
