//! Rendering: header chrome, editor pane (gutter + text + highlight
//! overlay), output/preview pane, status bar, language picker popup.
//!
//! The highlight overlay is drawn over the same cells as the text layer,
//! so both read the scroll offset from `OverlaySync`, which mirrors the
//! text offset into the overlay offset on every change.

pub mod scroll;
pub mod theme;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::StudioApp;
use crate::highlight::HighlightSpan;
use crate::model::language::Language;
use self::theme::Theme;

/// Gutter: four digit columns plus one space.
const GUTTER_WIDTH: u16 = 5;

pub fn render(frame: &mut Frame, app: &mut StudioApp) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0], app);

    // The original studio widens the preview pane to a 50/50 split.
    let is_preview = app.buffer.language().is_preview();
    let (editor_pct, side_pct) = if is_preview { (50, 50) } else { (60, 40) };
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(editor_pct),
            Constraint::Percentage(side_pct),
        ])
        .split(rows[1]);

    render_editor(frame, panes[0], app);
    if is_preview {
        render_preview(frame, panes[1], app);
    } else {
        render_output(frame, panes[1], app);
    }

    render_status(frame, rows[2], app);

    if app.language_picker.is_some() {
        render_language_picker(frame, area, app);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &StudioApp) {
    let theme = &app.theme;
    let base = Style::default().bg(theme.header_bg);
    frame.render_widget(Block::default().style(base), area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(0),
            Constraint::Length(44),
        ])
        .split(area);

    let left = Line::from(vec![
        Span::styled(" ●", Style::default().fg(Color::Red).bg(theme.header_bg)),
        Span::styled(" ●", Style::default().fg(Color::Yellow).bg(theme.header_bg)),
        Span::styled(" ●", Style::default().fg(Color::Green).bg(theme.header_bg)),
        Span::styled(
            "  Aether Studio",
            Style::default().fg(theme.dim).bg(theme.header_bg),
        ),
    ]);
    frame.render_widget(Paragraph::new(left).style(base), cols[0]);

    let center = Paragraph::new(Line::from(Span::styled(
        app.buffer.language().display_name(),
        Style::default()
            .fg(theme.accent)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .style(base);
    frame.render_widget(center, cols[1]);

    let hints = if app.buffer.language().is_preview() {
        "^E Explain  ^F Fix  ^O Open  ^L Lang  ^Q Quit "
    } else {
        "^R Run  ^E Explain  ^F Fix  ^L Lang  ^Q Quit "
    };
    frame.render_widget(
        Paragraph::new(hints)
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.dim).bg(theme.header_bg)),
        cols[2],
    );
}

fn render_editor(frame: &mut Frame, area: Rect, app: &mut StudioApp) {
    let theme = app.theme.clone();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let text_width = area.width.saturating_sub(GUTTER_WIDTH) as usize;
    let text_height = area.height as usize;
    if text_width == 0 || text_height == 0 {
        return;
    }

    // Keep the caret visible; the overlay offset mirrors in the same call.
    let (caret_line, caret_col) = app.buffer.caret_line_col();
    app.viewport
        .scroll_to_caret(caret_col - 1, caret_line - 1, text_width, text_height);
    let offset = app.viewport.overlay_offset();

    // Highlight pass over the whole buffer (cached until the next edit).
    let spans = match &mut app.highlighter {
        Some(highlighter) => highlighter.highlight(app.buffer.text(), &theme),
        None => Vec::new(),
    };

    let text = app.buffer.text();
    let mut lines: Vec<Line> = Vec::new();
    let mut line_start = 0usize;
    for (index, line_text) in text.split('\n').enumerate() {
        if index >= offset.y && index < offset.y + text_height {
            let current = index + 1 == caret_line;
            let gutter_style = Style::default().fg(if current {
                theme.gutter_current
            } else {
                theme.gutter
            });
            let mut row: Vec<Span> = vec![Span::styled(format!("{:>4} ", index + 1), gutter_style)];
            row.extend(editor_line(line_text, line_start, offset.x, &spans, &theme));
            lines.push(Line::from(row));
        }
        line_start += line_text.len() + 1;
    }

    frame.render_widget(
        Paragraph::new(Text::from(lines)).style(
            Style::default()
                .bg(theme.background)
                .fg(theme.foreground),
        ),
        area,
    );

    // The terminal cursor is the caret; it targets the real text cell so
    // the overlay never swallows clicks or hides the insertion point.
    if app.language_picker.is_none() {
        let x = area.x as usize + GUTTER_WIDTH as usize + (caret_col - 1 - offset.x);
        let y = area.y as usize + (caret_line - 1 - offset.y);
        if x < (area.x + area.width) as usize && y < (area.y + area.height) as usize {
            frame.set_cursor_position(Position::new(x as u16, y as u16));
        }
    }
}

/// Build the styled spans for one visible line: plain segments in the
/// foreground color, highlighted segments in their span color, horizontal
/// scroll applied by skipping leading chars.
fn editor_line(
    line_text: &str,
    line_start: usize,
    skip_chars: usize,
    spans: &[HighlightSpan],
    theme: &Theme,
) -> Vec<Span<'static>> {
    let skip_bytes = if skip_chars == 0 {
        0
    } else {
        match line_text.char_indices().nth(skip_chars) {
            Some((i, _)) => i,
            None => return Vec::new(),
        }
    };
    let visible = &line_text[skip_bytes..];
    let vis_start = line_start + skip_bytes;
    let vis_end = vis_start + visible.len();
    let base = Style::default().fg(theme.foreground);

    let mut out: Vec<Span<'static>> = Vec::new();
    let mut cursor = vis_start;
    for span in spans {
        if span.range.end <= cursor || span.range.start >= vis_end {
            continue;
        }
        let start = span.range.start.max(cursor);
        let end = span.range.end.min(vis_end);
        if start > cursor {
            out.push(Span::styled(
                visible[cursor - vis_start..start - vis_start].to_string(),
                base,
            ));
        }
        out.push(Span::styled(
            visible[start - vis_start..end - vis_start].to_string(),
            Style::default().fg(span.color),
        ));
        cursor = end;
    }
    if cursor < vis_end {
        out.push(Span::styled(
            visible[cursor - vis_start..].to_string(),
            base,
        ));
    }
    out
}

fn render_output(frame: &mut Frame, area: Rect, app: &StudioApp) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.dim))
        .title(" CONSOLE ")
        .title_style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if app.output.is_empty() {
        let placeholder = Paragraph::new("Output will appear here")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.dim).bg(theme.background));
        let mid = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(placeholder, mid);
        return;
    }

    let color = if app.output.is_error() {
        theme.error
    } else {
        theme.foreground
    };
    let mut lines = vec![Line::from(Span::styled(
        "$ exec run --target=main",
        Style::default().fg(theme.dim),
    ))];
    for line in app.output.text().split('\n') {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(color),
        )));
    }
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme.background)),
        inner,
    );
}

fn render_preview(frame: &mut Frame, area: Rect, app: &StudioApp) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(theme.dim))
        .title(" PREVIEW ")
        .title_style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let document = app.preview.as_deref().unwrap_or_default();
    let lines: Vec<Line> = document
        .split('\n')
        .map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(theme.foreground),
            ))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme.background)),
        inner,
    );
}

fn render_status(frame: &mut Frame, area: Rect, app: &StudioApp) {
    let theme = &app.theme;
    let base = Style::default().bg(theme.status_bg).fg(theme.dim);
    frame.render_widget(Block::default().style(base), area);

    let (_, col) = app.buffer.caret_line_col();
    let mut left = format!(
        " {}   Ln {}, Col {}",
        app.busy_label(),
        app.buffer.line_count(),
        col
    );
    if let Some(flash) = app.status_flash() {
        left.push_str("   ");
        left.push_str(flash);
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(7)])
        .split(area);
    frame.render_widget(Paragraph::new(left).style(base), cols[0]);
    frame.render_widget(
        Paragraph::new("UTF-8 ").alignment(Alignment::Right).style(base),
        cols[1],
    );
}

fn render_language_picker(frame: &mut Frame, area: Rect, app: &StudioApp) {
    let selected = app.language_picker.unwrap_or(0);
    let theme = &app.theme;

    let width = 24u16.min(area.width);
    let height = (Language::ALL.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" LANGUAGE ")
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.header_bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::new();
    for (index, language) in Language::ALL.iter().enumerate() {
        let style = if index == selected {
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.foreground)
        };
        lines.push(Line::from(Span::styled(
            format!(" {:<20}", language.display_name()),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}
