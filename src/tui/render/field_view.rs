use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::app::App;

use super::helpers::{spans_width, truncate_to_width};

const PRIMARY_MARK: &str = "\u{2605} "; // ★
const ADD_MARK: &str = "+ ";
const EDIT_MARK: &str = "\u{2713} "; // ✓
const CURSOR: &str = "\u{258C}"; // ▌

/// Rows the field box needs inside its border
pub fn content_height(app: &App) -> u16 {
    let mut rows = app.value().len();
    if app.input_active() {
        rows += 1;
    }
    if app.editor.error_message().is_some() {
        rows += 1;
    }
    rows as u16
}

/// Render the selected field: its items, the input row and any validation error
pub fn render_field_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let block = Block::bordered()
        .title(format!(" {} ", app.field_name()))
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title_style(Style::default().fg(app.theme.text_bright).bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let input_active = app.input_active();
    let mut lines: Vec<Line> = Vec::new();

    for row in app.rows() {
        let marker = if row.is_primary { PRIMARY_MARK } else { "  " };
        let selected = !input_active && row.index == app.cursor;
        let style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let text = truncate_to_width(&row.text, width.saturating_sub(2));
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(app.theme.primary).bg(style.bg.unwrap_or(bg))),
            Span::styled(text, style),
        ]));
    }

    if input_active {
        lines.push(input_line(app, width));
    }

    if let Some(message) = app.editor.error_message() {
        lines.push(Line::from(Span::styled(
            truncate_to_width(message, width),
            Style::default().fg(app.theme.red).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

/// `+`/`✓` affordance, then the text with a cursor, or the placeholder
fn input_line(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    // An empty list's inline input has no confirm affordance
    let mark = if app.value().is_empty() {
        "  "
    } else if app.editor.is_append() {
        ADD_MARK
    } else {
        EDIT_MARK
    };

    let mut spans = vec![Span::styled(
        mark,
        Style::default().fg(app.theme.green).bg(bg),
    )];
    let text = app.input.text();
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    if text.is_empty() {
        spans.push(Span::styled(CURSOR, cursor_style));
        spans.push(Span::styled(
            app.placeholder().to_string(),
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        let (before, after) = text.split_at(app.input.cursor());
        spans.push(Span::styled(before.to_string(), text_style));
        spans.push(Span::styled(CURSOR, cursor_style));
        spans.push(Span::styled(after.to_string(), text_style));
    }

    // Long input: keep the cursor end visible
    if spans_width(&spans) > width {
        let tail: String = text.chars().rev().take(width.saturating_sub(3)).collect();
        let tail: String = tail.chars().rev().collect();
        spans.truncate(1);
        spans.push(Span::styled(tail, text_style));
        spans.push(Span::styled(CURSOR, cursor_style));
    }
    Line::from(spans)
}
