pub mod field_view;
mod helpers;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | field box | filler | status row (1 row)
    let box_height = field_view::content_height(app).saturating_add(2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(box_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    app.field_area = chunks[1];
    field_view::render_field_view(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[3]);
}

/// Record name, then every field with the selected one highlighted
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        app.file.record.name.clone(),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, name) in app.file.record.fields.keys().enumerate() {
        let style = if i == app.field_index {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled("  ", Style::default().bg(bg)));
        spans.push(Span::styled(name.clone(), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::test_helpers::*;
    use super::*;

    #[test]
    fn full_screen() {
        let (_tmp, mut app) = app_with(RECORD);
        app.config.ui.show_key_hints = false;
        let out = render_to_string(40, 8, |frame, _| render(frame, &mut app));
        assert_snapshot!(out, @r"
        Acme Corp  emails  phones  tags
        ┌ emails ──────────────────────────────┐
        │★ sales@acme.test                     │
        │  ceo@acme.test                       │
        └──────────────────────────────────────┘
        ");
        assert_eq!(app.field_area, Rect::new(0, 1, 40, 4));
    }

    #[test]
    fn hints_sit_on_the_last_row() {
        let (_tmp, mut app) = app_with(RECORD);
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let last = out.lines().last().unwrap();
        assert!(last.starts_with("a add  e edit"));
        assert_eq!(out.lines().count(), TERM_H as usize);
    }
}
