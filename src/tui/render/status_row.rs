use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::truncate_to_width;

const NAVIGATE_HINTS: &str = "a add  e edit  p primary  d delete  Tab field  q quit";
const EDIT_HINTS: &str = "Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(status) = &app.status {
        let fg = if status.is_error {
            app.theme.red
        } else {
            app.theme.green
        };
        Line::from(Span::styled(
            truncate_to_width(&status.text, width),
            Style::default().fg(fg).bg(bg),
        ))
    } else if app.config.ui.show_key_hints {
        let hints = if app.input_active() {
            EDIT_HINTS
        } else {
            NAVIGATE_HINTS
        };
        Line::from(Span::styled(
            truncate_to_width(hints, width),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::default()
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::StatusMessage;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn hints_follow_the_mode() {
        let (_tmp, mut app) = app_with(RECORD);
        assert_eq!(render(&app), NAVIGATE_HINTS);
        app.start_add();
        assert_eq!(render(&app), EDIT_HINTS);
    }

    #[test]
    fn status_message_replaces_hints() {
        let (_tmp, mut app) = app_with(RECORD);
        app.status = Some(StatusMessage::error("could not lock acme.toml"));
        assert_eq!(render(&app), "could not lock acme.toml");
    }

    #[test]
    fn hints_can_be_hidden() {
        let (_tmp, mut app) = app_with(RECORD);
        app.config.ui.show_key_hints = false;
        assert_eq!(render(&app), "");
    }
}
