use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::editor::DismissEvent;

use super::app::App;

/// Route one terminal event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::FocusLost if app.input_active() => app.dismiss(DismissEvent::FocusLost),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Paste(text) if app.input_active() => {
            app.input.insert_str(&text);
            app.text_changed();
        }
        _ => {}
    }
}

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.input_active() {
        handle_edit(app, key);
    } else {
        handle_navigate(app, key);
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char('p') => app.set_primary(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete(),
        KeyCode::Tab => app.next_field(),
        KeyCode::BackTab => app.prev_field(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    let changed = match key.code {
        KeyCode::Enter => {
            app.submit();
            return;
        }
        KeyCode::Esc => {
            if app.editor.is_open() {
                app.cancel();
            } else {
                // empty list, nothing typed
                app.should_quit = true;
            }
            return;
        }
        KeyCode::Tab if !app.editor.is_open() => {
            app.next_field();
            return;
        }
        KeyCode::BackTab if !app.editor.is_open() => {
            app.prev_field();
            return;
        }
        KeyCode::Left => {
            app.input.left();
            false
        }
        KeyCode::Right => {
            app.input.right();
            false
        }
        KeyCode::Home => {
            app.input.home();
            false
        }
        KeyCode::End => {
            app.input.end();
            false
        }
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.input.insert_char(c);
            true
        }
        _ => false,
    };
    if changed {
        app.text_changed();
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !app.input_active() {
        return;
    }
    let inside = app
        .field_area
        .contains(Position::new(mouse.column, mouse.row));
    if !inside {
        app.dismiss(DismissEvent::ClickOutside {
            column: mouse.column,
            row: mouse.row,
        });
    }
}
