use std::fs;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::record_io::RecordFile;
use crate::model::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Emails with two items, an empty phones field, and an empty array field.
pub const RECORD: &str = r#"[record]
name = "Acme Corp"

[fields.emails]
kind = "emails"
items = ["sales@acme.test", "ceo@acme.test"]

[fields.phones]
kind = "phones"

[fields.tags]
kind = "array"
items = []
"#;

/// Write `text` to a temp record file and open an App on its first field.
/// Keep the TempDir alive for as long as the App saves.
pub fn app_with(text: &str) -> (TempDir, App) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme.toml");
    fs::write(&path, text).unwrap();
    let file = RecordFile::load(&path).unwrap();
    let app = App::new(file, Config::default(), None).unwrap();
    (tmp, app)
}
