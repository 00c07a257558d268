use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{debug, error, info, warn};

use crate::editor::{DismissEvent, EditorError, FieldEditor, FieldSignal, ItemRow, SubmitOutcome};
use crate::io::record_io::{RecordError, RecordFile};
use crate::io::watcher::RecordWatcher;
use crate::model::{Config, FieldValue};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// One-line message shown in the status row until the next one replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: true,
        }
    }
}

/// TUI state: the record, the editor for the selected field, and the
/// text buffer feeding it.
pub struct App {
    pub file: RecordFile,
    pub config: Config,
    pub theme: Theme,
    /// Index into the record's fields. Always in range: a record with no
    /// fields is never loaded into the app.
    pub field_index: usize,
    pub editor: FieldEditor,
    signals_tx: Sender<FieldSignal>,
    signals: Receiver<FieldSignal>,
    /// Highlighted item
    pub cursor: usize,
    pub input: TextInput,
    pub status: Option<StatusMessage>,
    /// Where the field box was last drawn; clicks outside it dismiss the editor
    pub field_area: Rect,
    /// An external change arrived while editing
    pub pending_reload: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(file: RecordFile, config: Config, field: Option<&str>) -> Result<Self, RecordError> {
        if file.record.fields.is_empty() {
            return Err(RecordError::NoFields);
        }
        let field_index = match field {
            Some(name) => file
                .record
                .fields
                .get_index_of(name)
                .ok_or_else(|| RecordError::UnknownField(name.to_string()))?,
            None => 0,
        };

        let (signals_tx, signals) = mpsc::channel();
        let kind = file.record.fields[field_index].kind();
        let editor = FieldEditor::new(kind, &config.editor, signals_tx.clone());
        Ok(App {
            theme: Theme::from_config(&config.ui),
            file,
            config,
            field_index,
            editor,
            signals_tx,
            signals,
            cursor: 0,
            input: TextInput::default(),
            status: None,
            field_area: Rect::default(),
            pending_reload: false,
            should_quit: false,
        })
    }

    pub fn field_name(&self) -> &str {
        self.file
            .record
            .fields
            .get_index(self.field_index)
            .map_or("", |(name, _)| name.as_str())
    }

    pub fn value(&self) -> &FieldValue {
        &self.file.record.fields[self.field_index]
    }

    pub fn rows(&self) -> Vec<ItemRow> {
        self.editor.rows(self.value())
    }

    /// Keys go to the text input rather than the list
    pub fn input_active(&self) -> bool {
        self.editor.shows_input(self.value())
    }

    pub fn placeholder(&self) -> &str {
        self.config.placeholder(self.editor.kind())
    }

    // -- field selection --

    pub fn select_field(&mut self, index: usize) {
        if index == self.field_index || index >= self.file.record.fields.len() {
            return;
        }
        if self.editor.is_open() {
            self.editor.cancel();
            self.drain_signals();
        }
        self.field_index = index;
        self.rebuild_editor();
    }

    pub fn next_field(&mut self) {
        let len = self.file.record.fields.len();
        self.select_field((self.field_index + 1) % len);
    }

    pub fn prev_field(&mut self) {
        let len = self.file.record.fields.len();
        self.select_field((self.field_index + len - 1) % len);
    }

    fn rebuild_editor(&mut self) {
        let kind = self.value().kind();
        self.editor = FieldEditor::new(kind, &self.config.editor, self.signals_tx.clone());
        self.cursor = 0;
        self.input.clear();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.value().len();
        self.cursor = match len {
            0 => 0,
            _ => self.cursor.saturating_add_signed(delta).min(len - 1),
        };
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0);
    }

    // -- editor operations --

    pub fn start_add(&mut self) {
        self.editor.start_add();
        self.sync_input();
    }

    pub fn start_edit(&mut self) {
        let value = &self.file.record.fields[self.field_index];
        let result = self.editor.start_edit(value, self.cursor);
        self.finish(result);
    }

    pub fn set_primary(&mut self) {
        let value = &self.file.record.fields[self.field_index];
        let result = self.editor.set_primary(value, self.cursor);
        if result.is_ok() {
            self.cursor = 0;
        }
        self.finish(result);
    }

    pub fn delete(&mut self) {
        let value = &self.file.record.fields[self.field_index];
        let result = self.editor.delete_item(value, self.cursor);
        self.finish(result);
    }

    /// Push the input buffer into the open session
    pub fn text_changed(&mut self) {
        let value = &self.file.record.fields[self.field_index];
        if let Err(e) = self.editor.update_text(value, self.input.text()) {
            self.report(e);
        }
    }

    pub fn submit(&mut self) {
        let value = &self.file.record.fields[self.field_index];
        let len = value.len();
        let appending = self.editor.is_append();
        let result = self.editor.submit(value).map(|outcome| {
            debug!(?outcome, "submit");
            outcome
        });
        if appending && result == Ok(SubmitOutcome::Persisted) {
            // the new item lands at the end
            self.cursor = len;
        }
        self.finish(result.map(|_| ()));
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
        self.finish(Ok(()));
    }

    pub fn dismiss(&mut self, event: DismissEvent) {
        let value = &self.file.record.fields[self.field_index];
        let result = self.editor.handle_dismiss(value, &event).map(|_| ());
        self.finish(result);
    }

    fn finish(&mut self, result: Result<(), EditorError>) {
        if let Err(e) = result {
            self.report(e);
        }
        self.drain_signals();
        self.clamp_cursor();
        self.sync_input();
    }

    fn report(&mut self, e: EditorError) {
        warn!(error = %e, "editor operation failed");
        self.status = Some(StatusMessage::error(e.to_string()));
    }

    /// Session transitions (edit opened, submit, cancel) own the buffer;
    /// typing does not come back through here.
    fn sync_input(&mut self) {
        let pending = self.editor.pending_text().to_string();
        self.input.set_text(&pending);
    }

    /// Apply everything the editor reported since the last drain.
    pub fn drain_signals(&mut self) {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                FieldSignal::Persist(value) => self.persist(value),
                FieldSignal::Cancelled => debug!("edit cancelled"),
                FieldSignal::Dismissed(event) => debug!(?event, "editor dismissed"),
            }
        }
    }

    fn persist(&mut self, value: FieldValue) {
        let name = self.field_name().to_string();
        let count = value.len();
        match self.file.save_field(&name, value) {
            Ok(()) => {
                info!(field = %name, items = count, "field saved");
                self.status = Some(StatusMessage::info(format!("saved {}", name)));
                self.clamp_cursor();
            }
            Err(e) => {
                error!(field = %name, error = %e, "could not save field");
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
    }

    // -- external changes --

    /// Called once per loop iteration
    pub fn tick(&mut self, watcher: Option<&RecordWatcher>) {
        if watcher.is_some_and(|w| w.poll()) {
            self.pending_reload = true;
        }
        if self.pending_reload && !self.editor.is_open() {
            self.pending_reload = false;
            self.reload_from_disk();
        }
    }

    pub fn reload_from_disk(&mut self) {
        let file = match RecordFile::load(&self.file.path) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.status = Some(StatusMessage::error(e.to_string()));
                return;
            }
        };
        if file.record == self.file.record {
            // our own save coming back
            return;
        }
        if file.record.fields.is_empty() {
            self.status = Some(StatusMessage::error(RecordError::NoFields.to_string()));
            return;
        }

        let name = self.field_name().to_string();
        let kind = self.editor.kind();
        self.file = file;
        match self.file.record.fields.get_index_of(&name) {
            Some(index) if self.file.record.fields[index].kind() == kind => {
                self.field_index = index;
                self.clamp_cursor();
            }
            other => {
                self.field_index = other.unwrap_or(0);
                self.rebuild_editor();
            }
        }
        info!(path = %self.file.path.display(), "record reloaded");
        self.status = Some(StatusMessage::info("reloaded from disk"));
    }
}

/// Run the TUI on `record_path`, starting on `field` (or the first field)
pub fn run(
    record_path: &Path,
    config: Config,
    field: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = RecordFile::load(record_path)?;
    let mut app = App::new(file, config, field)?;

    let watcher = match RecordWatcher::start(record_path) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watching disabled");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        EnableBracketedPaste
    )?;
    let kitty = app.config.ui.kitty_keyboard.unwrap_or(true)
        && supports_keyboard_enhancement().unwrap_or(false);
    if kitty {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal(kitty);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    restore_terminal(kitty);
    terminal.show_cursor()?;

    result
}

fn restore_terminal(kitty: bool) {
    let mut stdout = io::stdout();
    if kitty {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(
        stdout,
        DisableBracketedPaste,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
    let _ = disable_raw_mode();
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&RecordWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            input::handle_event(app, event::read()?);
        }
        app.tick(watcher);

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::tui::render::test_helpers::*;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.input.insert_char(c);
            app.text_changed();
        }
    }

    fn on_disk(app: &App, field: &str) -> FieldValue {
        RecordFile::load(&app.file.path)
            .unwrap()
            .record
            .field(field)
            .cloned()
            .unwrap()
    }

    fn emails(items: &[&str]) -> FieldValue {
        FieldValue::Emails(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn starts_on_named_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("acme.toml");
        fs::write(&path, RECORD).unwrap();
        let file = RecordFile::load(&path).unwrap();
        let app = App::new(file.clone(), Config::default(), Some("tags")).unwrap();
        assert_eq!(app.field_name(), "tags");
        assert!(matches!(
            App::new(file, Config::default(), Some("nope")),
            Err(RecordError::UnknownField(_))
        ));
    }

    #[test]
    fn add_persists_to_disk() {
        let (_tmp, mut app) = app_with(RECORD);
        app.start_add();
        assert!(app.input_active());
        type_text(&mut app, "ops@acme.test");
        app.submit();

        let expected = emails(&["sales@acme.test", "ceo@acme.test", "ops@acme.test"]);
        assert_eq!(app.value(), &expected);
        assert_eq!(on_disk(&app, "emails"), expected);
        assert!(!app.editor.is_open());
        assert_eq!(app.input.text(), "");
        assert_eq!(app.cursor, 2);
        assert_eq!(app.status, Some(StatusMessage::info("saved emails")));
    }

    #[test]
    fn invalid_submit_keeps_text_and_writes_nothing() {
        let (_tmp, mut app) = app_with(RECORD);
        app.start_add();
        type_text(&mut app, "not-an-email");
        app.submit();

        assert!(app.editor.is_open());
        assert_eq!(app.input.text(), "not-an-email");
        assert_eq!(
            app.editor.error_message(),
            Some("Invalid email address: not-an-email")
        );
        assert_eq!(
            on_disk(&app, "emails"),
            emails(&["sales@acme.test", "ceo@acme.test"])
        );

        // typing clears the error
        type_text(&mut app, "x");
        assert_eq!(app.editor.error_message(), None);
    }

    #[test]
    fn clearing_an_edit_deletes_the_item() {
        let (_tmp, mut app) = app_with(RECORD);
        app.move_cursor(1);
        app.start_edit();
        assert_eq!(app.input.text(), "ceo@acme.test");
        app.input.clear();
        app.text_changed();
        app.submit();

        assert_eq!(app.value(), &emails(&["sales@acme.test"]));
        assert_eq!(app.cursor, 0);
        assert!(!app.editor.is_open());
    }

    #[test]
    fn set_primary_moves_cursor_to_top() {
        let (_tmp, mut app) = app_with(RECORD);
        app.move_cursor(5);
        assert_eq!(app.cursor, 1);
        app.set_primary();
        assert_eq!(app.cursor, 0);
        assert_eq!(
            on_disk(&app, "emails"),
            emails(&["ceo@acme.test", "sales@acme.test"])
        );
    }

    #[test]
    fn dismissing_an_empty_list_submits_pending_text() {
        let (_tmp, mut app) = app_with(RECORD);
        app.select_field(2);
        assert_eq!(app.field_name(), "tags");
        assert!(app.input_active());
        type_text(&mut app, "vip");
        app.dismiss(DismissEvent::FocusLost);

        assert_eq!(app.value(), &FieldValue::Array(vec!["vip".into()]));
        assert!(!app.editor.is_open());
        assert!(!app.input_active());
    }

    #[test]
    fn dismissing_a_non_empty_list_only_closes() {
        let (_tmp, mut app) = app_with(RECORD);
        app.start_add();
        type_text(&mut app, "ops@acme.test");
        app.dismiss(DismissEvent::ClickOutside { column: 0, row: 0 });

        assert!(!app.editor.is_open());
        assert_eq!(app.value().len(), 2);
    }

    #[test]
    fn switching_fields_drops_the_session() {
        let (_tmp, mut app) = app_with(RECORD);
        app.start_add();
        type_text(&mut app, "half-typed");
        app.next_field();
        assert_eq!(app.field_name(), "phones");
        assert!(!app.editor.is_open());
        assert_eq!(app.input.text(), "");
        app.prev_field();
        app.prev_field();
        assert_eq!(app.field_name(), "tags");
    }

    #[test]
    fn external_change_reloads_once_editing_ends() {
        let (_tmp, mut app) = app_with(RECORD);
        app.start_add();
        fs::write(
            &app.file.path,
            RECORD.replace("\"ceo@acme.test\"", "\"cfo@acme.test\""),
        )
        .unwrap();
        app.pending_reload = true;

        app.tick(None);
        assert_eq!(app.value().len(), 2);
        assert_eq!(
            app.value(),
            &emails(&["sales@acme.test", "ceo@acme.test"])
        );

        app.cancel();
        app.tick(None);
        assert_eq!(app.value(), &emails(&["sales@acme.test", "cfo@acme.test"]));
        assert_eq!(app.status, Some(StatusMessage::info("reloaded from disk")));
    }

    #[test]
    fn own_save_is_not_reported_as_reload() {
        let (_tmp, mut app) = app_with(RECORD);
        app.move_cursor(1);
        app.set_primary();
        app.move_cursor(1);
        app.set_primary();
        assert_eq!(app.status, Some(StatusMessage::info("saved emails")));

        app.reload_from_disk();
        assert_eq!(app.status, Some(StatusMessage::info("saved emails")));
        assert_eq!(app.value(), &emails(&["sales@acme.test", "ceo@acme.test"]));
    }

    #[test]
    fn failed_save_keeps_the_list_on_screen() {
        let (tmp, mut app) = app_with(RECORD);
        fs::remove_dir_all(tmp.path()).unwrap();
        app.move_cursor(1);
        app.set_primary();

        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
        assert_eq!(app.value(), &emails(&["sales@acme.test", "ceo@acme.test"]));
    }

    #[test]
    fn index_errors_go_to_status() {
        let (_tmp, mut app) = app_with(RECORD);
        app.select_field(1);
        app.delete();
        assert!(app.status.as_ref().is_some_and(|s| s.is_error));
    }
}
