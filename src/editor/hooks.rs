use std::sync::mpsc;

use super::session::Validation;

/// Signal that attention left the editor, with the originating event data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissEvent {
    /// The terminal (or window) lost focus
    FocusLost,
    /// A pointer press landed outside the editor region
    ClickOutside { column: u16, row: u16 },
    /// Escape, for hosts that treat the key as leaving the editor. The `mf`
    /// TUI binds Esc to [`cancel`](super::MultiItemController::cancel) instead.
    Escape,
}

type Persist<T> = Box<dyn FnMut(Vec<T>)>;
type Validator = Box<dyn Fn(&str) -> Validation>;
type Formatter<T> = Box<dyn Fn(&str) -> T>;
type ErrorObserver<T> = Box<dyn FnMut(bool, &[T])>;
type CancelHook = Box<dyn FnMut()>;
type DismissHook = Box<dyn FnMut(&DismissEvent)>;

/// The capabilities a caller plugs into a [`MultiItemController`].
///
/// Only the persistence sink is required. Every other capability is
/// an explicit `Option`, set through the `with_*` builders.
///
/// [`MultiItemController`]: super::MultiItemController
pub struct EditorHooks<T> {
    pub(super) persist: Persist<T>,
    pub(super) validate: Option<Validator>,
    pub(super) format: Option<Formatter<T>>,
    pub(super) on_error: Option<ErrorObserver<T>>,
    pub(super) on_cancel: Option<CancelHook>,
    pub(super) on_dismiss: Option<DismissHook>,
}

impl<T> EditorHooks<T> {
    /// Hooks with only a persistence sink. The sink receives every
    /// proposed list and is never awaited.
    pub fn new(persist: impl FnMut(Vec<T>) + 'static) -> Self {
        EditorHooks {
            persist: Box::new(persist),
            validate: None,
            format: None,
            on_error: None,
            on_cancel: None,
            on_dismiss: None,
        }
    }

    pub fn with_validator(mut self, validate: impl Fn(&str) -> Validation + 'static) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_formatter(mut self, format: impl Fn(&str) -> T + 'static) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    pub fn with_error_observer(mut self, on_error: impl FnMut(bool, &[T]) + 'static) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn with_cancel(mut self, on_cancel: impl FnMut() + 'static) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    pub fn with_dismiss(mut self, on_dismiss: impl FnMut(&DismissEvent) + 'static) -> Self {
        self.on_dismiss = Some(Box::new(on_dismiss));
        self
    }

    pub fn has_validator(&self) -> bool {
        self.validate.is_some()
    }
}

impl<T: 'static> EditorHooks<T> {
    /// Hooks whose sink forwards proposals into a channel
    pub fn channel() -> (Self, mpsc::Receiver<Vec<T>>) {
        let (tx, rx) = mpsc::channel();
        let hooks = EditorHooks::new(move |items| {
            let _ = tx.send(items);
        });
        (hooks, rx)
    }
}
