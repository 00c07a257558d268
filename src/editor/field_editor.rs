use std::sync::mpsc::Sender;

use tracing::debug;

use super::controller::{EditorError, ItemAction, MultiItemController, SubmitOutcome};
use super::editable::{EditableText, phone_formatter};
use super::hooks::{DismissEvent, EditorHooks};
use super::validate;
use crate::model::{EditorConfig, FieldKind, FieldValue, LinkRecord, PhoneRecord};

/// What a field editor reports back to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSignal {
    /// A proposed list to write to the record
    Persist(FieldValue),
    Cancelled,
    Dismissed(DismissEvent),
}

/// One rendered list row with its bound triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub index: usize,
    pub text: String,
    pub is_primary: bool,
    pub edit: ItemAction,
    pub set_primary: ItemAction,
    pub delete: ItemAction,
}

/// A controller for whichever item shape a field holds. Operations take the
/// field's current [`FieldValue`] and fail with `KindMismatch` if it no
/// longer matches the editor.
pub enum FieldEditor {
    Emails(MultiItemController<String>),
    Phones(MultiItemController<PhoneRecord>),
    Links(MultiItemController<LinkRecord>),
    Array(MultiItemController<String>),
}

macro_rules! each {
    ($editor:expr, $c:ident => $body:expr) => {
        match $editor {
            FieldEditor::Emails($c) => $body,
            FieldEditor::Phones($c) => $body,
            FieldEditor::Links($c) => $body,
            FieldEditor::Array($c) => $body,
        }
    };
}

macro_rules! with_items {
    ($editor:expr, $value:expr, $c:ident, $items:ident => $body:expr) => {
        match ($editor, $value) {
            (FieldEditor::Emails($c), FieldValue::Emails($items)) => $body,
            (FieldEditor::Phones($c), FieldValue::Phones($items)) => $body,
            (FieldEditor::Links($c), FieldValue::Links($items)) => $body,
            (FieldEditor::Array($c), FieldValue::Array($items)) => $body,
            (editor, value) => Err(EditorError::KindMismatch {
                expected: editor.kind(),
                found: value.kind(),
            }),
        }
    };
}

fn hooks_for<T: 'static>(
    kind: FieldKind,
    wrap: fn(Vec<T>) -> FieldValue,
    config: &EditorConfig,
    signals: &Sender<FieldSignal>,
) -> EditorHooks<T> {
    let persist_tx = signals.clone();
    let cancel_tx = signals.clone();
    let dismiss_tx = signals.clone();
    let hooks = EditorHooks::new(move |items| {
        let _ = persist_tx.send(FieldSignal::Persist(wrap(items)));
    })
    .with_cancel(move || {
        let _ = cancel_tx.send(FieldSignal::Cancelled);
    })
    .with_dismiss(move |event| {
        let _ = dismiss_tx.send(FieldSignal::Dismissed(*event));
    })
    .with_error_observer(move |has_error, items: &[T]| {
        debug!(field = %kind, has_error, items = items.len(), "validation state");
    });

    match validate::for_kind(kind) {
        Some(validator) if config.validate => hooks.with_validator(validator),
        _ => hooks,
    }
}

fn rows_of<T>(controller: &MultiItemController<T>, items: &[T]) -> Vec<ItemRow>
where
    T: EditableText + Clone + PartialEq,
{
    controller
        .item_views(items)
        .into_iter()
        .map(|view| ItemRow {
            index: view.index,
            text: view.item.display_text(),
            is_primary: view.is_primary,
            edit: view.edit,
            set_primary: view.set_primary,
            delete: view.delete,
        })
        .collect()
}

impl FieldEditor {
    /// Build the editor for `kind`. Every signal goes to `signals`.
    pub fn new(kind: FieldKind, config: &EditorConfig, signals: Sender<FieldSignal>) -> Self {
        match kind {
            FieldKind::Emails => FieldEditor::Emails(MultiItemController::new(hooks_for(
                kind,
                FieldValue::Emails,
                config,
                &signals,
            ))),
            FieldKind::Phones => {
                let hooks = hooks_for(kind, FieldValue::Phones, config, &signals)
                    .with_formatter(phone_formatter(config.default_calling_code.clone()));
                FieldEditor::Phones(MultiItemController::new(hooks))
            }
            FieldKind::Links => FieldEditor::Links(MultiItemController::new(hooks_for(
                kind,
                FieldValue::Links,
                config,
                &signals,
            ))),
            FieldKind::Array => FieldEditor::Array(MultiItemController::new(hooks_for(
                kind,
                FieldValue::Array,
                config,
                &signals,
            ))),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldEditor::Emails(_) => FieldKind::Emails,
            FieldEditor::Phones(_) => FieldKind::Phones,
            FieldEditor::Links(_) => FieldKind::Links,
            FieldEditor::Array(_) => FieldKind::Array,
        }
    }

    pub fn is_open(&self) -> bool {
        each!(self, c => c.is_open())
    }

    pub fn is_append(&self) -> bool {
        each!(self, c => c.is_append())
    }

    pub fn pending_text(&self) -> &str {
        each!(self, c => c.pending_text())
    }

    pub fn error_message(&self) -> Option<&str> {
        each!(self, c => c.error_message())
    }

    pub fn shows_input(&self, value: &FieldValue) -> bool {
        self.is_open() || value.is_empty()
    }

    pub fn start_add(&mut self) {
        each!(self, c => c.start_add())
    }

    pub fn cancel(&mut self) {
        each!(self, c => c.cancel())
    }

    pub fn start_edit(&mut self, value: &FieldValue, index: usize) -> Result<(), EditorError> {
        with_items!(self, value, c, items => c.start_edit(items, index))
    }

    pub fn update_text(&mut self, value: &FieldValue, text: &str) -> Result<(), EditorError> {
        with_items!(self, value, c, items => {
            c.update_text(items, text);
            Ok(())
        })
    }

    pub fn submit(&mut self, value: &FieldValue) -> Result<SubmitOutcome, EditorError> {
        with_items!(self, value, c, items => c.submit(items))
    }

    pub fn set_primary(&mut self, value: &FieldValue, index: usize) -> Result<(), EditorError> {
        with_items!(self, value, c, items => c.set_primary(items, index))
    }

    pub fn delete_item(&mut self, value: &FieldValue, index: usize) -> Result<(), EditorError> {
        with_items!(self, value, c, items => c.delete_item(items, index))
    }

    pub fn apply(&mut self, value: &FieldValue, action: ItemAction) -> Result<(), EditorError> {
        with_items!(self, value, c, items => c.apply(items, action))
    }

    pub fn handle_dismiss(
        &mut self,
        value: &FieldValue,
        event: &DismissEvent,
    ) -> Result<Option<SubmitOutcome>, EditorError> {
        with_items!(self, value, c, items => c.handle_dismiss(items, event))
    }

    /// Rows for the list as it is now. Empty if the kinds disagree.
    pub fn rows(&self, value: &FieldValue) -> Vec<ItemRow> {
        match (self, value) {
            (FieldEditor::Emails(c), FieldValue::Emails(items))
            | (FieldEditor::Array(c), FieldValue::Array(items)) => rows_of(c, items),
            (FieldEditor::Phones(c), FieldValue::Phones(items)) => rows_of(c, items),
            (FieldEditor::Links(c), FieldValue::Links(items)) => rows_of(c, items),
            _ => Vec::new(),
        }
    }
}
