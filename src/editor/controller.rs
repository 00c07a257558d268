use tracing::{debug, warn};

use super::editable::EditableText;
use super::hooks::{DismissEvent, EditorHooks};
use super::list_ops::{appended, blank_if_whitespace, moved, spliced};
use super::session::{EditSession, EditTarget, Validation};
use crate::model::FieldKind;

/// Error type for editor operations. Validation failures are not errors;
/// they live in the session and go to the error observer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("item index out of range: {index} (field has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unsupported item shape: {0}")]
    UnsupportedItemShape(String),
    #[error("field kind changed: editor holds {expected}, field now holds {found}")]
    KindMismatch {
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Which branch a submit took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No session was open
    NoSession,
    /// The validator rejected the text; the session stays open
    Invalid,
    /// Empty text in append mode; the session stays open
    IgnoredEmpty,
    /// Empty text while editing removed the item
    Deleted,
    /// The edited item came out equal to the existing one
    Unchanged,
    /// A new list was proposed to the sink
    Persisted,
}

/// A per-item trigger, bound to the item's index when the views are built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Edit(usize),
    SetPrimary(usize),
    Delete(usize),
}

/// What a renderer needs for one item
#[derive(Debug)]
pub struct ItemView<'a, T> {
    pub index: usize,
    pub item: &'a T,
    pub is_primary: bool,
    pub edit: ItemAction,
    pub set_primary: ItemAction,
    pub delete: ItemAction,
}

/// Edit/validate/persist state machine for one multi-item field.
///
/// The item list belongs to the caller and is passed into every operation.
/// The controller never mutates it: each change is proposed to the
/// persistence sink as a freshly built `Vec`, and the caller hands the
/// persisted list back on the next call.
pub struct MultiItemController<T> {
    hooks: EditorHooks<T>,
    session: Option<EditSession>,
}

impl<T> MultiItemController<T>
where
    T: EditableText + Clone + PartialEq,
{
    pub fn new(hooks: EditorHooks<T>) -> Self {
        MultiItemController {
            hooks,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// True when the open session appends rather than edits
    pub fn is_append(&self) -> bool {
        self.session.as_ref().is_none_or(|s| s.is_append())
    }

    pub fn pending_text(&self) -> &str {
        self.session
            .as_ref()
            .map_or("", |s| s.pending_text.as_str())
    }

    /// Message of the last failed submit, until the text changes
    pub fn error_message(&self) -> Option<&str> {
        self.session
            .as_ref()
            .filter(|s| !s.validation.is_valid)
            .map(|s| s.validation.message.as_str())
    }

    /// An empty list always shows its input inline
    pub fn shows_input(&self, items: &[T]) -> bool {
        self.session.is_some() || items.is_empty()
    }

    /// Open a session that appends a new item.
    pub fn start_add(&mut self) {
        debug!("edit session opened for a new item");
        self.session = Some(EditSession::append());
    }

    /// Open a session editing `items[index]`, pre-filled with its text.
    pub fn start_edit(&mut self, items: &[T], index: usize) -> Result<(), EditorError> {
        let item = check_index(items, index)?;
        debug!(index, "edit session opened for an existing item");
        self.session = Some(EditSession::editing(index, item.to_editable_text()));
        Ok(())
    }

    /// Replace the pending text. Typing with no open session (the inline
    /// input of an empty list) opens an append session.
    pub fn update_text(&mut self, items: &[T], text: &str) {
        let session = self.session.get_or_insert_with(EditSession::append);
        session.pending_text = blank_if_whitespace(text).to_string();

        if self.hooks.validate.is_none() {
            return;
        }
        if !session.validation.is_valid {
            session.validation = Validation::valid();
        }
        if let Some(on_error) = &mut self.hooks.on_error {
            on_error(false, items);
        }
    }

    /// Commit the pending text.
    pub fn submit(&mut self, items: &[T]) -> Result<SubmitOutcome, EditorError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(SubmitOutcome::NoSession);
        };
        let text = session.pending_text.trim().to_string();

        if let Some(validate) = &self.hooks.validate {
            let validation = validate(&text);
            if !validation.is_valid {
                warn!(message = %validation.message, "submit rejected by validator");
                session.validation = validation;
                if let Some(on_error) = &mut self.hooks.on_error {
                    on_error(true, items);
                }
                return Ok(SubmitOutcome::Invalid);
            }
        }

        let target = session.target;
        if text.is_empty() {
            return match target {
                EditTarget::New => Ok(SubmitOutcome::IgnoredEmpty),
                EditTarget::Existing(index) => {
                    self.session = None;
                    self.delete_item(items, index)?;
                    Ok(SubmitOutcome::Deleted)
                }
            };
        }

        let proposed = match target {
            EditTarget::New => appended(items, self.build_item(&text)),
            EditTarget::Existing(index) => {
                let existing = match check_index(items, index) {
                    Ok(existing) => existing,
                    Err(e) => {
                        self.session = None;
                        return Err(e);
                    }
                };
                // untouched text keeps the stored item even when the
                // formatter would fill in defaults
                let item = (existing.to_editable_text() != text).then(|| self.build_item(&text));
                if item.as_ref().is_none_or(|item| item == existing) {
                    debug!(index, "edit left the item unchanged");
                    self.session = None;
                    return Ok(SubmitOutcome::Unchanged);
                }
                spliced(items, index, item)
            }
        };

        self.propose(proposed);
        self.session = None;
        Ok(SubmitOutcome::Persisted)
    }

    /// Propose `items` with `items[index]` moved to the front.
    pub fn set_primary(&mut self, items: &[T], index: usize) -> Result<(), EditorError> {
        check_index(items, index)?;
        self.propose(moved(items, index, 0));
        // Keep an open edit pointed at the same item after the shift
        if let Some(session) = &mut self.session
            && let EditTarget::Existing(i) = session.target
        {
            let shifted = if i == index {
                0
            } else if i < index {
                i + 1
            } else {
                i
            };
            session.target = EditTarget::Existing(shifted);
        }
        Ok(())
    }

    /// Propose `items` without `items[index]`.
    pub fn delete_item(&mut self, items: &[T], index: usize) -> Result<(), EditorError> {
        check_index(items, index)?;
        self.propose(spliced(items, index, None));
        let editing = self.session.as_ref().map(|s| s.target);
        match editing {
            Some(EditTarget::Existing(i)) if i == index => self.session = None,
            Some(EditTarget::Existing(i)) if i > index => {
                if let Some(session) = &mut self.session {
                    session.target = EditTarget::Existing(i - 1);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Close the session without proposing anything.
    pub fn cancel(&mut self) {
        debug!("edit session cancelled");
        self.session = None;
        if let Some(on_cancel) = &mut self.hooks.on_cancel {
            on_cancel();
        }
    }

    /// Focus left the editor. An empty list renders its input inline with no
    /// confirm button, so pending text there is submitted; anywhere else the
    /// dismissal is only forwarded, and an open session closes as if
    /// cancelled. Returns the implicit submit's outcome.
    pub fn handle_dismiss(
        &mut self,
        items: &[T],
        event: &DismissEvent,
    ) -> Result<Option<SubmitOutcome>, EditorError> {
        let was_open = self.is_open();
        let outcome = if items.is_empty() && !self.pending_text().is_empty() {
            Some(self.submit(items)?)
        } else {
            None
        };

        if let Some(on_dismiss) = &mut self.hooks.on_dismiss {
            on_dismiss(event);
        }
        // A rejected implicit submit stays open so the error is visible
        if outcome != Some(SubmitOutcome::Invalid) {
            self.session = None;
        }
        if was_open && outcome.is_none() {
            debug!(?event, "edit session dismissed");
            if let Some(on_cancel) = &mut self.hooks.on_cancel {
                on_cancel();
            }
        }
        Ok(outcome)
    }

    /// Per-item triggers for the list as it is now
    pub fn item_views<'a>(&self, items: &'a [T]) -> Vec<ItemView<'a, T>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| ItemView {
                index,
                item,
                is_primary: index == 0,
                edit: ItemAction::Edit(index),
                set_primary: ItemAction::SetPrimary(index),
                delete: ItemAction::Delete(index),
            })
            .collect()
    }

    /// Run a trigger from [`item_views`](Self::item_views).
    pub fn apply(&mut self, items: &[T], action: ItemAction) -> Result<(), EditorError> {
        match action {
            ItemAction::Edit(index) => self.start_edit(items, index),
            ItemAction::SetPrimary(index) => self.set_primary(items, index),
            ItemAction::Delete(index) => self.delete_item(items, index),
        }
    }

    fn build_item(&self, text: &str) -> T {
        match &self.hooks.format {
            Some(format) => format(text),
            None => T::from_editable_text(text),
        }
    }

    fn propose(&mut self, items: Vec<T>) {
        debug!(len = items.len(), "proposing item list");
        (self.hooks.persist)(items);
    }
}

fn check_index<T>(items: &[T], index: usize) -> Result<&T, EditorError> {
    items.get(index).ok_or(EditorError::IndexOutOfRange {
        index,
        len: items.len(),
    })
}
