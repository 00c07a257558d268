/// Which list position an edit session writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Append a new item at the end of the list
    New,
    /// Replace the item at this index
    Existing(usize),
}

/// Result of running a validator over submitted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: String,
}

impl Validation {
    pub fn valid() -> Self {
        Validation {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Validation {
            is_valid: false,
            message: message.into(),
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Validation::valid()
    }
}

/// An in-progress add or edit. Exists only while the input is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub target: EditTarget,
    pub pending_text: String,
    /// Last submit-time validation; reset to valid on the next keystroke
    pub validation: Validation,
}

impl EditSession {
    pub fn append() -> Self {
        EditSession {
            target: EditTarget::New,
            pending_text: String::new(),
            validation: Validation::valid(),
        }
    }

    pub fn editing(index: usize, text: String) -> Self {
        EditSession {
            target: EditTarget::Existing(index),
            pending_text: text,
            validation: Validation::valid(),
        }
    }

    pub fn is_append(&self) -> bool {
        self.target == EditTarget::New
    }
}
