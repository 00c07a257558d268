pub mod controller;
pub mod editable;
pub mod field_editor;
pub mod hooks;
pub mod list_ops;
pub mod session;
pub mod validate;

pub use controller::{EditorError, ItemAction, ItemView, MultiItemController, SubmitOutcome};
pub use editable::{EditableText, phone_formatter};
pub use field_editor::{FieldEditor, FieldSignal, ItemRow};
pub use hooks::{DismissEvent, EditorHooks};
pub use session::{EditSession, EditTarget, Validation};
