//! Template picker: choose a template, fill its variables, produce a note.
//!
//! `TemplatePicker` keeps the search filter and the variable form for one
//! user. Confirming hands a `NoteDraft` to a `NoteSink` and consumes the
//! picker. `PickerSessions` keeps pickers alive between HTTP requests.

mod state;
mod sessions;
mod types;

pub use state::TemplatePicker;
pub use sessions::{view_of, PickerSessions};
pub use types::{
    LoggingNoteSink, NoteDraft, NoteSink, PickerError, PickerResult, PickerView, SelectionView,
    VariableField,
};
