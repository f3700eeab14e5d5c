//! Picker types and the note-created boundary

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::{TemplateError, TemplateFilter};

/// Picker-specific error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("No template selected")]
    NoSelection,

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Picker session not found: {0}")]
    SessionNotFound(String),

    #[error("Too many open picker sessions (limit {0})")]
    TooManySessions(usize),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for picker operations
pub type PickerResult<T> = Result<T, PickerError>;

/// Note produced by confirming a template, shaped like the notes API create payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    /// Template the note was created from
    pub template_id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Receiver of finished notes.
///
/// Implementations persist or forward the note; the picker only hands it over.
pub trait NoteSink: Send + Sync {
    fn note_created(&self, note: &NoteDraft);
}

/// Sink that only records the note in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNoteSink;

impl NoteSink for LoggingNoteSink {
    fn note_created(&self, note: &NoteDraft) {
        tracing::info!(
            template_id = %note.template_id,
            title = %note.title,
            content_len = note.content.len(),
            "Note created from template"
        );
    }
}

/// One form field of the selected template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableField {
    pub name: String,
    pub value: String,
}

/// The selected template as shown in the variable form
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub template_id: String,
    pub name: String,
    pub fields: Vec<VariableField>,
    pub preview: String,
}

/// Everything a client needs to draw the picker
#[derive(Debug, Clone, Serialize)]
pub struct PickerView {
    pub session_id: String,
    pub filter: TemplateFilter,
    pub categories: Vec<String>,
    pub templates: Vec<crate::template::Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectionView>,
}
