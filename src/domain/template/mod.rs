//! Note template system.
//!
//! This module provides:
//! - Template definitions with variable placeholders ({{variable}})
//! - An in-memory catalog of built-in and custom templates
//! - Search, category and custom-only filtering
//! - A single-pass substitution engine for rendering note text
//!
//! # Example
//!
//! ```ignore
//! let catalog = TemplateCatalog::new();
//!
//! let template = catalog.create(TemplateDraft {
//!     name: "Standup".to_string(),
//!     category: "Work".to_string(),
//!     body: "Yesterday: {{yesterday}}\nToday: {{today}}".to_string(),
//!     variables: vec!["yesterday".to_string(), "today".to_string()],
//!     ..Default::default()
//! })?;
//!
//! let visible = filter_templates(&catalog.all(), "stand", "All", true);
//!
//! let mut values = HashMap::new();
//! values.insert("today".to_string(), "Ship the picker".to_string());
//! let text = catalog.render(&template.id, &values)?;
//! ```

mod builtin;
mod query;
mod store;
mod substitution;
mod types;

pub use builtin::{default_templates, DEFAULT_CATEGORIES};
pub use query::{collect_categories, filter_templates, TemplateFilter, ALL_CATEGORIES};
pub use store::{TemplateCatalog, DEFAULT_EVENT_BUFFER};
pub use substitution::{placeholders, substitute};
pub use types::{
    is_valid_variable_name, CatalogEvent, CatalogSnapshot, Template, TemplateDraft,
    TemplateError, TemplateListResponse, TemplateResult,
};
