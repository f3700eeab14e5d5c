//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a template name
pub const MAX_NAME_LEN: usize = 256;

/// Maximum length of a category label
pub const MAX_CATEGORY_LEN: usize = 64;

/// Maximum length of a placeholder name
pub const MAX_VARIABLE_LEN: usize = 64;

/// Template-specific error type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid template: {0}")]
    Validation(String),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Built-in template cannot be modified: {0}")]
    PermissionDenied(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A note template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identifier, assigned at creation
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Grouping label used by the category filter
    pub category: String,

    /// Search labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// Display glyph, opaque to the catalog
    #[serde(default)]
    pub icon: String,

    /// Shipped templates are read-only
    pub is_builtin: bool,

    /// Note body with {{variable}} placeholders
    pub body: String,

    /// Declared placeholder names, in form order
    #[serde(default)]
    pub variables: Vec<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Template {
    /// Whether `name` is one of the declared variables
    pub fn declares(&self, name: &str) -> bool {
        self.variables.iter().any(|v| v == name)
    }

    /// Replace every mutable field with the (already validated) draft.
    pub(crate) fn apply(&mut self, draft: TemplateDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.category = draft.category;
        self.tags = draft.tags;
        self.icon = draft.icon;
        self.body = draft.body;
        self.variables = draft.variables;
        self.updated_at = Utc::now();
    }
}

/// Authoring payload for creating or replacing a custom template.
///
/// Carries no `id` and no built-in flag; both are owned by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub variables: Vec<String>,
}

impl TemplateDraft {
    /// Trim text fields and tidy the tag set.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            let lowered = tag.to_lowercase();
            if tags.iter().any(|t| t.to_lowercase() == lowered) {
                continue;
            }
            tags.push(tag.to_string());
        }
        self.tags = tags;

        self
    }

    /// Validate the draft
    pub fn validate(&self) -> TemplateResult<()> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(TemplateError::Validation(format!(
                "Name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }

        let category_len = self.category.chars().count();
        if category_len == 0 || category_len > MAX_CATEGORY_LEN {
            return Err(TemplateError::Validation(format!(
                "Category must be 1-{} characters",
                MAX_CATEGORY_LEN
            )));
        }

        for (index, variable) in self.variables.iter().enumerate() {
            if !is_valid_variable_name(variable) {
                return Err(TemplateError::Validation(format!(
                    "Invalid variable name: {:?}",
                    variable
                )));
            }

            if self.variables[..index].contains(variable) {
                return Err(TemplateError::Validation(format!(
                    "Duplicate variable: {}",
                    variable
                )));
            }
        }

        Ok(())
    }

    /// Build a stored template from this draft
    pub(crate) fn into_template(self, id: String, is_builtin: bool) -> Template {
        let now = Utc::now();
        Template {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            tags: self.tags,
            icon: self.icon,
            is_builtin,
            body: self.body,
            variables: self.variables,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Placeholder names are non-empty, bounded, and free of whitespace and braces
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().take(MAX_VARIABLE_LEN + 1).count() <= MAX_VARIABLE_LEN
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == '{' || c == '}')
}

/// Change notification emitted after every effective catalog mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    Created { id: String, version: u64 },
    Updated { id: String, version: u64 },
    Deleted { id: String, version: u64 },
}

impl CatalogEvent {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogEvent::Created { .. } => "created",
            CatalogEvent::Updated { .. } => "updated",
            CatalogEvent::Deleted { .. } => "deleted",
        }
    }

    pub fn version(&self) -> u64 {
        match self {
            CatalogEvent::Created { version, .. }
            | CatalogEvent::Updated { version, .. }
            | CatalogEvent::Deleted { version, .. } => *version,
        }
    }
}

/// Ordered view of the catalog at a given version
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub version: u64,
    pub templates: Vec<Template>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// Matching templates in catalog order
    pub templates: Vec<Template>,

    /// Total count
    pub total: usize,

    /// Catalog version the list was computed from
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TemplateDraft {
        TemplateDraft {
            name: "Standup".to_string(),
            description: "Daily standup".to_string(),
            category: "Work".to_string(),
            tags: vec![],
            icon: String::new(),
            body: "Yesterday: {{yesterday}}".to_string(),
            variables: vec!["yesterday".to_string()],
        }
    }

    #[test]
    fn test_draft_validation_valid() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_validation_empty_name() {
        let mut d = draft();
        d.name = "   ".to_string();

        assert!(matches!(
            d.normalized().validate(),
            Err(TemplateError::Validation(_))
        ));
    }

    #[test]
    fn test_draft_validation_empty_category() {
        let mut d = draft();
        d.category = String::new();

        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));
    }

    #[test]
    fn test_draft_validation_bad_variable_name() {
        let mut d = draft();
        d.variables = vec!["due date".to_string()];
        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));

        d.variables = vec!["{x}".to_string()];
        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));
    }

    #[test]
    fn test_draft_validation_duplicate_variable() {
        let mut d = draft();
        d.variables = vec!["a".to_string(), "b".to_string(), "a".to_string()];

        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));
    }

    #[test]
    fn test_draft_validation_allows_unused_and_undeclared() {
        let mut d = draft();
        d.body = "{{undeclared}} only".to_string();
        d.variables = vec!["unused".to_string()];

        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_draft_normalized_tags() {
        let mut d = draft();
        d.name = "  Standup  ".to_string();
        d.tags = vec![
            " daily ".to_string(),
            "".to_string(),
            "Daily".to_string(),
            "team".to_string(),
        ];

        let d = d.normalized();
        assert_eq!(d.name, "Standup");
        assert_eq!(d.tags, vec!["daily".to_string(), "team".to_string()]);
    }

    #[test]
    fn test_event_kind_and_version() {
        let event = CatalogEvent::Deleted {
            id: "x".to_string(),
            version: 7,
        };
        assert_eq!(event.kind(), "deleted");
        assert_eq!(event.version(), 7);
    }

    #[test]
    fn test_draft_missing_fields_fail_validation() {
        let d: TemplateDraft = serde_json::from_str(r#"{"category":"Work","body":"x"}"#).unwrap();
        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));

        let d: TemplateDraft = serde_json::from_str(r#"{"name":"Notes"}"#).unwrap();
        assert!(matches!(d.validate(), Err(TemplateError::Validation(_))));
    }

    #[test]
    fn test_long_variable_name_rejected() {
        assert!(is_valid_variable_name(&"a".repeat(MAX_VARIABLE_LEN)));
        assert!(!is_valid_variable_name(&"a".repeat(MAX_VARIABLE_LEN + 1)));
    }
}
