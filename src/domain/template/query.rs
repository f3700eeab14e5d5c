//! Search and filtering over a catalog snapshot
//!
//! Every function here is pure: same inputs, same output, catalog order preserved.

use serde::{Deserialize, Serialize};

use super::types::Template;

/// Category selector that disables the category predicate
pub const ALL_CATEGORIES: &str = "All";

fn all_categories() -> String {
    ALL_CATEGORIES.to_string()
}

/// Active search text, category selector and custom-only toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFilter {
    #[serde(default, alias = "q")]
    pub query: String,

    #[serde(default = "all_categories")]
    pub category: String,

    #[serde(default)]
    pub custom_only: bool,
}

impl Default for TemplateFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: all_categories(),
            custom_only: false,
        }
    }
}

impl TemplateFilter {
    /// Whether `template` satisfies every active predicate
    pub fn matches(&self, template: &Template) -> bool {
        matches_query(template, &self.query)
            && matches_category(template, &self.category)
            && (!self.custom_only || !template.is_builtin)
    }

    /// Matching templates in input order
    pub fn apply(&self, templates: &[Template]) -> Vec<Template> {
        templates
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}

/// Filter `templates` by search text, category and custom-only flag
pub fn filter_templates(
    templates: &[Template],
    query: &str,
    category: &str,
    custom_only: bool,
) -> Vec<Template> {
    TemplateFilter {
        query: query.to_string(),
        category: category.to_string(),
        custom_only,
    }
    .apply(templates)
}

fn matches_query(template: &Template, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    template.name.to_lowercase().contains(&needle)
        || template.description.to_lowercase().contains(&needle)
        || template
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

fn matches_category(template: &Template, category: &str) -> bool {
    category == ALL_CATEGORIES || template.category.to_lowercase() == category.to_lowercase()
}

/// Distinct categories: `defaults` first, then the rest in first-appearance order.
///
/// Labels are compared case-insensitively; the first spelling seen wins.
pub fn collect_categories(templates: &[Template], defaults: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    let mut push = |label: &str| {
        let lowered = label.to_lowercase();
        if !categories.iter().any(|c| c.to_lowercase() == lowered) {
            categories.push(label.to_string());
        }
    };

    for label in defaults {
        push(label);
    }
    for template in templates {
        push(&template.category);
    }

    categories
}
