//! Template catalog with built-in protection and change notification

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::Level;
use uuid::Uuid;

use super::builtin::{default_templates, DEFAULT_CATEGORIES};
use super::query::collect_categories;
use super::substitution::{placeholders, substitute};
use super::types::{
    CatalogEvent, CatalogSnapshot, Template, TemplateDraft, TemplateError, TemplateResult,
};

/// Default capacity of the change notification channel
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Attempts before `snapshot` gives up waiting for a quiet catalog
const SNAPSHOT_RETRIES: usize = 8;

struct CatalogEntry {
    /// Insertion position; built-ins occupy the lowest positions
    position: u64,
    template: Template,
}

/// In-memory template catalog.
///
/// Built-in templates are seeded at construction and never change. Custom
/// templates are created, replaced and deleted by id; each write swaps the
/// whole record under the entry lock, so concurrent writers resolve as
/// last-writer-wins.
pub struct TemplateCatalog {
    templates: DashMap<String, CatalogEntry>,
    default_categories: Vec<String>,
    next_position: AtomicU64,
    version: AtomicU64,
    events: broadcast::Sender<CatalogEvent>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog {
    /// Create a catalog holding the shipped built-in templates
    pub fn new() -> Self {
        let catalog = Self::empty(DEFAULT_EVENT_BUFFER);
        for (id, draft) in default_templates() {
            if let Err(e) = catalog.seed_builtin(id.to_string(), draft) {
                tracing::error!(template_id = %id, error = %e, "Skipping invalid built-in template");
            }
        }
        catalog
    }

    /// Create a catalog without built-in templates
    pub fn empty(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            templates: DashMap::new(),
            default_categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            next_position: AtomicU64::new(0),
            version: AtomicU64::new(0),
            events,
        }
    }

    /// Create a catalog from an explicit list of built-in definitions
    pub fn with_builtins(
        builtins: Vec<(String, TemplateDraft)>,
        event_buffer: usize,
    ) -> TemplateResult<Self> {
        let catalog = Self::empty(event_buffer);
        for (id, draft) in builtins {
            catalog.seed_builtin(id, draft)?;
        }
        Ok(catalog)
    }

    /// Validate and insert one built-in template during construction
    fn seed_builtin(&self, id: String, draft: TemplateDraft) -> TemplateResult<()> {
        let draft = draft.normalized();
        draft.validate()?;

        if id.trim().is_empty() {
            return Err(TemplateError::Validation(
                "Built-in template id must not be empty".to_string(),
            ));
        }
        if self.templates.contains_key(&id) {
            return Err(TemplateError::Validation(format!(
                "Duplicate built-in template id: {}",
                id
            )));
        }

        self.insert_entry(draft.into_template(id, true));
        Ok(())
    }

    fn insert_entry(&self, template: Template) {
        let position = self.next_position.fetch_add(1, Ordering::SeqCst);
        self.templates
            .insert(template.id.clone(), CatalogEntry { position, template });
    }

    fn bump_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn notify(&self, event: CatalogEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// All templates: built-ins in definition order, then customs in creation order
    pub fn all(&self) -> Vec<Template> {
        let mut entries: Vec<(u64, Template)> = self
            .templates
            .iter()
            .map(|entry| (entry.position, entry.template.clone()))
            .collect();
        entries.sort_by_key(|(position, _)| *position);
        entries.into_iter().map(|(_, template)| template).collect()
    }

    /// Templates together with the catalog version they reflect.
    ///
    /// If writers keep racing past the retry budget, the version read before
    /// listing is returned: the templates include at least every mutation up
    /// to that version, possibly later ones too.
    pub fn snapshot(&self) -> CatalogSnapshot {
        for _ in 1..SNAPSHOT_RETRIES {
            let before = self.version();
            let templates = self.all();
            if self.version() == before {
                return CatalogSnapshot {
                    version: before,
                    templates,
                };
            }
        }

        let version = self.version();
        let templates = self.all();
        tracing::warn!(
            version,
            retries = SNAPSHOT_RETRIES,
            "Catalog kept changing during snapshot; returning lower-bound version"
        );
        CatalogSnapshot { version, templates }
    }

    /// Category labels: defaults first, then any others in catalog order
    pub fn categories(&self) -> Vec<String> {
        collect_categories(&self.all(), &self.default_categories)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|entry| entry.template.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Number of built-in templates
    pub fn builtin_count(&self) -> usize {
        self.templates
            .iter()
            .filter(|entry| entry.template.is_builtin)
            .count()
    }

    /// Current catalog version, bumped after every effective mutation
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Create a custom template from an authoring draft
    pub fn create(&self, draft: TemplateDraft) -> TemplateResult<Template> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut id = format!("custom-{}", Uuid::new_v4());
        while self.templates.contains_key(&id) {
            id = format!("custom-{}", Uuid::new_v4());
        }

        let template = draft.into_template(id, false);
        log_unused_variables(&template);
        self.insert_entry(template.clone());

        let version = self.bump_version();
        tracing::info!(template_id = %template.id, version, "Custom template created");
        self.notify(CatalogEvent::Created {
            id: template.id.clone(),
            version,
        });

        Ok(template)
    }

    /// Replace every mutable field of a custom template
    pub fn update(&self, id: &str, draft: TemplateDraft) -> TemplateResult<Template> {
        let draft = draft.normalized();

        let updated = {
            let mut entry = self
                .templates
                .get_mut(id)
                .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

            if entry.template.is_builtin {
                tracing::warn!(template_id = %id, "Rejected update of built-in template");
                return Err(TemplateError::PermissionDenied(id.to_string()));
            }

            draft.validate()?;
            entry.template.apply(draft);
            entry.template.clone()
        };
        log_unused_variables(&updated);

        let version = self.bump_version();
        tracing::info!(template_id = %id, version, "Custom template updated");
        self.notify(CatalogEvent::Updated {
            id: id.to_string(),
            version,
        });

        Ok(updated)
    }

    /// Delete a custom template.
    ///
    /// Unknown ids and built-in templates are left alone. Returns whether a
    /// template was removed.
    pub fn delete(&self, id: &str) -> bool {
        let removed = self
            .templates
            .remove_if(id, |_, entry| !entry.template.is_builtin)
            .is_some();

        if !removed {
            tracing::debug!(template_id = %id, "Delete ignored: unknown or built-in template");
            return false;
        }

        let version = self.bump_version();
        tracing::info!(template_id = %id, version, "Custom template deleted");
        self.notify(CatalogEvent::Deleted {
            id: id.to_string(),
            version,
        });

        true
    }

    /// Render a template with the supplied values
    pub fn render(&self, id: &str, values: &HashMap<String, String>) -> TemplateResult<String> {
        let template = self.get(id)?;
        Ok(substitute(&template.body, &template.variables, values))
    }
}

fn log_unused_variables(template: &Template) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let referenced = placeholders(&template.body);
    for variable in &template.variables {
        if !referenced.contains(variable) {
            tracing::debug!(
                template_id = %template.id,
                variable = %variable,
                "Declared variable is not used in template body"
            );
        }
    }
}
