use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::picker::{LoggingNoteSink, NoteSink, PickerSessions};
use crate::template::{default_templates, TemplateCatalog, TemplateResult};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub catalog: Arc<TemplateCatalog>,
    pub pickers: Arc<PickerSessions>,
    pub note_sink: Arc<dyn NoteSink>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> TemplateResult<Self> {
        let buffer = settings.catalog.event_buffer;
        let catalog = if settings.catalog.include_builtins {
            let builtins = default_templates()
                .into_iter()
                .map(|(id, draft)| (id.to_string(), draft))
                .collect();
            TemplateCatalog::with_builtins(builtins, buffer)?
        } else {
            TemplateCatalog::empty(buffer)
        };

        Ok(Self::with_catalog(settings, Arc::new(catalog)))
    }

    /// Build state around an existing catalog
    pub fn with_catalog(settings: Settings, catalog: Arc<TemplateCatalog>) -> Self {
        let pickers = Arc::new(PickerSessions::new(
            catalog.clone(),
            settings.picker.max_sessions,
        ));

        Self {
            settings: Arc::new(settings),
            catalog,
            pickers,
            note_sink: Arc::new(LoggingNoteSink),
            started_at: Instant::now(),
        }
    }

    /// Replace the note-created boundary
    pub fn with_note_sink(mut self, sink: Arc<dyn NoteSink>) -> Self {
        self.note_sink = sink;
        self
    }
}
