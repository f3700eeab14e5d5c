//! Template picker state machine

use std::collections::HashMap;
use std::sync::Arc;

use crate::template::{substitute, Template, TemplateCatalog, TemplateFilter, ALL_CATEGORIES};

use super::types::{NoteDraft, NoteSink, PickerError, PickerResult, SelectionView, VariableField};

struct Selection {
    /// Copy taken at selection time; later catalog edits do not reach an open form
    template: Template,
    values: HashMap<String, String>,
}

/// Browsing and variable-form state for one user choosing a template
pub struct TemplatePicker {
    catalog: Arc<TemplateCatalog>,
    filter: TemplateFilter,
    selection: Option<Selection>,
}

impl TemplatePicker {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self {
            catalog,
            filter: TemplateFilter::default(),
            selection: None,
        }
    }

    pub fn filter(&self) -> &TemplateFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: TemplateFilter) {
        self.filter = filter;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = category.into();
    }

    pub fn set_custom_only(&mut self, custom_only: bool) {
        self.filter.custom_only = custom_only;
    }

    /// Templates matching the current filter, recomputed from the live catalog
    pub fn visible(&self) -> Vec<Template> {
        self.filter.apply(&self.catalog.all())
    }

    /// Options for the category control, "All" first
    pub fn category_options(&self) -> Vec<String> {
        let mut options = vec![ALL_CATEGORIES.to_string()];
        options.extend(self.catalog.categories());
        options
    }

    /// Select a template and reset the form to one empty value per variable
    pub fn select(&mut self, id: &str) -> PickerResult<&Template> {
        let template = self.catalog.get(id)?;
        let values = template
            .variables
            .iter()
            .map(|name| (name.clone(), String::new()))
            .collect();

        tracing::debug!(template_id = %id, "Template selected");
        let selection = self.selection.insert(Selection { template, values });
        Ok(&selection.template)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<&Template> {
        self.selection.as_ref().map(|s| &s.template)
    }

    /// Set one variable of the selected template
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> PickerResult<()> {
        let selection = self.selection.as_mut().ok_or(PickerError::NoSelection)?;

        if !selection.template.declares(name) {
            return Err(PickerError::UnknownVariable(name.to_string()));
        }

        selection.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Set several variables at once; nothing is applied if any name is undeclared
    pub fn set_values(&mut self, values: HashMap<String, String>) -> PickerResult<()> {
        let selection = self.selection.as_mut().ok_or(PickerError::NoSelection)?;

        if let Some(unknown) = values.keys().find(|name| !selection.template.declares(name)) {
            return Err(PickerError::UnknownVariable(unknown.clone()));
        }

        selection.values.extend(values);
        Ok(())
    }

    /// Form fields in declaration order
    pub fn fields(&self) -> Vec<VariableField> {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };

        selection
            .template
            .variables
            .iter()
            .map(|name| VariableField {
                name: name.clone(),
                value: selection.values.get(name).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Live rendering of the selected template
    pub fn preview(&self) -> Option<String> {
        self.selection
            .as_ref()
            .map(|s| substitute(&s.template.body, &s.template.variables, &s.values))
    }

    pub fn selection_view(&self) -> Option<SelectionView> {
        let selection = self.selection.as_ref()?;
        Some(SelectionView {
            template_id: selection.template.id.clone(),
            name: selection.template.name.clone(),
            fields: self.fields(),
            preview: self.preview().unwrap_or_default(),
        })
    }

    /// Finish: render the note, hand it to `sink`, and close the picker
    pub fn confirm(self, sink: &dyn NoteSink) -> PickerResult<NoteDraft> {
        let selection = self.selection.ok_or(PickerError::NoSelection)?;
        let template = selection.template;

        let note = NoteDraft {
            content: substitute(&template.body, &template.variables, &selection.values),
            template_id: template.id,
            title: template.name,
            tags: template.tags,
        };

        sink.note_created(&note);
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{TemplateDraft, TemplateError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        notes: Mutex<Vec<NoteDraft>>,
    }

    impl NoteSink for RecordingSink {
        fn note_created(&self, note: &NoteDraft) {
            self.notes.lock().unwrap().push(note.clone());
        }
    }

    fn catalog() -> Arc<TemplateCatalog> {
        let catalog = TemplateCatalog::with_builtins(
            vec![(
                "t1".to_string(),
                TemplateDraft {
                    name: "Meeting Notes".to_string(),
                    category: "Work".to_string(),
                    tags: vec!["meeting".to_string(), "work".to_string()],
                    body: "Meeting on {{date}} with {{attendees}}. Notes: {{notes}}".to_string(),
                    variables: vec!["attendees".to_string(), "date".to_string()],
                    ..Default::default()
                },
            )],
            8,
        )
        .unwrap();
        Arc::new(catalog)
    }

    #[test]
    fn test_filter_drives_visible() {
        let catalog = catalog();
        catalog
            .create(TemplateDraft {
                name: "Recipe".to_string(),
                category: "Personal".to_string(),
                ..Default::default()
            })
            .unwrap();

        let mut picker = TemplatePicker::new(catalog);
        assert_eq!(picker.visible().len(), 2);

        picker.set_query("meet");
        assert_eq!(picker.visible()[0].id, "t1");
        assert_eq!(picker.visible().len(), 1);

        picker.set_query("");
        picker.set_custom_only(true);
        assert_eq!(picker.visible()[0].name, "Recipe");

        picker.set_custom_only(false);
        picker.set_category("Work");
        assert_eq!(picker.visible().len(), 1);
    }

    #[test]
    fn test_category_options_start_with_all() {
        let picker = TemplatePicker::new(catalog());
        let options = picker.category_options();
        assert_eq!(options[0], ALL_CATEGORIES);
        assert!(options.contains(&"Work".to_string()));
    }

    #[test]
    fn test_select_initialises_fields_in_order() {
        let mut picker = TemplatePicker::new(catalog());
        picker.select("t1").unwrap();

        let fields = picker.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "attendees");
        assert_eq!(fields[1].name, "date");
        assert!(fields.iter().all(|f| f.value.is_empty()));
        assert_eq!(
            picker.preview().unwrap(),
            "Meeting on  with . Notes: {{notes}}"
        );
    }

    #[test]
    fn test_select_unknown() {
        let mut picker = TemplatePicker::new(catalog());
        assert!(matches!(
            picker.select("missing"),
            Err(PickerError::Template(TemplateError::NotFound(_)))
        ));
        assert!(picker.selected().is_none());
    }

    #[test]
    fn test_set_value_requires_selection_and_declared_name() {
        let mut picker = TemplatePicker::new(catalog());
        assert_eq!(picker.set_value("date", "x"), Err(PickerError::NoSelection));

        picker.select("t1").unwrap();
        assert_eq!(
            picker.set_value("notes", "x"),
            Err(PickerError::UnknownVariable("notes".to_string()))
        );
    }

    #[test]
    fn test_set_values_is_all_or_nothing() {
        let mut picker = TemplatePicker::new(catalog());
        picker.select("t1").unwrap();

        let mut values = HashMap::new();
        values.insert("date".to_string(), "2024-01-05".to_string());
        values.insert("bogus".to_string(), "x".to_string());

        assert!(picker.set_values(values).is_err());
        assert!(picker.fields().iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_live_preview_and_confirm() {
        let mut picker = TemplatePicker::new(catalog());
        picker.select("t1").unwrap();
        picker.set_value("date", "2024-01-05").unwrap();
        picker.set_value("attendees", "Alice, Bob").unwrap();

        assert_eq!(
            picker.preview().unwrap(),
            "Meeting on 2024-01-05 with Alice, Bob. Notes: {{notes}}"
        );

        let sink = RecordingSink::default();
        let note = picker.confirm(&sink).unwrap();
        assert_eq!(note.template_id, "t1");
        assert_eq!(note.title, "Meeting Notes");
        assert_eq!(note.tags, vec!["meeting".to_string(), "work".to_string()]);
        assert_eq!(
            note.content,
            "Meeting on 2024-01-05 with Alice, Bob. Notes: {{notes}}"
        );
        assert_eq!(sink.notes.lock().unwrap().as_slice(), &[note]);
    }

    #[test]
    fn test_confirm_without_selection() {
        let picker = TemplatePicker::new(catalog());
        let sink = RecordingSink::default();
        assert!(matches!(
            picker.confirm(&sink),
            Err(PickerError::NoSelection)
        ));
        assert!(sink.notes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reselect_resets_values() {
        let mut picker = TemplatePicker::new(catalog());
        picker.select("t1").unwrap();
        picker.set_value("date", "today").unwrap();

        picker.select("t1").unwrap();
        assert!(picker.fields().iter().all(|f| f.value.is_empty()));

        picker.clear_selection();
        assert!(picker.preview().is_none());
        assert!(picker.fields().is_empty());
    }

    #[test]
    fn test_selection_survives_template_deletion() {
        let catalog = catalog();
        let custom = catalog
            .create(TemplateDraft {
                name: "Temp".to_string(),
                category: "Work".to_string(),
                body: "Hi {{who}}".to_string(),
                variables: vec!["who".to_string()],
                ..Default::default()
            })
            .unwrap();

        let mut picker = TemplatePicker::new(catalog.clone());
        picker.select(&custom.id).unwrap();
        catalog.delete(&custom.id);

        picker.set_value("who", "there").unwrap();
        let note = picker.confirm(&RecordingSink::default()).unwrap();
        assert_eq!(note.content, "Hi there");
    }
}
