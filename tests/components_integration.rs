//! Cross-component integration tests
//!
//! These tests drive the catalog, query engine, substitution engine and
//! picker together through the public library API, without starting a server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ara_note_templates::picker::{NoteDraft, NoteSink, PickerError, PickerSessions, TemplatePicker};
use ara_note_templates::template::{
    default_templates, filter_templates, substitute, CatalogEvent, Template, TemplateCatalog,
    TemplateDraft, TemplateError, ALL_CATEGORIES,
};

#[derive(Default)]
struct RecordingSink {
    notes: Mutex<Vec<NoteDraft>>,
}

impl NoteSink for RecordingSink {
    fn note_created(&self, note: &NoteDraft) {
        self.notes.lock().unwrap().push(note.clone());
    }
}

fn meeting_draft() -> TemplateDraft {
    TemplateDraft {
        name: "Meeting Notes".to_string(),
        description: String::new(),
        category: "Work".to_string(),
        tags: vec!["meeting".to_string(), "work".to_string()],
        icon: "📋".to_string(),
        body: "Meeting on {{date}} with {{attendees}}. Notes: {{notes}}".to_string(),
        variables: vec!["attendees".to_string(), "date".to_string()],
    }
}

fn custom_draft(name: &str, category: &str) -> TemplateDraft {
    TemplateDraft {
        name: name.to_string(),
        category: category.to_string(),
        body: format!("# {}\n{{{{body}}}}", name),
        variables: vec!["body".to_string()],
        ..Default::default()
    }
}

fn test_catalog() -> Arc<TemplateCatalog> {
    let catalog = TemplateCatalog::with_builtins(
        vec![
            ("t1".to_string(), meeting_draft()),
            (
                "t2".to_string(),
                TemplateDraft {
                    name: "Recipe".to_string(),
                    description: "Ingredients and steps".to_string(),
                    category: "Personal".to_string(),
                    tags: vec!["food".to_string()],
                    body: "{{dish}}".to_string(),
                    variables: vec!["dish".to_string()],
                    ..Default::default()
                },
            ),
        ],
        32,
    )
    .unwrap();
    Arc::new(catalog)
}

fn ids(templates: &[Template]) -> Vec<String> {
    templates.iter().map(|t| t.id.clone()).collect()
}

// =============================================================================
// Catalog Integration Tests
// =============================================================================

mod catalog_tests {
    use super::*;

    #[test]
    fn test_one_entry_per_live_id_after_mutations() {
        let catalog = test_catalog();
        let builtins_before: Vec<Template> = catalog.all().into_iter().take(2).collect();

        let a = catalog.create(custom_draft("A", "Work")).unwrap();
        let b = catalog.create(custom_draft("B", "Personal")).unwrap();
        let c = catalog.create(custom_draft("C", "Creative")).unwrap();
        catalog.update(&b.id, custom_draft("B2", "Work")).unwrap();
        catalog.delete(&a.id);
        catalog.delete("t1");
        let _ = catalog.update("t2", custom_draft("X", "Work"));

        let all = catalog.all();
        let all_ids = ids(&all);
        assert_eq!(all_ids, vec!["t1".to_string(), "t2".to_string(), b.id.clone(), c.id.clone()]);

        let mut deduped = all_ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), all_ids.len());

        assert_eq!(&all[..2], builtins_before.as_slice());
    }

    #[test]
    fn test_builtin_protection() {
        let catalog = test_catalog();
        let before = catalog.all();

        assert_eq!(
            catalog.update("t1", custom_draft("Hijack", "Work")),
            Err(TemplateError::PermissionDenied("t1".to_string()))
        );
        assert!(!catalog.delete("t1"));
        assert_eq!(catalog.all(), before);
    }

    #[test]
    fn test_update_unknown_id() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.update("custom-missing", custom_draft("X", "Work")),
            Err(TemplateError::NotFound("custom-missing".to_string()))
        );
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let catalog = test_catalog();
        let mut seen = Vec::new();
        for i in 0..50 {
            let t = catalog.create(custom_draft(&format!("T{}", i), "Work")).unwrap();
            assert!(!seen.contains(&t.id));
            seen.push(t.id);
        }
        assert_eq!(catalog.count(), 52);
    }

    #[test]
    fn test_concurrent_updates_last_writer_wins() {
        let catalog = test_catalog();
        let target = catalog.create(custom_draft("Shared", "Work")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = catalog.clone();
                let id = target.id.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        let name = format!("writer-{}-{}", i, j);
                        catalog.update(&id, custom_draft(&name, &name)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Every field comes from the same write
        let result = catalog.get(&target.id).unwrap();
        assert_eq!(result.name, result.category);
        assert_eq!(result.body, format!("# {}\n{{{{body}}}}", result.name));
        assert_eq!(catalog.version(), 1 + 8 * 25);
    }

    #[test]
    fn test_subscribers_see_changes_in_order() {
        let catalog = test_catalog();
        let mut rx = catalog.subscribe();

        let a = catalog.create(custom_draft("A", "Work")).unwrap();
        catalog.delete(&a.id);

        match rx.try_recv().unwrap() {
            CatalogEvent::Created { id, version } => {
                assert_eq!(id, a.id);
                assert_eq!(version, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(rx.try_recv().unwrap().version(), 2);
    }

    #[test]
    fn test_default_catalog_seeds_builtins() {
        let catalog = TemplateCatalog::new();
        let expected: Vec<String> = default_templates()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();

        assert_eq!(ids(&catalog.all()), expected);
        assert_eq!(catalog.builtin_count(), expected.len());
    }
}

// =============================================================================
// Query Integration Tests
// =============================================================================

mod query_tests {
    use super::*;

    #[test]
    fn test_search_meet_returns_only_meeting_template() {
        let catalog = test_catalog();
        let result = filter_templates(&catalog.all(), "meet", ALL_CATEGORIES, false);
        assert_eq!(ids(&result), vec!["t1".to_string()]);
    }

    #[test]
    fn test_result_is_ordered_subset() {
        let catalog = test_catalog();
        catalog.create(custom_draft("Meet-up plan", "Personal")).unwrap();
        catalog.create(custom_draft("Groceries", "Personal")).unwrap();

        let all = catalog.all();
        let result = filter_templates(&all, "e", ALL_CATEGORIES, false);

        let positions: Vec<usize> = result
            .iter()
            .map(|t| all.iter().position(|a| a.id == t.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(result, filter_templates(&all, "e", ALL_CATEGORIES, false));
    }

    #[test]
    fn test_custom_only_and_category() {
        let catalog = test_catalog();
        let custom = catalog.create(custom_draft("Journal", "personal")).unwrap();

        let result = filter_templates(&catalog.all(), "", "Personal", true);
        assert_eq!(ids(&result), vec![custom.id]);

        let result = filter_templates(&catalog.all(), "", "PERSONAL", false);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|t| t.category.to_lowercase() == "personal"));
    }

    #[test]
    fn test_categories_stable_when_unused() {
        let catalog = test_catalog();
        let categories = catalog.categories();

        for default in ["Work", "Personal", "Creative", "Learning", "Productivity"] {
            assert!(categories.iter().any(|c| c == default));
        }
    }
}

// =============================================================================
// Substitution and Picker Integration Tests
// =============================================================================

mod picker_tests {
    use super::*;

    #[test]
    fn test_meeting_notes_substitution() {
        let catalog = test_catalog();
        let mut values = HashMap::new();
        values.insert("date".to_string(), "2024-01-05".to_string());
        values.insert("attendees".to_string(), "Alice, Bob".to_string());

        assert_eq!(
            catalog.render("t1", &values).unwrap(),
            "Meeting on 2024-01-05 with Alice, Bob. Notes: {{notes}}"
        );
    }

    #[test]
    fn test_empty_values_blank_declared_markers_only() {
        let template = test_catalog().get("t1").unwrap();
        let result = substitute(&template.body, &template.variables, &HashMap::new());
        assert_eq!(result, "Meeting on  with . Notes: {{notes}}");
    }

    #[test]
    fn test_full_picker_flow() {
        let catalog = test_catalog();
        let sink = RecordingSink::default();

        let mut picker = TemplatePicker::new(catalog.clone());
        picker.set_query("meet");
        let visible = picker.visible();
        assert_eq!(visible.len(), 1);

        picker.select(&visible[0].id).unwrap();
        let names: Vec<String> = picker.fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["attendees".to_string(), "date".to_string()]);

        picker.set_value("attendees", "Alice").unwrap();
        assert_eq!(
            picker.preview().unwrap(),
            "Meeting on  with Alice. Notes: {{notes}}"
        );
        picker.set_value("date", "Friday").unwrap();

        let note = picker.confirm(&sink).unwrap();
        assert_eq!(note.content, "Meeting on Friday with Alice. Notes: {{notes}}");
        assert_eq!(sink.notes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_picker_sees_new_custom_templates() {
        let catalog = test_catalog();
        let mut picker = TemplatePicker::new(catalog.clone());
        picker.set_custom_only(true);
        assert!(picker.visible().is_empty());

        catalog.create(custom_draft("Fresh", "Work")).unwrap();
        assert_eq!(picker.visible().len(), 1);
    }

    #[test]
    fn test_sessions_share_catalog() {
        let catalog = test_catalog();
        let sessions = PickerSessions::new(catalog.clone(), 2);
        let sink = RecordingSink::default();

        let first = sessions.open().unwrap();
        let second = sessions.open().unwrap();
        assert!(matches!(sessions.open(), Err(PickerError::TooManySessions(2))));

        sessions
            .with_picker(first, |p| {
                p.select("t2")?;
                p.set_value("dish", "Soup")
            })
            .unwrap();

        let note = sessions.confirm(first, &sink).unwrap();
        assert_eq!(note.content, "Soup");
        assert_eq!(note.tags, vec!["food".to_string()]);

        assert_eq!(sessions.confirm(second, &sink), Err(PickerError::NoSelection));
        assert_eq!(sessions.count(), 1);
    }
}
