//! Open picker sessions keyed by session id

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::template::TemplateCatalog;

use super::state::TemplatePicker;
use super::types::{NoteDraft, NoteSink, PickerError, PickerResult, PickerView};

struct Session {
    picker: TemplatePicker,
    last_active: Instant,
}

/// Registry of in-progress pickers
pub struct PickerSessions {
    catalog: Arc<TemplateCatalog>,
    sessions: DashMap<Uuid, Session>,
    /// Slots taken, reserved before insert so the limit holds under concurrent opens
    reserved: AtomicUsize,
    max_sessions: usize,
}

impl PickerSessions {
    pub fn new(catalog: Arc<TemplateCatalog>, max_sessions: usize) -> Self {
        Self {
            catalog,
            sessions: DashMap::new(),
            reserved: AtomicUsize::new(0),
            max_sessions,
        }
    }

    /// Open a new picker
    pub fn open(&self) -> PickerResult<Uuid> {
        let max = self.max_sessions;
        if self
            .reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |taken| {
                (taken < max).then_some(taken + 1)
            })
            .is_err()
        {
            tracing::warn!(limit = max, "Picker session limit reached");
            return Err(PickerError::TooManySessions(max));
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                picker: TemplatePicker::new(self.catalog.clone()),
                last_active: Instant::now(),
            },
        );

        tracing::debug!(session_id = %id, "Picker session opened");
        Ok(id)
    }

    /// Run `f` against an open picker, refreshing its idle timer
    pub fn with_picker<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut TemplatePicker) -> PickerResult<T>,
    ) -> PickerResult<T> {
        let mut session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| PickerError::SessionNotFound(id.to_string()))?;

        session.last_active = Instant::now();
        f(&mut session.picker)
    }

    /// Snapshot of an open picker for display
    pub fn view(&self, id: Uuid) -> PickerResult<PickerView> {
        self.with_picker(id, |picker| Ok(view_of(id, picker)))
    }

    /// Confirm the picker's selection and close the session.
    ///
    /// A session without a selection stays open.
    pub fn confirm(&self, id: Uuid, sink: &dyn NoteSink) -> PickerResult<NoteDraft> {
        let (_, session) = self
            .sessions
            .remove_if(&id, |_, session| session.picker.selected().is_some())
            .ok_or_else(|| {
                if self.sessions.contains_key(&id) {
                    PickerError::NoSelection
                } else {
                    PickerError::SessionNotFound(id.to_string())
                }
            })?;

        self.release(1);
        tracing::debug!(session_id = %id, "Picker session confirmed");
        session.picker.confirm(sink)
    }

    /// Close a picker without producing a note. Returns whether it existed.
    pub fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            self.release(1);
        }
        removed
    }

    /// Drop sessions idle for longer than `ttl`; returns how many were removed
    pub fn purge_idle(&self, ttl: Duration) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = session.last_active.elapsed() <= ttl;
            if !keep {
                removed += 1;
            }
            keep
        });

        self.release(removed);
        removed
    }

    fn release(&self, slots: usize) {
        if slots > 0 {
            self.reserved.fetch_sub(slots, Ordering::SeqCst);
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

/// Build the client-facing view of a picker
pub fn view_of(id: Uuid, picker: &TemplatePicker) -> PickerView {
    PickerView {
        session_id: id.to_string(),
        filter: picker.filter().clone(),
        categories: picker.category_options(),
        templates: picker.visible(),
        selected: picker.selection_view(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::LoggingNoteSink;

    fn sessions(max: usize) -> PickerSessions {
        PickerSessions::new(Arc::new(TemplateCatalog::new()), max)
    }

    #[test]
    fn test_open_and_view() {
        let sessions = sessions(4);
        let id = sessions.open().unwrap();

        let view = sessions.view(id).unwrap();
        assert_eq!(view.session_id, id.to_string());
        assert_eq!(view.categories[0], "All");
        assert!(!view.templates.is_empty());
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_session_limit() {
        let sessions = sessions(1);
        sessions.open().unwrap();
        assert_eq!(sessions.open(), Err(PickerError::TooManySessions(1)));
    }

    #[test]
    fn test_with_picker_mutates_state() {
        let sessions = sessions(4);
        let id = sessions.open().unwrap();

        sessions
            .with_picker(id, |picker| {
                picker.select("meeting-notes")?;
                picker.set_value("title", "Kickoff")?;
                Ok(())
            })
            .unwrap();

        let view = sessions.view(id).unwrap();
        let selected = view.selected.unwrap();
        assert_eq!(selected.template_id, "meeting-notes");
        assert!(selected.preview.starts_with("# Kickoff"));
    }

    #[test]
    fn test_confirm_closes_session() {
        let sessions = sessions(4);
        let id = sessions.open().unwrap();

        assert_eq!(
            sessions.confirm(id, &LoggingNoteSink),
            Err(PickerError::NoSelection)
        );
        assert_eq!(sessions.count(), 1);

        sessions
            .with_picker(id, |picker| {
                picker.select("weekly-review")?;
                picker.set_value("week_start", "2024-01-01")
            })
            .unwrap();

        let note = sessions.confirm(id, &LoggingNoteSink).unwrap();
        assert_eq!(note.title, "Weekly Review");
        assert!(note.content.starts_with("# Week of 2024-01-01"));
        assert_eq!(sessions.count(), 0);
        assert!(matches!(
            sessions.confirm(id, &LoggingNoteSink),
            Err(PickerError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_close() {
        let sessions = sessions(4);
        let id = sessions.open().unwrap();

        assert!(sessions.close(id));
        assert!(!sessions.close(id));
        assert_eq!(sessions.count(), 0);
    }

    #[test]
    fn test_purge_idle() {
        let sessions = sessions(4);
        sessions.open().unwrap();
        sessions.open().unwrap();

        assert_eq!(sessions.purge_idle(Duration::from_secs(3600)), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(sessions.purge_idle(Duration::ZERO), 2);
        assert_eq!(sessions.count(), 0);
    }

    #[test]
    fn test_concurrent_opens_respect_limit() {
        let sessions = Arc::new(sessions(16));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sessions = sessions.clone();
                std::thread::spawn(move || {
                    (0..10).filter(|_| sessions.open().is_ok()).count()
                })
            })
            .collect();
        let opened: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(opened, 16);
        assert_eq!(sessions.count(), 16);
    }

    #[test]
    fn test_slots_freed_after_close_confirm_and_purge() {
        let sessions = sessions(2);
        let first = sessions.open().unwrap();
        let second = sessions.open().unwrap();

        assert!(sessions.close(first));
        let third = sessions.open().unwrap();

        sessions
            .with_picker(third, |picker| picker.select("weekly-review").map(|_| ()))
            .unwrap();
        sessions.confirm(third, &LoggingNoteSink).unwrap();
        sessions.open().unwrap();

        assert!(sessions.open().is_err());
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(sessions.purge_idle(Duration::ZERO), 2);
        assert!(sessions.open().is_ok());
        assert!(!sessions.close(second));
    }
}
