//! Catalog change stream over Server-Sent Events.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use futures::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::server::AppState;
use crate::template::CatalogEvent;

/// GET /api/v1/templates/events - Stream catalog changes
#[tracing::instrument(name = "sse.template_events", skip(state))]
pub async fn template_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.catalog.subscribe();
    tracing::debug!(version = state.catalog.version(), "Catalog event stream opened");

    let stream = BroadcastStream::new(receiver).filter_map(|message| async move {
        match message {
            Ok(event) => to_sse_event(&event).map(Ok),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                // Client should refetch the list; the next event carries the current version
                tracing::warn!(skipped, "Catalog event subscriber lagged");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &CatalogEvent) -> Option<Event> {
    match Event::default()
        .event(event.kind())
        .id(event.version().to_string())
        .json_data(event)
    {
        Ok(sse_event) => Some(sse_event),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode catalog event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sse_event() {
        let event = CatalogEvent::Created {
            id: "custom-1".to_string(),
            version: 3,
        };
        assert!(to_sse_event(&event).is_some());
    }
}
