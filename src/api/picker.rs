//! Picker session endpoints.
//!
//! A session mirrors one open picker dialog: filter, pick, fill, confirm.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::metrics::{CatalogMetrics, PickerMetrics};
use crate::picker::{view_of, NoteDraft, PickerView};
use crate::server::AppState;
use crate::template::TemplateFilter;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ValuesRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// POST /api/v1/picker - Open a picker session
#[tracing::instrument(name = "http.open_picker", skip(state))]
pub async fn open_picker(State(state): State<AppState>) -> Result<(StatusCode, Json<PickerView>)> {
    let id = state.pickers.open()?;
    PickerMetrics::set_active_sessions(state.pickers.count());

    Ok((StatusCode::CREATED, Json(state.pickers.view(id)?)))
}

/// GET /api/v1/picker/{id} - Current picker view
#[tracing::instrument(name = "http.get_picker", skip(state))]
pub async fn get_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PickerView>> {
    Ok(Json(state.pickers.view(id)?))
}

/// DELETE /api/v1/picker/{id} - Cancel a picker session
#[tracing::instrument(name = "http.close_picker", skip(state))]
pub async fn close_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.pickers.close(id) {
        return Err(AppError::NotFound(format!("Picker session not found: {}", id)));
    }
    PickerMetrics::set_active_sessions(state.pickers.count());

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/picker/{id}/filter - Replace the search filter
#[tracing::instrument(name = "http.filter_picker", skip(state, filter))]
pub async fn update_filter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(filter): Json<TemplateFilter>,
) -> Result<Json<PickerView>> {
    let view = state.pickers.with_picker(id, |picker| {
        picker.set_filter(filter);
        Ok(view_of(id, picker))
    })?;
    CatalogMetrics::record_query();

    Ok(Json(view))
}

/// POST /api/v1/picker/{id}/select - Choose a template
#[tracing::instrument(name = "http.select_template", skip(state, request), fields(template_id = %request.template_id))]
pub async fn select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<PickerView>> {
    let view = state.pickers.with_picker(id, |picker| {
        picker.select(&request.template_id)?;
        Ok(view_of(id, picker))
    })?;

    Ok(Json(view))
}

/// PUT /api/v1/picker/{id}/values - Fill in variables, returns the live preview
#[tracing::instrument(name = "http.set_values", skip(state, request))]
pub async fn set_values(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ValuesRequest>,
) -> Result<Json<PickerView>> {
    let view = state.pickers.with_picker(id, |picker| {
        picker.set_values(request.values)?;
        Ok(view_of(id, picker))
    })?;
    CatalogMetrics::record_render();

    Ok(Json(view))
}

/// POST /api/v1/picker/{id}/confirm - Produce the note and close the session
#[tracing::instrument(name = "http.confirm_picker", skip(state))]
pub async fn confirm_picker(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteDraft>> {
    let note = state.pickers.confirm(id, state.note_sink.as_ref())?;

    PickerMetrics::record_note_created();
    PickerMetrics::set_active_sessions(state.pickers.count());
    CatalogMetrics::record_render();

    Ok(Json(note))
}
