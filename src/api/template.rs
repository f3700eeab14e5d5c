//! Template catalog endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::CatalogMetrics;
use crate::server::AppState;
use crate::template::{Template, TemplateDraft, TemplateFilter, TemplateListResponse};

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub template_id: String,
    pub content: String,
}

/// Keep catalog gauges in step with the catalog
pub(crate) fn refresh_catalog_metrics(state: &AppState) {
    let total = state.catalog.count();
    let builtin = state.catalog.builtin_count();
    CatalogMetrics::set_catalog_size(
        builtin,
        total.saturating_sub(builtin),
        state.catalog.version(),
    );
}

/// GET /api/v1/templates - List templates matching the filter
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Json<TemplateListResponse> {
    let snapshot = state.catalog.snapshot();
    let templates = filter.apply(&snapshot.templates);
    let total = templates.len();

    CatalogMetrics::record_query();

    Json(TemplateListResponse {
        templates,
        total,
        version: snapshot.version,
    })
}

/// GET /api/v1/templates/categories - Category labels for the filter control
#[tracing::instrument(name = "http.list_categories", skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.catalog.categories(),
    })
}

/// POST /api/v1/templates - Create a custom template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, draft),
    fields(template_name = %draft.name)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(draft): Json<TemplateDraft>,
) -> Result<(StatusCode, Json<Template>)> {
    let result = state.catalog.create(draft);
    CatalogMetrics::record_mutation("create", result.is_ok());

    let created = result?;
    refresh_catalog_metrics(&state);

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    Ok(Json(state.catalog.get(&id)?))
}

/// PUT /api/v1/templates/{id} - Replace a custom template
#[tracing::instrument(name = "http.update_template", skip(state, draft))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<TemplateDraft>,
) -> Result<Json<Template>> {
    let result = state.catalog.update(&id, draft);
    CatalogMetrics::record_mutation("update", result.is_ok());

    let updated = result?;
    refresh_catalog_metrics(&state);

    Ok(Json(updated))
}

/// DELETE /api/v1/templates/{id} - Delete a custom template (no-op otherwise)
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let removed = state.catalog.delete(&id);
    CatalogMetrics::record_mutation("delete", removed);

    if removed {
        refresh_catalog_metrics(&state);
    }

    StatusCode::NO_CONTENT
}

/// POST /api/v1/templates/{id}/render - Substitute values into a template body
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>> {
    let content = state.catalog.render(&id, &request.values)?;
    CatalogMetrics::record_render();

    Ok(Json(RenderResponse {
        template_id: id,
        content,
    }))
}
