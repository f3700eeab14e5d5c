//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog: CatalogHealthResponse,
    pub picker: PickerHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct CatalogHealthResponse {
    pub templates: usize,
    pub builtin: usize,
    pub custom: usize,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct PickerHealthResponse {
    pub active_sessions: usize,
    pub max_sessions: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let templates = state.catalog.count();
    let builtin = state.catalog.builtin_count();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        catalog: CatalogHealthResponse {
            templates,
            builtin,
            custom: templates.saturating_sub(builtin),
            version: state.catalog.version(),
        },
        picker: PickerHealthResponse {
            active_sessions: state.pickers.count(),
            max_sessions: state.settings.picker.max_sessions,
        },
    })
}
