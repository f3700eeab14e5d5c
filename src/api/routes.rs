use axum::{
    routing::{get, post, put},
    Router,
};

use crate::server::AppState;

use super::events::template_events;
use super::health::health;
use super::picker::{
    close_picker, confirm_picker, get_picker, open_picker, select_template, set_values,
    update_filter,
};
use super::template::{
    create_template, delete_template, get_template, list_categories, list_templates,
    render_template, update_template,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        .nest(
            "/api/v1",
            Router::new()
                // Catalog
                .route("/templates", get(list_templates).post(create_template))
                .route("/templates/categories", get(list_categories))
                .route("/templates/events", get(template_events))
                .route(
                    "/templates/{id}",
                    get(get_template)
                        .put(update_template)
                        .delete(delete_template),
                )
                .route("/templates/{id}/render", post(render_template))
                // Picker sessions
                .route("/picker", post(open_picker))
                .route("/picker/{id}", get(get_picker).delete(close_picker))
                .route("/picker/{id}/filter", put(update_filter))
                .route("/picker/{id}/select", post(select_template))
                .route("/picker/{id}/values", put(set_values))
                .route("/picker/{id}/confirm", post(confirm_picker)),
        )
}
