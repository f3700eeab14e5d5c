//! API layer - HTTP endpoint handlers organized by domain.

mod events;
mod health;
mod metrics;
mod picker;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use events::template_events;
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use picker::{
    close_picker, confirm_picker, get_picker, open_picker, select_template, set_values,
    update_filter, SelectRequest, ValuesRequest,
};
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, list_categories, list_templates,
    render_template, update_template, CategoriesResponse, RenderRequest, RenderResponse,
};
