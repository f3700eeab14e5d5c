//! Prometheus metrics for the template service.
//!
//! - Catalog metrics (templates by kind, mutations by operation)
//! - Query and render counters
//! - Picker session metrics

mod helpers;

pub use helpers::{encode_metrics, CatalogMetrics, PickerMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "ara_templates";

lazy_static! {
    // ============================================================================
    // Catalog Metrics
    // ============================================================================

    /// Templates in the catalog by kind (builtin/custom)
    pub static ref CATALOG_TEMPLATES: IntGaugeVec = register_int_gauge_vec!(
        format!("{}_catalog_templates", METRIC_PREFIX),
        "Number of templates in the catalog",
        &["kind"]
    ).unwrap();

    /// Catalog version
    pub static ref CATALOG_VERSION: IntGauge = register_int_gauge!(
        format!("{}_catalog_version", METRIC_PREFIX),
        "Current catalog version"
    ).unwrap();

    /// Catalog mutations by operation and outcome
    pub static ref TEMPLATE_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_mutations_total", METRIC_PREFIX),
        "Total catalog mutation requests",
        &["operation", "outcome"]
    ).unwrap();

    /// Filter queries served
    pub static ref TEMPLATE_QUERIES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_queries_total", METRIC_PREFIX),
        "Total template filter queries"
    ).unwrap();

    /// Template renders (previews and confirmed notes)
    pub static ref TEMPLATE_RENDERS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template renders"
    ).unwrap();

    // ============================================================================
    // Picker Metrics
    // ============================================================================

    /// Open picker sessions
    pub static ref PICKER_SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_picker_sessions_active", METRIC_PREFIX),
        "Number of open picker sessions"
    ).unwrap();

    /// Picker sessions expired by the sweeper
    pub static ref PICKER_SESSIONS_EXPIRED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_picker_sessions_expired_total", METRIC_PREFIX),
        "Total picker sessions discarded after idling"
    ).unwrap();

    /// Notes created through the picker
    pub static ref NOTES_CREATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_notes_created_total", METRIC_PREFIX),
        "Total notes created from templates"
    ).unwrap();
}
