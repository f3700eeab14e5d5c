//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    CATALOG_TEMPLATES, CATALOG_VERSION, NOTES_CREATED_TOTAL, PICKER_SESSIONS_ACTIVE,
    PICKER_SESSIONS_EXPIRED_TOTAL, TEMPLATE_MUTATIONS_TOTAL, TEMPLATE_QUERIES_TOTAL,
    TEMPLATE_RENDERS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording catalog metrics
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record a create/update/delete request and whether it took effect
    pub fn record_mutation(operation: &str, applied: bool) {
        let outcome = if applied { "applied" } else { "rejected" };
        TEMPLATE_MUTATIONS_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn record_query() {
        TEMPLATE_QUERIES_TOTAL.inc();
    }

    pub fn record_render() {
        TEMPLATE_RENDERS_TOTAL.inc();
    }

    /// Refresh catalog size gauges
    pub fn set_catalog_size(builtin: usize, custom: usize, version: u64) {
        CATALOG_TEMPLATES
            .with_label_values(&["builtin"])
            .set(builtin as i64);
        CATALOG_TEMPLATES
            .with_label_values(&["custom"])
            .set(custom as i64);
        CATALOG_VERSION.set(version as i64);
    }
}

/// Helper struct for recording picker metrics
pub struct PickerMetrics;

impl PickerMetrics {
    pub fn set_active_sessions(count: usize) {
        PICKER_SESSIONS_ACTIVE.set(count as i64);
    }

    pub fn record_expired(count: usize) {
        PICKER_SESSIONS_EXPIRED_TOTAL.inc_by(count as u64);
    }

    pub fn record_note_created() {
        NOTES_CREATED_TOTAL.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_metrics() {
        CatalogMetrics::record_query();
        CatalogMetrics::set_catalog_size(3, 1, 5);

        let output = encode_metrics().unwrap();
        assert!(output.contains("ara_templates_queries_total"));
        assert!(output.contains("ara_templates_catalog_templates"));
    }
}
