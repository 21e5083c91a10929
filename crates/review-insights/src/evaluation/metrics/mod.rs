//! Canonical metric catalogue, score banding, and confidence roll-ups.

mod banding;
mod catalog;
mod confidence;

pub use banding::{run_status_band, score_tier, RunStatusBand, ScoreTier};
pub use catalog::{
    canonical_index, display_name, lookup, sort_canonical_by, sort_metrics, MetricDefinition,
    CANONICAL_METRICS, UNKNOWN_METRIC,
};
pub use confidence::{aggregate_confidence, confidence_from_ratio, ConfidenceLevel};
