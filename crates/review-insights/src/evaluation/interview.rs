//! Narrowing run-wide score lists down to a single interview.

use std::collections::HashSet;

use serde::Serialize;

use super::aggregate::mean;
use super::domain::{Flag, MetricScore, QuestionScore, Source, SourceId};
use super::flags::flags_for_source;

/// Metric records for exactly `source_id`, first record per `metric_code` kept.
pub fn metrics_for_source(records: &[MetricScore], source_id: &SourceId) -> Vec<MetricScore> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .filter(|record| record.source_id.as_ref() == Some(source_id))
        .filter(|record| seen.insert(record.metric_code.as_str()))
        .cloned()
        .collect()
}

/// Question records for exactly `source_id`, first record per `question_id` kept.
pub fn questions_for_source(records: &[QuestionScore], source_id: &SourceId) -> Vec<QuestionScore> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| &record.source_id == source_id)
        .filter(|record| seen.insert(&record.question_id))
        .cloned()
        .collect()
}

/// Mean `overall_score` of the given metric records; 0 for an empty slice.
pub fn average_score(records: &[MetricScore]) -> f64 {
    mean(records.iter().map(|record| record.overall_score.unwrap_or(0.0)))
}

/// One line of the per-interview table on the breakdown view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewRow {
    pub source_id: SourceId,
    pub name: String,
    pub source_type: String,
    pub average_score: f64,
    pub metric_count: usize,
    pub unresolved_flags: usize,
}

pub fn interview_rows(
    sources: &[Source],
    metrics: &[MetricScore],
    flags: &[Flag],
) -> Vec<InterviewRow> {
    sources
        .iter()
        .map(|source| {
            let own_metrics = metrics_for_source(metrics, &source.id);
            let unresolved_flags = flags_for_source(flags, &source.id)
                .into_iter()
                .filter(|flag| !flag.is_resolved)
                .count();
            InterviewRow {
                source_id: source.id.clone(),
                name: source.name.clone(),
                source_type: source.source_type.clone(),
                average_score: average_score(&own_metrics),
                metric_count: own_metrics.len(),
                unresolved_flags,
            }
        })
        .collect()
}
