//! Cross-source roll-up of metric records for a single run.

use std::collections::{HashMap, HashSet};

use super::domain::MetricScore;

/// Collapses a run's metric records into one record per `metric_code`.
///
/// Pre-aggregated records (no `source_id`) win outright: when any exist they are
/// returned deduplicated with the first record per code kept. Otherwise per-source
/// records are averaged per code, a missing score counting as 0, and the first member
/// of each group supplies the name and confidence. Output follows first-seen order.
pub fn aggregate_metric_scores(records: &[MetricScore]) -> Vec<MetricScore> {
    let (pre_aggregated, per_source): (Vec<&MetricScore>, Vec<&MetricScore>) =
        records.iter().partition(|record| record.source_id.is_none());

    if !pre_aggregated.is_empty() {
        return dedupe_keep_first(pre_aggregated);
    }

    average_per_code(per_source)
}

fn dedupe_keep_first(records: Vec<&MetricScore>) -> Vec<MetricScore> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.metric_code.as_str()))
        .cloned()
        .collect()
}

struct MetricGroup<'a> {
    first: &'a MetricScore,
    total: f64,
    count: usize,
}

fn average_per_code(records: Vec<&MetricScore>) -> Vec<MetricScore> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, MetricGroup<'_>> = HashMap::new();

    for record in records {
        let code = record.metric_code.as_str();
        let score = record.overall_score.unwrap_or(0.0);
        match groups.get_mut(code) {
            Some(group) => {
                group.total += score;
                group.count += 1;
            }
            None => {
                order.push(code);
                groups.insert(
                    code,
                    MetricGroup {
                        first: record,
                        total: score,
                        count: 1,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|code| groups.remove(code))
        .map(synthesize)
        .collect()
}

fn synthesize(group: MetricGroup<'_>) -> MetricScore {
    let first = group.first;
    MetricScore {
        id: format!("agg-{}", first.metric_code),
        run_id: first.run_id.clone(),
        source_id: None,
        metric_code: first.metric_code.clone(),
        metric_name: first.metric_name.clone(),
        overall_score: Some(group.total / group.count as f64),
        confidence: first.confidence.clone(),
        question_contributions: first.question_contributions.clone(),
    }
}

/// Mean of the aggregated metric scores for a run; 0 when there is nothing to average.
pub fn overall_score(records: &[MetricScore]) -> f64 {
    mean_of_aggregated(&aggregate_metric_scores(records))
}

/// Overall score of records that are already one per code.
pub(crate) fn mean_of_aggregated(aggregated: &[MetricScore]) -> f64 {
    mean(aggregated.iter().map(|record| record.overall_score.unwrap_or(0.0)))
}

pub(crate) fn mean<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(total, count), score| (total + score, count + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
