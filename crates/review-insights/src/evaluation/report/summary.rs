use crate::evaluation::aggregate::{aggregate_metric_scores, mean_of_aggregated};
use crate::evaluation::domain::{Flag, MetricScore, QuestionScore, RunDetail, RunScores, SourceId};
use crate::evaluation::fields::{format_timestamp, run_timestamp};
use crate::evaluation::flags::{
    flags_for_metric, flags_for_source, order_unresolved_first, FlagCounts,
};
use crate::evaluation::interview::{
    average_score, interview_rows, metrics_for_source, questions_for_source,
};
use crate::evaluation::metrics::{
    aggregate_confidence, display_name, run_status_band, score_tier, sort_metrics,
};

use super::views::{
    DimensionView, FlagView, InterviewDetailView, MetricBreakdownEntry, MetricBreakdownView,
    MetricEntry, QuestionView, RunSummaryView,
};

pub const UNKNOWN_INTERVIEW: &str = "Unknown Interview";
pub const UNKNOWN_QUESTION: &str = "Unknown Question";

/// Derived views over one loaded run. Borrowed, so it is rebuilt after every reload.
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a> {
    detail: &'a RunDetail,
    scores: &'a RunScores,
}

impl<'a> RunReport<'a> {
    pub fn new(detail: &'a RunDetail, scores: &'a RunScores) -> Self {
        Self { detail, scores }
    }

    fn aggregated_metrics(&self) -> Vec<MetricScore> {
        let mut metrics = aggregate_metric_scores(&self.scores.metric_scores);
        sort_metrics(&mut metrics);
        metrics
    }

    pub fn summary(&self) -> RunSummaryView {
        let run = &self.detail.run;
        let metrics = self.aggregated_metrics();
        let overall_score = mean_of_aggregated(&metrics);
        let confidence = aggregate_confidence(
            metrics
                .iter()
                .map(|metric| metric.confidence.as_deref().unwrap_or_default()),
        );
        let status_band = run_status_band(overall_score);
        let timestamp = run_timestamp(run);

        RunSummaryView {
            run_id: run.id.clone(),
            run_number: run.run_number,
            run_status_label: run.status.label(),
            evaluated_at_field: timestamp.field(),
            evaluated_at: format_timestamp(timestamp),
            overall_score,
            status_band,
            status_label: status_band.label(),
            confidence,
            confidence_label: confidence.label(),
            metrics: metrics.iter().map(metric_entry).collect(),
            flag_counts: FlagCounts::tally(&self.detail.flags),
            interview_count: self.detail.sources.len(),
        }
    }

    pub fn breakdown(&self) -> MetricBreakdownView {
        let metrics = self
            .aggregated_metrics()
            .iter()
            .map(|metric| MetricBreakdownEntry {
                metric: metric_entry(metric),
                flags: flag_views(flags_for_metric(&self.detail.flags, metric)),
            })
            .collect();

        MetricBreakdownView {
            run_id: self.detail.run.id.clone(),
            metrics,
            interviews: interview_rows(
                &self.detail.sources,
                &self.scores.metric_scores,
                &self.detail.flags,
            ),
        }
    }

    /// Never fails: an interview absent from the run renders with placeholder metadata
    /// and empty score lists.
    pub fn interview(&self, source_id: &SourceId) -> InterviewDetailView {
        let mut metrics = metrics_for_source(&self.scores.metric_scores, source_id);
        sort_metrics(&mut metrics);
        let average = average_score(&metrics);

        let (source_name, source_type) = match self.detail.source(source_id) {
            Some(source) => (source.name.clone(), source.source_type.clone()),
            None => (UNKNOWN_INTERVIEW.to_string(), String::new()),
        };

        InterviewDetailView {
            run_id: self.detail.run.id.clone(),
            source_id: source_id.clone(),
            source_name,
            source_type,
            average_score: average,
            tier: score_tier(average),
            metrics: metrics.iter().map(metric_entry).collect(),
            questions: questions_for_source(&self.scores.question_scores, source_id)
                .iter()
                .map(question_view)
                .collect(),
            flags: flag_views(flags_for_source(&self.detail.flags, source_id)),
        }
    }
}

fn metric_entry(metric: &MetricScore) -> MetricEntry {
    let score = metric.overall_score.unwrap_or(0.0);
    let tier = score_tier(score);
    MetricEntry {
        code: metric.metric_code.clone(),
        display_name: display_name(&metric.metric_code, metric.metric_name.as_deref()),
        score,
        tier,
        tier_label: tier.label(),
        confidence: metric.confidence.clone(),
    }
}

fn flag_views(flags: Vec<&Flag>) -> Vec<FlagView> {
    order_unresolved_first(flags)
        .into_iter()
        .map(|flag| FlagView {
            id: flag.id.clone(),
            severity: flag.severity,
            severity_label: flag.severity.label(),
            title: flag.title.clone(),
            description: flag.description.clone(),
            is_resolved: flag.is_resolved,
            resolution: flag.resolution.clone(),
        })
        .collect()
}

fn question_view(question: &QuestionScore) -> QuestionView {
    let question_code = question
        .question_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(UNKNOWN_QUESTION)
        .to_string();

    QuestionView {
        question_id: question.question_id.clone(),
        question_code,
        question_text: question.question_text.clone(),
        score: question.overall_score.unwrap_or(0.0),
        dimensions: question
            .dimension_scores
            .iter()
            .map(|dimension| DimensionView {
                name: dimension.dimension_name.clone(),
                score: dimension.score,
                reasoning: dimension.reasoning.clone(),
                anchors: dimension.anchors.clone(),
            })
            .collect(),
        checks_passed: question
            .check_results
            .iter()
            .filter(|check| check.passed)
            .count(),
        checks_total: question.check_results.len(),
    }
}
