use serde::Serialize;

use crate::evaluation::domain::{
    FlagId, FlagSeverity, QuestionId, ReviewId, ReviewStats, ReviewStatus, RunId, SourceId,
};
use crate::evaluation::flags::FlagCounts;
use crate::evaluation::interview::InterviewRow;
use crate::evaluation::metrics::{ConfidenceLevel, RunStatusBand, ScoreTier};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub code: String,
    pub display_name: String,
    pub score: f64,
    pub tier: ScoreTier,
    pub tier_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagView {
    pub id: FlagId,
    pub severity: FlagSeverity,
    pub severity_label: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Entry view of a run's detail level.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummaryView {
    pub run_id: RunId,
    pub run_number: u32,
    pub run_status_label: &'static str,
    pub evaluated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluated_at_field: Option<&'static str>,
    pub overall_score: f64,
    pub status_band: RunStatusBand,
    pub status_label: &'static str,
    pub confidence: ConfidenceLevel,
    pub confidence_label: &'static str,
    pub metrics: Vec<MetricEntry>,
    pub flag_counts: FlagCounts,
    pub interview_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricBreakdownEntry {
    #[serde(flatten)]
    pub metric: MetricEntry,
    pub flags: Vec<FlagView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricBreakdownView {
    pub run_id: RunId,
    pub metrics: Vec<MetricBreakdownEntry>,
    pub interviews: Vec<InterviewRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionView {
    pub name: String,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub anchors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub question_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    pub score: f64,
    pub dimensions: Vec<DimensionView>,
    pub checks_passed: usize,
    pub checks_total: usize,
}

/// Single-interview drill-down.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewDetailView {
    pub run_id: RunId,
    pub source_id: SourceId,
    pub source_name: String,
    pub source_type: String,
    pub average_score: f64,
    pub tier: ScoreTier,
    pub metrics: Vec<MetricEntry>,
    pub questions: Vec<QuestionView>,
    pub flags: Vec<FlagView>,
}

/// One assessment row on the business level, dated by its most relevant timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentEntry {
    pub id: ReviewId,
    pub name: String,
    pub status: ReviewStatus,
    pub status_label: &'static str,
    pub stats: ReviewStats,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_field: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentListView {
    pub pending: Vec<AssessmentEntry>,
    pub completed: Vec<AssessmentEntry>,
}
