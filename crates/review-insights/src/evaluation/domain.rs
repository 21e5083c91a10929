use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier for a client business, the root of the review hierarchy.
    BusinessId
);
opaque_id!(
    /// Identifier for an assessment (review) owned by a business.
    ReviewId
);
opaque_id!(
    /// Identifier for one execution of the evaluation pipeline.
    RunId
);
opaque_id!(
    /// Identifier for a single respondent interview inside a run.
    SourceId
);
opaque_id!(QuestionId);
opaque_id!(FlagId);

/// Business summary as listed on the landing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub pending_count: u32,
    #[serde(default)]
    pub completed_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Revoked,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Revoked => "Revoked",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    #[serde(default)]
    pub submitted: u32,
    #[serde(default)]
    pub invited: u32,
}

/// Assessment belonging to a business. Upstream calls these reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub business_id: BusinessId,
    pub name: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub stats: ReviewStats,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Reviews for one business, split the way the dashboard lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessReviews {
    #[serde(default)]
    pub pending: Vec<Review>,
    #[serde(default)]
    pub completed: Vec<Review>,
}

impl BusinessReviews {
    pub fn find(&self, id: &ReviewId) -> Option<&Review> {
        self.pending
            .iter()
            .chain(self.completed.iter())
            .find(|review| &review.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub id: RunId,
    pub review_id: ReviewId,
    pub run_number: u32,
    pub status: RunStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// One respondent within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub name: String,
    #[serde(default)]
    pub source_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionContribution {
    pub question_id: QuestionId,
    #[serde(default)]
    pub question_code: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Metric record as produced by the evaluation pipeline.
///
/// A missing `source_id` marks a record that was already aggregated across
/// every source of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub id: String,
    pub run_id: RunId,
    #[serde(default)]
    pub source_id: Option<SourceId>,
    pub metric_code: String,
    #[serde(default)]
    pub metric_name: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub question_contributions: Vec<QuestionContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension_name: String,
    pub score: u8,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub anchors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: String,
    pub passed: bool,
    #[serde(default)]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub id: String,
    pub source_id: SourceId,
    pub question_id: QuestionId,
    #[serde(default)]
    pub question_code: Option<String>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub dimension_scores: Vec<DimensionScore>,
    #[serde(default)]
    pub check_results: Vec<CheckResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSeverity {
    Critical,
    Warning,
    Info,
}

impl FlagSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Info => "Info",
        }
    }
}

/// Concern raised against one or more questions and interviews of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub id: FlagId,
    pub severity: FlagSeverity,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_ids: Vec<SourceId>,
    #[serde(default)]
    pub question_ids: Vec<QuestionId>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub resolution: Option<String>,
}

/// Run payload returned by the run detail collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    pub run: EvaluationRun,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub flags: Vec<Flag>,
}

impl RunDetail {
    pub fn source(&self, id: &SourceId) -> Option<&Source> {
        self.sources.iter().find(|source| &source.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunScores {
    #[serde(default)]
    pub metric_scores: Vec<MetricScore>,
    #[serde(default)]
    pub question_scores: Vec<QuestionScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub name: String,
    #[serde(default)]
    pub anchors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRubric {
    pub question_id: QuestionId,
    #[serde(default)]
    pub question_code: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub dimensions: Vec<RubricDimension>,
}

/// Handle returned when a new evaluation run is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredRun {
    pub run_id: RunId,
}
