pub mod aggregate;
pub mod domain;
pub mod fields;
pub mod flags;
pub mod interview;
pub mod metrics;
pub mod navigation;
pub mod report;
pub mod router;

pub use aggregate::{aggregate_metric_scores, overall_score};
pub use domain::{
    Business, BusinessId, BusinessReviews, CheckResult, DimensionScore, EvaluationRun, Flag,
    FlagId, FlagSeverity, MetricScore, QuestionContribution, QuestionId, QuestionRubric,
    QuestionScore, Review, ReviewId, ReviewStats, ReviewStatus, RubricDimension, RunDetail, RunId,
    RunScores, RunStatus, Source, SourceId, TriggeredRun,
};
pub use navigation::{DrilldownController, NavAction, NavigationState, ReviewGateway};
pub use report::RunReport;
pub use router::review_router;
