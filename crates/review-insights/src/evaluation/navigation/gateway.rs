use async_trait::async_trait;

use crate::evaluation::domain::{
    Business, BusinessId, BusinessReviews, EvaluationRun, FlagId, QuestionId, QuestionRubric,
    ReviewId, RunDetail, RunId, RunScores, TriggeredRun,
};

/// Read and write collaborators backing the dashboard. Implementations hand back
/// decoded records; transport and retries are their concern, not the engine's.
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    async fn businesses_with_reviews(&self) -> Result<Vec<Business>, GatewayError>;

    async fn business_reviews(
        &self,
        business_id: &BusinessId,
    ) -> Result<BusinessReviews, GatewayError>;

    async fn assessment_runs(&self, review_id: &ReviewId)
        -> Result<Vec<EvaluationRun>, GatewayError>;

    async fn evaluation_run(&self, run_id: &RunId) -> Result<RunDetail, GatewayError>;

    async fn evaluation_scores(&self, run_id: &RunId) -> Result<RunScores, GatewayError>;

    /// `Ok(None)` when the question no longer exists in the question set.
    async fn question_rubric(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<QuestionRubric>, GatewayError>;

    async fn run_evaluation(&self, review_id: &ReviewId) -> Result<TriggeredRun, GatewayError>;

    async fn resolve_flag(&self, flag_id: &FlagId, resolution: &str) -> Result<(), GatewayError>;

    async fn approve_review(&self, review_id: &ReviewId) -> Result<(), GatewayError>;

    async fn revoke_review(&self, review_id: &ReviewId) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("upstream rejected request: {0}")]
    Rejected(String),
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}
