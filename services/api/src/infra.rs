use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use review_insights::config::DashboardConfig;
use review_insights::error::AppError;
use review_insights::evaluation::domain::{
    Business, BusinessId, BusinessReviews, EvaluationRun, FlagId, QuestionId, QuestionRubric,
    Review, ReviewId, ReviewStatus, RunDetail, RunId, RunScores, RunStatus, TriggeredRun,
};
use review_insights::evaluation::navigation::{GatewayError, ReviewGateway};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Snapshot of the review hierarchy as exported from the evaluation backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReviewFixture {
    #[serde(default)]
    pub(crate) businesses: Vec<Business>,
    #[serde(default)]
    pub(crate) reviews: Vec<Review>,
    #[serde(default)]
    pub(crate) runs: Vec<RunDetail>,
    #[serde(default)]
    pub(crate) scores: HashMap<RunId, RunScores>,
    #[serde(default)]
    pub(crate) rubrics: Vec<QuestionRubric>,
}

/// [`ReviewGateway`] over an in-memory [`ReviewFixture`]. Writes mutate the snapshot only.
#[derive(Debug, Default)]
pub(crate) struct FixtureGateway {
    fixture: RwLock<ReviewFixture>,
}

impl FixtureGateway {
    pub(crate) fn new(fixture: ReviewFixture) -> Self {
        Self {
            fixture: RwLock::new(fixture),
        }
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let fixture: ReviewFixture = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            businesses = fixture.businesses.len(),
            runs = fixture.runs.len(),
            "loaded review fixture"
        );
        Ok(Self::new(fixture))
    }

    pub(crate) fn from_config(config: &DashboardConfig) -> Result<Self, AppError> {
        match &config.fixture_path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ReviewFixture>, GatewayError> {
        self.fixture
            .read()
            .map_err(|_| GatewayError::Unavailable("fixture lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ReviewFixture>, GatewayError> {
        self.fixture
            .write()
            .map_err(|_| GatewayError::Unavailable("fixture lock poisoned".to_string()))
    }
}

fn review_mut<'a>(
    fixture: &'a mut ReviewFixture,
    review_id: &ReviewId,
) -> Result<&'a mut Review, GatewayError> {
    fixture
        .reviews
        .iter_mut()
        .find(|review| &review.id == review_id)
        .ok_or_else(|| GatewayError::NotFound(format!("review {review_id}")))
}

#[async_trait]
impl ReviewGateway for FixtureGateway {
    async fn businesses_with_reviews(&self) -> Result<Vec<Business>, GatewayError> {
        let fixture = self.read()?;
        Ok(fixture
            .businesses
            .iter()
            .filter_map(|business| {
                let owned = fixture
                    .reviews
                    .iter()
                    .filter(|review| review.business_id == business.id);
                let (pending, completed) = owned.fold((0, 0), |(pending, completed), review| {
                    match review.status {
                        ReviewStatus::Approved => (pending, completed + 1),
                        ReviewStatus::Pending | ReviewStatus::Revoked => (pending + 1, completed),
                    }
                });
                (pending + completed > 0).then(|| Business {
                    pending_count: pending,
                    completed_count: completed,
                    ..business.clone()
                })
            })
            .collect())
    }

    async fn business_reviews(
        &self,
        business_id: &BusinessId,
    ) -> Result<BusinessReviews, GatewayError> {
        let fixture = self.read()?;
        let (completed, pending): (Vec<Review>, Vec<Review>) = fixture
            .reviews
            .iter()
            .filter(|review| &review.business_id == business_id)
            .cloned()
            .partition(|review| review.status == ReviewStatus::Approved);
        Ok(BusinessReviews { pending, completed })
    }

    async fn assessment_runs(
        &self,
        review_id: &ReviewId,
    ) -> Result<Vec<EvaluationRun>, GatewayError> {
        let fixture = self.read()?;
        let mut runs: Vec<EvaluationRun> = fixture
            .runs
            .iter()
            .filter(|detail| &detail.run.review_id == review_id)
            .map(|detail| detail.run.clone())
            .collect();
        runs.sort_by_key(|run| run.run_number);
        Ok(runs)
    }

    async fn evaluation_run(&self, run_id: &RunId) -> Result<RunDetail, GatewayError> {
        self.read()?
            .runs
            .iter()
            .find(|detail| &detail.run.id == run_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("run {run_id}")))
    }

    async fn evaluation_scores(&self, run_id: &RunId) -> Result<RunScores, GatewayError> {
        let fixture = self.read()?;
        if !fixture.runs.iter().any(|detail| &detail.run.id == run_id) {
            return Err(GatewayError::NotFound(format!("run {run_id}")));
        }
        Ok(fixture.scores.get(run_id).cloned().unwrap_or_default())
    }

    async fn question_rubric(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<QuestionRubric>, GatewayError> {
        Ok(self
            .read()?
            .rubrics
            .iter()
            .find(|rubric| &rubric.question_id == question_id)
            .cloned())
    }

    async fn run_evaluation(&self, review_id: &ReviewId) -> Result<TriggeredRun, GatewayError> {
        let mut fixture = self.write()?;
        review_mut(&mut fixture, review_id)?;

        let run_number = fixture
            .runs
            .iter()
            .filter(|detail| &detail.run.review_id == review_id)
            .map(|detail| detail.run.run_number)
            .max()
            .unwrap_or(0)
            + 1;
        let run_id = RunId::new(format!("{review_id}-run-{run_number}"));
        fixture.runs.push(RunDetail {
            run: EvaluationRun {
                id: run_id.clone(),
                review_id: review_id.clone(),
                run_number,
                status: RunStatus::Queued,
                created_at: Some(Utc::now()),
                started_at: None,
                completed_at: None,
            },
            sources: Vec::new(),
            flags: Vec::new(),
        });
        Ok(TriggeredRun { run_id })
    }

    async fn resolve_flag(&self, flag_id: &FlagId, resolution: &str) -> Result<(), GatewayError> {
        if resolution.trim().is_empty() {
            return Err(GatewayError::Rejected(
                "a resolution note is required".to_string(),
            ));
        }

        let mut fixture = self.write()?;
        let flag = fixture
            .runs
            .iter_mut()
            .flat_map(|detail| detail.flags.iter_mut())
            .find(|flag| &flag.id == flag_id)
            .ok_or_else(|| GatewayError::NotFound(format!("flag {flag_id}")))?;
        if flag.is_resolved {
            return Err(GatewayError::Rejected(format!(
                "flag {flag_id} is already resolved"
            )));
        }
        flag.is_resolved = true;
        flag.resolution = Some(resolution.trim().to_string());
        Ok(())
    }

    async fn approve_review(&self, review_id: &ReviewId) -> Result<(), GatewayError> {
        let mut fixture = self.write()?;
        let review = review_mut(&mut fixture, review_id)?;
        if review.status == ReviewStatus::Approved {
            return Err(GatewayError::Rejected(format!(
                "review {review_id} is already approved"
            )));
        }
        review.status = ReviewStatus::Approved;
        review.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn revoke_review(&self, review_id: &ReviewId) -> Result<(), GatewayError> {
        let mut fixture = self.write()?;
        let review = review_mut(&mut fixture, review_id)?;
        if review.status != ReviewStatus::Approved {
            return Err(GatewayError::Rejected(format!(
                "review {review_id} is not approved"
            )));
        }
        review.status = ReviewStatus::Revoked;
        review.updated_at = Some(Utc::now());
        Ok(())
    }
}
