use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::evaluation::domain::{
    Business, BusinessId, BusinessReviews, DimensionScore, EvaluationRun, Flag, FlagId,
    FlagSeverity, MetricScore, QuestionContribution, QuestionId, QuestionRubric, QuestionScore,
    Review, ReviewId, ReviewStats, ReviewStatus, RunDetail, RunId, RunScores, RunStatus, Source,
    SourceId, TriggeredRun,
};
use crate::evaluation::navigation::{
    DrilldownController, DrilldownError, ErrorSink, GatewayError, ReviewGateway,
};

pub(crate) fn business(id: &str, name: &str) -> Business {
    Business {
        id: BusinessId::new(id),
        name: name.to_string(),
        pending_count: 1,
        completed_count: 0,
    }
}

pub(crate) fn review(id: &str, business_id: &str) -> Review {
    Review {
        id: ReviewId::new(id),
        business_id: BusinessId::new(business_id),
        name: format!("Assessment {id}"),
        status: ReviewStatus::Pending,
        stats: ReviewStats {
            submitted: 2,
            invited: 3,
        },
        created_at: None,
        updated_at: None,
        submitted_at: None,
    }
}

pub(crate) fn run(id: &str, review_id: &str, run_number: u32) -> EvaluationRun {
    EvaluationRun {
        id: RunId::new(id),
        review_id: ReviewId::new(review_id),
        run_number,
        status: RunStatus::Completed,
        created_at: Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).single(),
        started_at: None,
        completed_at: None,
    }
}

fn source(id: &str, name: &str) -> Source {
    Source {
        id: SourceId::new(id),
        name: name.to_string(),
        source_type: "candidate".to_string(),
    }
}

fn flag(id: &str, severity: FlagSeverity, source: &str, question: &str, resolved: bool) -> Flag {
    Flag {
        id: FlagId::new(id),
        severity,
        title: format!("Flag {id}"),
        description: None,
        source_ids: vec![SourceId::new(source)],
        question_ids: vec![QuestionId::new(question)],
        is_resolved: resolved,
        resolution: resolved.then(|| "reviewed".to_string()),
    }
}

fn metric(run_id: &str, source: &str, code: &str, score: f64, question: &str) -> MetricScore {
    MetricScore {
        id: format!("{run_id}-{source}-{code}"),
        run_id: RunId::new(run_id),
        source_id: Some(SourceId::new(source)),
        metric_code: code.to_string(),
        metric_name: None,
        overall_score: Some(score),
        confidence: Some("high".to_string()),
        question_contributions: vec![QuestionContribution {
            question_id: QuestionId::new(question),
            question_code: None,
            weight: Some(1.0),
        }],
    }
}

fn question(source: &str, question_id: &str, code: Option<&str>, score: f64) -> QuestionScore {
    QuestionScore {
        id: format!("{source}-{question_id}"),
        source_id: SourceId::new(source),
        question_id: QuestionId::new(question_id),
        question_code: code.map(str::to_string),
        question_text: Some("Tell us about a time you changed course.".to_string()),
        overall_score: Some(score),
        dimension_scores: vec![DimensionScore {
            dimension_name: "Specificity".to_string(),
            score: 4,
            reasoning: Some("Concrete example with outcome".to_string()),
            anchors: Vec::new(),
        }],
        check_results: Vec::new(),
    }
}

pub(crate) fn run_detail(run_id: &str) -> RunDetail {
    RunDetail {
        run: run(run_id, "rev-1", 1),
        sources: vec![source("src-a", "Avery"), source("src-b", "Blake")],
        flags: vec![
            flag("flag-1", FlagSeverity::Critical, "src-a", "q-1", false),
            flag("flag-2", FlagSeverity::Info, "src-b", "q-2", true),
        ],
    }
}

pub(crate) fn run_scores(run_id: &str) -> RunScores {
    RunScores {
        metric_scores: vec![
            metric(run_id, "src-a", "EMPATHY", 80.0, "q-1"),
            metric(run_id, "src-b", "EMPATHY", 60.0, "q-1"),
            metric(run_id, "src-a", "ADAPTABILITY", 70.0, "q-2"),
            metric(run_id, "src-b", "ADAPTABILITY", 90.0, "q-2"),
        ],
        question_scores: vec![
            question("src-a", "q-1", Some("Q1"), 4.0),
            question("src-a", "q-2", None, 3.0),
            question("src-b", "q-1", Some("Q1"), 2.0),
        ],
    }
}

/// In-memory gateway recording every call and failing on request.
#[derive(Default)]
pub(crate) struct FakeGateway {
    businesses: Vec<Business>,
    reviews: HashMap<BusinessId, BusinessReviews>,
    runs: Mutex<HashMap<ReviewId, Vec<EvaluationRun>>>,
    details: Mutex<HashMap<RunId, RunDetail>>,
    scores: HashMap<RunId, RunScores>,
    rubrics: HashMap<QuestionId, QuestionRubric>,
    approved: Mutex<HashSet<ReviewId>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeGateway {
    pub(crate) fn seeded() -> Self {
        let mut gateway = Self {
            businesses: vec![business("biz-1", "Acme"), business("biz-2", "Globex")],
            ..Self::default()
        };
        gateway.reviews.insert(
            BusinessId::new("biz-1"),
            BusinessReviews {
                pending: vec![review("rev-1", "biz-1")],
                completed: Vec::new(),
            },
        );
        gateway.reviews.insert(
            BusinessId::new("biz-2"),
            BusinessReviews {
                pending: vec![review("rev-9", "biz-2")],
                completed: Vec::new(),
            },
        );
        gateway.runs.lock().expect("runs mutex").insert(
            ReviewId::new("rev-1"),
            vec![run("run-1", "rev-1", 1), run("run-2", "rev-1", 2)],
        );
        gateway
            .details
            .lock()
            .expect("details mutex")
            .insert(RunId::new("run-1"), run_detail("run-1"));
        gateway
            .scores
            .insert(RunId::new("run-1"), run_scores("run-1"));
        gateway.rubrics.insert(
            QuestionId::new("q-1"),
            QuestionRubric {
                question_id: QuestionId::new("q-1"),
                question_code: Some("Q1".to_string()),
                prompt: "Tell us about a time you changed course.".to_string(),
                dimensions: Vec::new(),
            },
        );
        gateway
    }

    pub(crate) fn fail(&self, operation: &'static str) {
        self.failing.lock().expect("failing mutex").insert(operation);
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .expect("calls mutex")
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub(crate) fn is_approved(&self, id: &ReviewId) -> bool {
        self.approved.lock().expect("approved mutex").contains(id)
    }

    fn record(&self, operation: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().expect("calls mutex").push(operation);
        if self.failing.lock().expect("failing mutex").contains(operation) {
            return Err(GatewayError::Unavailable(format!("{operation} offline")));
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewGateway for FakeGateway {
    async fn businesses_with_reviews(&self) -> Result<Vec<Business>, GatewayError> {
        self.record("businesses")?;
        Ok(self.businesses.clone())
    }

    async fn business_reviews(
        &self,
        business_id: &BusinessId,
    ) -> Result<BusinessReviews, GatewayError> {
        self.record("reviews")?;
        Ok(self.reviews.get(business_id).cloned().unwrap_or_default())
    }

    async fn assessment_runs(
        &self,
        review_id: &ReviewId,
    ) -> Result<Vec<EvaluationRun>, GatewayError> {
        self.record("runs")?;
        Ok(self
            .runs
            .lock()
            .expect("runs mutex")
            .get(review_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn evaluation_run(&self, run_id: &RunId) -> Result<RunDetail, GatewayError> {
        self.record("run_detail")?;
        self.details
            .lock()
            .expect("details mutex")
            .get(run_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("run {run_id}")))
    }

    async fn evaluation_scores(&self, run_id: &RunId) -> Result<RunScores, GatewayError> {
        self.record("run_scores")?;
        Ok(self.scores.get(run_id).cloned().unwrap_or_default())
    }

    async fn question_rubric(
        &self,
        question_id: &QuestionId,
    ) -> Result<Option<QuestionRubric>, GatewayError> {
        self.record("rubric")?;
        Ok(self.rubrics.get(question_id).cloned())
    }

    async fn run_evaluation(&self, review_id: &ReviewId) -> Result<TriggeredRun, GatewayError> {
        self.record("run_evaluation")?;
        let mut runs = self.runs.lock().expect("runs mutex");
        let entry = runs.entry(review_id.clone()).or_default();
        let run_number = entry.len() as u32 + 1;
        let run_id = RunId::new(format!("run-{run_number}"));
        let mut queued = run(run_id.as_str(), review_id.as_str(), run_number);
        queued.status = RunStatus::Queued;
        entry.push(queued);
        Ok(TriggeredRun { run_id })
    }

    async fn resolve_flag(&self, flag_id: &FlagId, resolution: &str) -> Result<(), GatewayError> {
        self.record("resolve_flag")?;
        let mut details = self.details.lock().expect("details mutex");
        let flag = details
            .values_mut()
            .flat_map(|detail| detail.flags.iter_mut())
            .find(|flag| &flag.id == flag_id)
            .ok_or_else(|| GatewayError::NotFound(format!("flag {flag_id}")))?;
        flag.is_resolved = true;
        flag.resolution = Some(resolution.to_string());
        Ok(())
    }

    async fn approve_review(&self, review_id: &ReviewId) -> Result<(), GatewayError> {
        self.record("approve")?;
        self.approved
            .lock()
            .expect("approved mutex")
            .insert(review_id.clone());
        Ok(())
    }

    async fn revoke_review(&self, review_id: &ReviewId) -> Result<(), GatewayError> {
        self.record("revoke")?;
        self.approved.lock().expect("approved mutex").remove(review_id);
        Ok(())
    }
}

/// Error sink that keeps every reported failure for assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    errors: Mutex<Vec<DrilldownError>>,
}

impl RecordingSink {
    pub(crate) fn errors(&self) -> Vec<DrilldownError> {
        self.errors.lock().expect("sink mutex").clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, error: &DrilldownError) {
        self.errors.lock().expect("sink mutex").push(error.clone());
    }
}

pub(crate) type TestController = DrilldownController<FakeGateway, RecordingSink>;

pub(crate) fn controller() -> (TestController, Arc<FakeGateway>, Arc<RecordingSink>) {
    let gateway = Arc::new(FakeGateway::seeded());
    let sink = Arc::new(RecordingSink::default());
    let controller = DrilldownController::with_error_sink(gateway.clone(), sink.clone());
    (controller, gateway, sink)
}
