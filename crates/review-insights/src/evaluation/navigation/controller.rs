use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::evaluation::domain::{
    Business, BusinessId, BusinessReviews, EvaluationRun, FlagId, QuestionId, QuestionRubric,
    ReviewId, RunDetail, RunId, RunScores, TriggeredRun,
};
use crate::evaluation::report::RunReport;

use super::gateway::{GatewayError, ReviewGateway};
use super::state::{
    transition, Level, LoadIntent, NavAction, NavigationError, NavigationState, Transition,
};

/// Failure scoped to the transition or action that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrilldownError {
    #[error("failed to load {what}: {source}")]
    LoadFailure {
        what: &'static str,
        source: GatewayError,
    },
    #[error("{action} failed: {source}")]
    ActionFailure {
        action: &'static str,
        source: GatewayError,
    },
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// Fetches a run's detail and scores concurrently. Either both arrive or neither does.
pub async fn fetch_run<G>(
    gateway: &G,
    run_id: &RunId,
) -> Result<(RunDetail, RunScores), DrilldownError>
where
    G: ReviewGateway + ?Sized,
{
    tokio::try_join!(
        async {
            gateway
                .evaluation_run(run_id)
                .await
                .map_err(load_failure("run detail"))
        },
        async {
            gateway
                .evaluation_scores(run_id)
                .await
                .map_err(load_failure("run scores"))
        },
    )
}

fn load_failure(what: &'static str) -> impl FnOnce(GatewayError) -> DrilldownError {
    move |source| DrilldownError::LoadFailure { what, source }
}

/// Receives every failure the controller surfaces.
pub trait ErrorSink: Send + Sync {
    fn report(&self, error: &DrilldownError);
}

/// Default sink: logs and moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, error: &DrilldownError) {
        warn!(%error, "drill-down operation failed");
    }
}

/// Lists and run payload backing the committed navigation state.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub businesses: Vec<Business>,
    pub reviews: BusinessReviews,
    pub runs: Vec<EvaluationRun>,
    pub run_detail: Option<RunDetail>,
    pub run_scores: Option<RunScores>,
}

/// Result of one load intent, tagged with the entity it was fetched for.
#[derive(Debug, Clone)]
pub enum Loaded {
    Businesses(Vec<Business>),
    Reviews {
        business_id: BusinessId,
        reviews: BusinessReviews,
    },
    Runs {
        review_id: ReviewId,
        runs: Vec<EvaluationRun>,
    },
    Run {
        detail: RunDetail,
        scores: RunScores,
    },
}

impl Loaded {
    /// Whether this result was fetched for the entity `target` has selected.
    pub fn belongs_to(&self, target: &NavigationState) -> bool {
        match self {
            Loaded::Businesses(_) => true,
            Loaded::Reviews { business_id, .. } => {
                target.selected_business().map(|business| &business.id) == Some(business_id)
            }
            Loaded::Runs { review_id, .. } => {
                target.selected_assessment().map(|review| &review.id) == Some(review_id)
            }
            Loaded::Run { detail, .. } => {
                target.selected_run().map(|run| &run.id) == Some(&detail.run.id)
            }
        }
    }
}

/// A transition that has been requested but not yet committed.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    transition: Transition,
}

impl Ticket {
    pub fn target(&self) -> &NavigationState {
        &self.transition.target
    }

    pub fn intents(&self) -> &[LoadIntent] {
        &self.transition.intents
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    /// A newer request targets a different state; the result was dropped.
    Discarded,
}

/// Drives [`transition`] against a [`ReviewGateway`].
///
/// State only moves once every load behind a transition has succeeded, so a failed
/// fetch leaves the dashboard on the last level that loaded.
pub struct DrilldownController<G, S = TracingErrorSink> {
    gateway: Arc<G>,
    errors: Arc<S>,
    state: NavigationState,
    data: DashboardData,
    pending: Option<NavigationState>,
    generation: u64,
}

impl<G> DrilldownController<G, TracingErrorSink>
where
    G: ReviewGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_error_sink(gateway, Arc::new(TracingErrorSink))
    }
}

impl<G, S> DrilldownController<G, S>
where
    G: ReviewGateway,
    S: ErrorSink,
{
    pub fn with_error_sink(gateway: Arc<G>, errors: Arc<S>) -> Self {
        Self {
            gateway,
            errors,
            state: NavigationState::default(),
            data: DashboardData::default(),
            pending: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Views for the selected run, once its detail and scores are loaded.
    pub fn run_report(&self) -> Option<RunReport<'_>> {
        match (&self.data.run_detail, &self.data.run_scores) {
            (Some(detail), Some(scores)) => Some(RunReport::new(detail, scores)),
            _ => None,
        }
    }

    /// Loads the landing list of businesses.
    pub async fn start(&mut self) -> Result<Commit, DrilldownError> {
        self.dispatch(NavAction::JumpTo(Level::Businesses)).await
    }

    pub async fn dispatch(&mut self, action: NavAction) -> Result<Commit, DrilldownError> {
        let ticket = self.begin(action)?;
        let outcome = self.execute(&ticket).await;
        self.complete(ticket, outcome)
    }

    /// Computes the transition and marks its target as the one in flight.
    pub fn begin(&mut self, action: NavAction) -> Result<Ticket, DrilldownError> {
        let action_name = action.name();
        let transition = transition(&self.state, action).map_err(|err| {
            let err = DrilldownError::from(err);
            self.errors.report(&err);
            err
        })?;
        debug!(
            action = action_name,
            from = self.state.level().label(),
            to = transition.target.level().label(),
            "navigation requested"
        );
        Ok(self.issue(transition))
    }

    fn issue(&mut self, transition: Transition) -> Ticket {
        self.generation += 1;
        self.pending = Some(transition.target.clone());
        Ticket {
            generation: self.generation,
            transition,
        }
    }

    /// Runs every load behind a ticket. Nothing is committed here.
    pub async fn execute(&self, ticket: &Ticket) -> Result<Vec<Loaded>, DrilldownError> {
        let mut loaded = Vec::with_capacity(ticket.intents().len());
        for intent in ticket.intents() {
            loaded.push(self.load(intent).await?);
        }
        Ok(loaded)
    }

    async fn load(&self, intent: &LoadIntent) -> Result<Loaded, DrilldownError> {
        let gateway = self.gateway.as_ref();
        match intent {
            LoadIntent::Businesses => gateway
                .businesses_with_reviews()
                .await
                .map(Loaded::Businesses)
                .map_err(load_failure("businesses")),
            LoadIntent::Reviews(business_id) => gateway
                .business_reviews(business_id)
                .await
                .map(|reviews| Loaded::Reviews {
                    business_id: business_id.clone(),
                    reviews,
                })
                .map_err(load_failure("assessments")),
            LoadIntent::Runs(review_id) => gateway
                .assessment_runs(review_id)
                .await
                .map(|runs| Loaded::Runs {
                    review_id: review_id.clone(),
                    runs,
                })
                .map_err(load_failure("evaluation runs")),
            LoadIntent::RunDetail(run_id) => fetch_run(gateway, run_id)
                .await
                .map(|(detail, scores)| Loaded::Run { detail, scores }),
        }
    }

    /// Commits a finished ticket if its target is still the one in flight.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<Loaded>, DrilldownError>,
    ) -> Result<Commit, DrilldownError> {
        if self.pending.as_ref() != Some(ticket.target()) {
            debug!(
                generation = ticket.generation,
                "discarding result for superseded navigation"
            );
            return Ok(Commit::Discarded);
        }
        self.pending = None;

        let loaded = outcome.map_err(|err| {
            self.errors.report(&err);
            err
        })?;
        if !loaded.iter().all(|item| item.belongs_to(ticket.target())) {
            debug!(
                generation = ticket.generation,
                "discarding result fetched for a different selection"
            );
            return Ok(Commit::Discarded);
        }

        for item in loaded {
            self.apply(item);
        }
        self.state = ticket.transition.target;
        if self.state.level() < Level::Detail {
            self.data.run_detail = None;
            self.data.run_scores = None;
        }

        info!(
            generation = ticket.generation,
            level = self.state.level().label(),
            "navigation committed"
        );
        Ok(Commit::Applied)
    }

    fn apply(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Businesses(businesses) => self.data.businesses = businesses,
            Loaded::Reviews { reviews, .. } => self.data.reviews = reviews,
            Loaded::Runs { runs, .. } => self.data.runs = runs,
            Loaded::Run { detail, scores } => {
                self.data.run_detail = Some(detail);
                self.data.run_scores = Some(scores);
            }
        }
    }

    async fn reload(&mut self, intent: LoadIntent) -> Result<Commit, DrilldownError> {
        let ticket = self.issue(Transition::reload(&self.state, intent));
        let outcome = self.execute(&ticket).await;
        self.complete(ticket, outcome)
    }

    fn action_failed(&self, action: &'static str, source: GatewayError) -> DrilldownError {
        let err = DrilldownError::ActionFailure { action, source };
        self.errors.report(&err);
        err
    }

    fn selection<T>(&self, value: Option<T>, what: &'static str) -> Result<T, DrilldownError> {
        value.ok_or_else(|| {
            let err = DrilldownError::Navigation(NavigationError::MissingSelection(what));
            self.errors.report(&err);
            err
        })
    }

    pub async fn approve_review(&mut self, review_id: &ReviewId) -> Result<(), DrilldownError> {
        let business_id = self.selected_business_id()?;
        if let Err(source) = self.gateway.approve_review(review_id).await {
            return Err(self.action_failed("approve review", source));
        }
        info!(review = %review_id, "review approved");
        self.reload(LoadIntent::Reviews(business_id)).await?;
        Ok(())
    }

    pub async fn revoke_review(&mut self, review_id: &ReviewId) -> Result<(), DrilldownError> {
        let business_id = self.selected_business_id()?;
        if let Err(source) = self.gateway.revoke_review(review_id).await {
            return Err(self.action_failed("revoke review", source));
        }
        info!(review = %review_id, "review revoked");
        self.reload(LoadIntent::Reviews(business_id)).await?;
        Ok(())
    }

    /// Resolves a flag, then reloads the owning run so the flag list reflects the server.
    pub async fn resolve_flag(
        &mut self,
        flag_id: &FlagId,
        resolution: &str,
    ) -> Result<(), DrilldownError> {
        let run_id = self.selection(
            self.state.selected_run().map(|run| run.id.clone()),
            "run",
        )?;
        if let Err(source) = self.gateway.resolve_flag(flag_id, resolution).await {
            return Err(self.action_failed("resolve flag", source));
        }
        info!(flag = %flag_id, run = %run_id, "flag resolved");
        self.reload(LoadIntent::RunDetail(run_id)).await?;
        Ok(())
    }

    /// Queues a new evaluation for the selected assessment and refreshes its runs.
    pub async fn trigger_evaluation(&mut self) -> Result<TriggeredRun, DrilldownError> {
        let review_id = self.selection(
            self.state
                .selected_assessment()
                .map(|assessment| assessment.id.clone()),
            "assessment",
        )?;
        let triggered = match self.gateway.run_evaluation(&review_id).await {
            Ok(triggered) => triggered,
            Err(source) => return Err(self.action_failed("trigger evaluation", source)),
        };
        info!(review = %review_id, run = %triggered.run_id, "evaluation triggered");
        self.reload(LoadIntent::Runs(review_id)).await?;
        Ok(triggered)
    }

    /// Rubric for a question, or `None` if it is gone or could not be fetched.
    pub async fn question_rubric(&self, question_id: &QuestionId) -> Option<QuestionRubric> {
        match self.gateway.question_rubric(question_id).await {
            Ok(rubric) => rubric,
            Err(source) => {
                self.errors.report(&DrilldownError::LoadFailure {
                    what: "question rubric",
                    source,
                });
                None
            }
        }
    }

    fn selected_business_id(&self) -> Result<BusinessId, DrilldownError> {
        self.selection(
            self.state
                .selected_business()
                .map(|business| business.id.clone()),
            "business",
        )
    }
}
