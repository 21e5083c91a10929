use serde::Serialize;

use crate::evaluation::domain::{
    Business, BusinessId, EvaluationRun, Review, ReviewId, RunId, SourceId,
};

/// Top-level drill-down levels, ordered from the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Businesses,
    Assessments,
    Runs,
    Detail,
}

impl Level {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Businesses => "businesses",
            Self::Assessments => "assessments",
            Self::Runs => "runs",
            Self::Detail => "detail",
        }
    }
}

/// Views nested inside [`Level::Detail`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailSubLevel {
    #[default]
    Summary,
    Breakdown,
    Interview,
}

/// The dashboard's view cursor.
///
/// Constructed only by [`NavigationState::default`] and [`transition`], which keep
/// the selection chain consistent: an assessment implies a business, a run implies an
/// assessment, and a selected interview implies the interview sub-level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    level: Level,
    selected_business: Option<Business>,
    selected_assessment: Option<Review>,
    selected_run: Option<EvaluationRun>,
    detail_sub_level: DetailSubLevel,
    selected_source_id: Option<SourceId>,
}

impl NavigationState {
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn selected_business(&self) -> Option<&Business> {
        self.selected_business.as_ref()
    }

    pub fn selected_assessment(&self) -> Option<&Review> {
        self.selected_assessment.as_ref()
    }

    pub fn selected_run(&self) -> Option<&EvaluationRun> {
        self.selected_run.as_ref()
    }

    pub fn detail_sub_level(&self) -> DetailSubLevel {
        self.detail_sub_level
    }

    pub fn selected_source_id(&self) -> Option<&SourceId> {
        self.selected_source_id.as_ref()
    }

    pub fn is_consistent(&self) -> bool {
        let assessment_ok = self.selected_assessment.is_none() || self.selected_business.is_some();
        let run_ok = self.selected_run.is_none() || self.selected_assessment.is_some();
        let source_ok = self.selected_source_id.is_none()
            || self.detail_sub_level == DetailSubLevel::Interview;
        assessment_ok && run_ok && source_ok
    }

    /// Trail from the root to the current level, one crumb per selection.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            level: Level::Businesses,
            label: "Businesses".to_string(),
        }];
        if let Some(business) = &self.selected_business {
            crumbs.push(Breadcrumb {
                level: Level::Assessments,
                label: business.name.clone(),
            });
        }
        if let Some(assessment) = &self.selected_assessment {
            crumbs.push(Breadcrumb {
                level: Level::Runs,
                label: assessment.name.clone(),
            });
        }
        if let Some(run) = &self.selected_run {
            crumbs.push(Breadcrumb {
                level: Level::Detail,
                label: format!("Run #{}", run.run_number),
            });
        }
        crumbs
    }

    fn at_businesses() -> Self {
        Self::default()
    }

    fn at_assessments(business: Business) -> Self {
        Self {
            level: Level::Assessments,
            selected_business: Some(business),
            ..Self::default()
        }
    }

    fn at_runs(business: Business, assessment: Review) -> Self {
        Self {
            level: Level::Runs,
            selected_business: Some(business),
            selected_assessment: Some(assessment),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub level: Level,
    pub label: String,
}

/// User intents the controller understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    SelectBusiness(Business),
    SelectAssessment(Review),
    SelectRun(EvaluationRun),
    GoToBreakdown,
    GoToInterview(SourceId),
    GoBack,
    /// Breadcrumb jump. Always re-fetches the list shown at that level.
    JumpTo(Level),
}

impl NavAction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectBusiness(_) => "select_business",
            Self::SelectAssessment(_) => "select_assessment",
            Self::SelectRun(_) => "select_run",
            Self::GoToBreakdown => "go_to_breakdown",
            Self::GoToInterview(_) => "go_to_interview",
            Self::GoBack => "go_back",
            Self::JumpTo(_) => "jump_to",
        }
    }
}

/// Data fetch required before a transition can be committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LoadIntent {
    Businesses,
    Reviews(BusinessId),
    Runs(ReviewId),
    /// Run detail and scores, fetched together and committed together.
    RunDetail(RunId),
}

/// Target state plus the loads that must succeed before it becomes current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub target: NavigationState,
    pub intents: Vec<LoadIntent>,
}

impl Transition {
    fn to(target: NavigationState, intents: Vec<LoadIntent>) -> Self {
        Self { target, intents }
    }

    /// Stay where we are and refresh one collection.
    pub fn reload(state: &NavigationState, intent: LoadIntent) -> Self {
        Self::to(state.clone(), vec![intent])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("cannot {action} from the {} level", .level.label())]
    InvalidTransition { action: &'static str, level: Level },
    #[error("cannot jump to the {} level through a breadcrumb", .0.label())]
    InvalidJump(Level),
    #[error("navigation state has no selected {0}")]
    MissingSelection(&'static str),
}

fn invalid(action: &NavAction, state: &NavigationState) -> NavigationError {
    NavigationError::InvalidTransition {
        action: action.name(),
        level: state.level,
    }
}

fn require<T: Clone>(value: Option<&T>, what: &'static str) -> Result<T, NavigationError> {
    value.cloned().ok_or(NavigationError::MissingSelection(what))
}

/// Pure transition function. Side effects are returned as [`LoadIntent`]s.
pub fn transition(
    state: &NavigationState,
    action: NavAction,
) -> Result<Transition, NavigationError> {
    use DetailSubLevel::{Breakdown, Interview, Summary};

    match (state.level, state.detail_sub_level, &action) {
        (Level::Businesses, _, NavAction::SelectBusiness(business)) => {
            let intent = LoadIntent::Reviews(business.id.clone());
            Ok(Transition::to(
                NavigationState::at_assessments(business.clone()),
                vec![intent],
            ))
        }
        (Level::Assessments, _, NavAction::SelectAssessment(assessment)) => {
            let business = require(state.selected_business(), "business")?;
            let intent = LoadIntent::Runs(assessment.id.clone());
            Ok(Transition::to(
                NavigationState::at_runs(business, assessment.clone()),
                vec![intent],
            ))
        }
        (Level::Runs, _, NavAction::SelectRun(run)) => {
            let business = require(state.selected_business(), "business")?;
            let assessment = require(state.selected_assessment(), "assessment")?;
            let target = NavigationState {
                level: Level::Detail,
                selected_run: Some(run.clone()),
                detail_sub_level: Summary,
                selected_source_id: None,
                ..NavigationState::at_runs(business, assessment)
            };
            Ok(Transition::to(target, vec![LoadIntent::RunDetail(run.id.clone())]))
        }
        (Level::Detail, Summary, NavAction::GoToBreakdown) => {
            let target = NavigationState {
                detail_sub_level: Breakdown,
                ..state.clone()
            };
            Ok(Transition::to(target, Vec::new()))
        }
        (Level::Detail, Breakdown, NavAction::GoToInterview(source_id)) => {
            let target = NavigationState {
                detail_sub_level: Interview,
                selected_source_id: Some(source_id.clone()),
                ..state.clone()
            };
            Ok(Transition::to(target, Vec::new()))
        }
        (Level::Detail, Interview, NavAction::GoBack) => {
            let target = NavigationState {
                detail_sub_level: Breakdown,
                selected_source_id: None,
                ..state.clone()
            };
            Ok(Transition::to(target, Vec::new()))
        }
        (Level::Detail, Breakdown, NavAction::GoBack) => {
            let target = NavigationState {
                detail_sub_level: Summary,
                ..state.clone()
            };
            Ok(Transition::to(target, Vec::new()))
        }
        (Level::Detail, Summary, NavAction::GoBack) => jump_to_runs(state),
        (Level::Runs, _, NavAction::GoBack) => jump_to_assessments(state),
        (Level::Assessments, _, NavAction::GoBack) => Ok(jump_to_businesses()),
        (_, _, NavAction::JumpTo(level)) => match level {
            Level::Businesses => Ok(jump_to_businesses()),
            Level::Assessments if state.level >= Level::Assessments => jump_to_assessments(state),
            Level::Runs if state.level >= Level::Runs => jump_to_runs(state),
            Level::Assessments | Level::Runs | Level::Detail => {
                Err(NavigationError::InvalidJump(*level))
            }
        },
        _ => Err(invalid(&action, state)),
    }
}

fn jump_to_businesses() -> Transition {
    Transition::to(NavigationState::at_businesses(), vec![LoadIntent::Businesses])
}

fn jump_to_assessments(state: &NavigationState) -> Result<Transition, NavigationError> {
    let business = require(state.selected_business(), "business")?;
    let intent = LoadIntent::Reviews(business.id.clone());
    Ok(Transition::to(
        NavigationState::at_assessments(business),
        vec![intent],
    ))
}

fn jump_to_runs(state: &NavigationState) -> Result<Transition, NavigationError> {
    let business = require(state.selected_business(), "business")?;
    let assessment = require(state.selected_assessment(), "assessment")?;
    let intent = LoadIntent::Runs(assessment.id.clone());
    Ok(Transition::to(
        NavigationState::at_runs(business, assessment),
        vec![intent],
    ))
}
