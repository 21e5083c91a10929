use super::common::*;
use crate::evaluation::domain::SourceId;
use crate::evaluation::navigation::{
    transition, DetailSubLevel, Level, LoadIntent, NavAction, NavigationError, NavigationState,
};

fn step(state: &NavigationState, action: NavAction) -> (NavigationState, Vec<LoadIntent>) {
    let transition = transition(state, action).expect("transition allowed");
    assert!(transition.target.is_consistent());
    (transition.target, transition.intents)
}

fn at_summary() -> NavigationState {
    let (state, _) = step(
        &NavigationState::default(),
        NavAction::SelectBusiness(business("biz-1", "Acme")),
    );
    let (state, _) = step(&state, NavAction::SelectAssessment(review("rev-1", "biz-1")));
    let (state, _) = step(&state, NavAction::SelectRun(run("run-1", "rev-1", 1)));
    state
}

#[test]
fn forward_path_requests_one_load_per_level() {
    let initial = NavigationState::default();
    assert_eq!(initial.level(), Level::Businesses);

    let (state, intents) = step(
        &initial,
        NavAction::SelectBusiness(business("biz-1", "Acme")),
    );
    assert_eq!(state.level(), Level::Assessments);
    assert_eq!(intents, vec![LoadIntent::Reviews("biz-1".into())]);

    let (state, intents) = step(&state, NavAction::SelectAssessment(review("rev-1", "biz-1")));
    assert_eq!(state.level(), Level::Runs);
    assert_eq!(intents, vec![LoadIntent::Runs("rev-1".into())]);

    let (state, intents) = step(&state, NavAction::SelectRun(run("run-1", "rev-1", 1)));
    assert_eq!(state.level(), Level::Detail);
    assert_eq!(state.detail_sub_level(), DetailSubLevel::Summary);
    assert_eq!(state.selected_source_id(), None);
    assert_eq!(intents, vec![LoadIntent::RunDetail("run-1".into())]);
}

#[test]
fn detail_sub_levels_reuse_loaded_data() {
    let summary = at_summary();

    let (breakdown, intents) = step(&summary, NavAction::GoToBreakdown);
    assert!(intents.is_empty());
    assert_eq!(breakdown.detail_sub_level(), DetailSubLevel::Breakdown);

    let (interview, intents) = step(&breakdown, NavAction::GoToInterview(SourceId::new("src-a")));
    assert!(intents.is_empty());
    assert_eq!(interview.detail_sub_level(), DetailSubLevel::Interview);
    assert_eq!(interview.selected_source_id(), Some(&SourceId::new("src-a")));

    let (back, intents) = step(&interview, NavAction::GoBack);
    assert!(intents.is_empty());
    assert_eq!(back, breakdown);
    assert_eq!(back.selected_source_id(), None);

    let (back, _) = step(&back, NavAction::GoBack);
    assert_eq!(back, summary);
}

#[test]
fn going_back_from_summary_returns_to_runs() {
    let (state, intents) = step(&at_summary(), NavAction::GoBack);

    assert_eq!(state.level(), Level::Runs);
    assert!(state.selected_run().is_none());
    assert_eq!(state.detail_sub_level(), DetailSubLevel::Summary);
    assert_eq!(intents, vec![LoadIntent::Runs("rev-1".into())]);

    let (state, intents) = step(&state, NavAction::GoBack);
    assert_eq!(state.level(), Level::Assessments);
    assert!(state.selected_assessment().is_none());
    assert_eq!(intents, vec![LoadIntent::Reviews("biz-1".into())]);

    let (state, intents) = step(&state, NavAction::GoBack);
    assert_eq!(state, NavigationState::default());
    assert_eq!(intents, vec![LoadIntent::Businesses]);
}

#[test]
fn out_of_order_actions_are_rejected() {
    let initial = NavigationState::default();

    let err = transition(&initial, NavAction::GoToBreakdown).expect_err("not at detail");
    assert_eq!(
        err,
        NavigationError::InvalidTransition {
            action: "go_to_breakdown",
            level: Level::Businesses,
        }
    );
    assert!(transition(&initial, NavAction::GoBack).is_err());
    assert!(transition(&initial, NavAction::SelectRun(run("run-1", "rev-1", 1))).is_err());

    let summary = at_summary();
    assert!(transition(&summary, NavAction::GoToInterview(SourceId::new("src-a"))).is_err());
    assert!(transition(&summary, NavAction::SelectBusiness(business("biz-2", "Globex"))).is_err());
}

#[test]
fn breadcrumb_jumps_always_refetch() {
    let summary = at_summary();

    let (state, intents) = step(&summary, NavAction::JumpTo(Level::Assessments));
    assert_eq!(state.level(), Level::Assessments);
    assert!(state.selected_run().is_none());
    assert_eq!(intents, vec![LoadIntent::Reviews("biz-1".into())]);

    let (same, intents) = step(&state, NavAction::JumpTo(Level::Assessments));
    assert_eq!(same, state);
    assert_eq!(intents.len(), 1, "jumping to the current level still reloads");

    let (root, intents) = step(&summary, NavAction::JumpTo(Level::Businesses));
    assert_eq!(root, NavigationState::default());
    assert_eq!(intents, vec![LoadIntent::Businesses]);
}

#[test]
fn breadcrumb_jumps_only_reach_ancestors() {
    let err = transition(&NavigationState::default(), NavAction::JumpTo(Level::Runs))
        .expect_err("no assessment selected");
    assert_eq!(err, NavigationError::InvalidJump(Level::Runs));

    assert!(transition(&at_summary(), NavAction::JumpTo(Level::Detail)).is_err());
}

#[test]
fn breadcrumbs_follow_selection_chain() {
    let labels: Vec<String> = at_summary()
        .breadcrumbs()
        .into_iter()
        .map(|crumb| crumb.label)
        .collect();

    assert_eq!(
        labels,
        vec!["Businesses", "Acme", "Assessment rev-1", "Run #1"]
    );
}
