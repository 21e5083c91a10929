//! Explicit precedence for fields that may be filled by more than one upstream column.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{EvaluationRun, Review};

/// Text shown when none of the candidate timestamps is present.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Outcome of a prioritized lookup, naming the field that supplied the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolved<T> {
    Field { field: &'static str, value: T },
    Default,
}

impl<T> Resolved<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Resolved::Field { value, .. } => Some(value),
            Resolved::Default => None,
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Resolved::Field { field, .. } => Some(*field),
            Resolved::Default => None,
        }
    }
}

/// Returns the first present candidate in declaration order.
pub fn resolve_prioritized<T, I>(candidates: I) -> Resolved<T>
where
    I: IntoIterator<Item = (&'static str, Option<T>)>,
{
    candidates
        .into_iter()
        .find_map(|(field, value)| value.map(|value| Resolved::Field { field, value }))
        .unwrap_or(Resolved::Default)
}

/// Completed, then started, then created.
pub fn run_timestamp(run: &EvaluationRun) -> Resolved<DateTime<Utc>> {
    resolve_prioritized([
        ("completed_at", run.completed_at),
        ("started_at", run.started_at),
        ("created_at", run.created_at),
    ])
}

/// Submitted, then updated, then created.
pub fn review_timestamp(review: &Review) -> Resolved<DateTime<Utc>> {
    resolve_prioritized([
        ("submitted_at", review.submitted_at),
        ("updated_at", review.updated_at),
        ("created_at", review.created_at),
    ])
}

pub fn format_timestamp(resolved: Resolved<DateTime<Utc>>) -> String {
    match resolved {
        Resolved::Field { value, .. } => value.format("%Y-%m-%d %H:%M UTC").to_string(),
        Resolved::Default => UNKNOWN_DATE.to_string(),
    }
}
