//! Associating flags with metrics and interviews.
//!
//! Metric membership goes through shared questions, interview membership through
//! `source_ids`. The two rules are independent and never substitute for each other.

use std::collections::HashSet;

use serde::Serialize;

use super::domain::{Flag, FlagSeverity, MetricScore, QuestionId, SourceId};

pub fn flag_relates_to_metric(flag: &Flag, metric: &MetricScore) -> bool {
    let referenced: HashSet<&QuestionId> = metric
        .question_contributions
        .iter()
        .map(|contribution| &contribution.question_id)
        .collect();
    flag.question_ids
        .iter()
        .any(|question_id| referenced.contains(question_id))
}

pub fn flag_relates_to_source(flag: &Flag, source_id: &SourceId) -> bool {
    flag.source_ids.contains(source_id)
}

pub fn flags_for_metric<'a>(flags: &'a [Flag], metric: &MetricScore) -> Vec<&'a Flag> {
    flags
        .iter()
        .filter(|flag| flag_relates_to_metric(flag, metric))
        .collect()
}

pub fn flags_for_source<'a>(flags: &'a [Flag], source_id: &SourceId) -> Vec<&'a Flag> {
    flags
        .iter()
        .filter(|flag| flag_relates_to_source(flag, source_id))
        .collect()
}

/// Splits flags into `(unresolved, resolved)`, each keeping input order.
pub fn partition_by_resolution<'a, I>(flags: I) -> (Vec<&'a Flag>, Vec<&'a Flag>)
where
    I: IntoIterator<Item = &'a Flag>,
{
    flags.into_iter().partition(|flag| !flag.is_resolved)
}

/// Display order for any flag list: unresolved first.
pub fn order_unresolved_first<'a, I>(flags: I) -> Vec<&'a Flag>
where
    I: IntoIterator<Item = &'a Flag>,
{
    let (mut unresolved, resolved) = partition_by_resolution(flags);
    unresolved.extend(resolved);
    unresolved
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub unresolved: usize,
    pub resolved: usize,
}

impl FlagCounts {
    pub fn tally<'a, I>(flags: I) -> Self
    where
        I: IntoIterator<Item = &'a Flag>,
    {
        flags.into_iter().fold(Self::default(), |mut counts, flag| {
            match flag.severity {
                FlagSeverity::Critical => counts.critical += 1,
                FlagSeverity::Warning => counts.warning += 1,
                FlagSeverity::Info => counts.info += 1,
            }
            if flag.is_resolved {
                counts.resolved += 1;
            } else {
                counts.unresolved += 1;
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.unresolved + self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::{FlagId, QuestionContribution, RunId};

    fn flag(id: &str, sources: &[&str], questions: &[&str], resolved: bool) -> Flag {
        Flag {
            id: FlagId::new(id),
            severity: FlagSeverity::Warning,
            title: format!("flag {id}"),
            description: None,
            source_ids: sources.iter().copied().map(SourceId::new).collect(),
            question_ids: questions.iter().copied().map(QuestionId::new).collect(),
            is_resolved: resolved,
            resolution: None,
        }
    }

    fn metric_with_questions(questions: &[&str]) -> MetricScore {
        MetricScore {
            id: "agg-M1".to_string(),
            run_id: RunId::new("run-1"),
            source_id: None,
            metric_code: "M1".to_string(),
            metric_name: None,
            overall_score: Some(70.0),
            confidence: None,
            question_contributions: questions
                .iter()
                .map(|question| QuestionContribution {
                    question_id: QuestionId::new(*question),
                    question_code: None,
                    weight: None,
                })
                .collect(),
        }
    }

    #[test]
    fn metric_membership_goes_through_questions() {
        let flags = vec![
            flag("f1", &["A"], &["Q1"], false),
            flag("f2", &["A"], &["Q9"], false),
            flag("f3", &[], &["Q9", "Q2"], true),
        ];
        let metric = metric_with_questions(&["Q1", "Q2"]);

        let related: Vec<&str> = flags_for_metric(&flags, &metric)
            .into_iter()
            .map(|flag| flag.id.as_str())
            .collect();

        assert_eq!(related, vec!["f1", "f3"]);
    }

    #[test]
    fn source_membership_is_set_membership() {
        let flags = vec![
            flag("f1", &["A", "B"], &[], false),
            flag("f2", &["B"], &["Q1"], false),
            flag("f3", &[], &["Q1"], false),
        ];

        let for_a: Vec<&str> = flags_for_source(&flags, &SourceId::new("A"))
            .into_iter()
            .map(|flag| flag.id.as_str())
            .collect();
        assert_eq!(for_a, vec!["f1"]);
        assert!(flags_for_source(&flags, &SourceId::new("C")).is_empty());
    }

    #[test]
    fn unresolved_flags_lead() {
        let flags = vec![
            flag("r1", &[], &[], true),
            flag("u1", &[], &[], false),
            flag("r2", &[], &[], true),
            flag("u2", &[], &[], false),
        ];

        let ordered: Vec<&str> = order_unresolved_first(&flags)
            .into_iter()
            .map(|flag| flag.id.as_str())
            .collect();

        assert_eq!(ordered, vec!["u1", "u2", "r1", "r2"]);

        let counts = FlagCounts::tally(&flags);
        assert_eq!(counts.unresolved, 2);
        assert_eq!(counts.resolved, 2);
        assert_eq!(counts.warning, 4);
        assert_eq!(counts.total(), 4);
    }
}
