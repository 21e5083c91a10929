use crate::evaluation::domain::MetricScore;

/// Fallback shown when a metric record carries neither a known code nor a name.
pub const UNKNOWN_METRIC: &str = "Unknown Metric";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
    pub code: &'static str,
    pub client_name: &'static str,
    pub academic_term: &'static str,
}

const fn metric(
    code: &'static str,
    client_name: &'static str,
    academic_term: &'static str,
) -> MetricDefinition {
    MetricDefinition {
        code,
        client_name,
        academic_term,
    }
}

/// The fourteen metrics in CABAS order. Position in this table is the sort key.
pub const CANONICAL_METRICS: [MetricDefinition; 14] = [
    metric("ADAPTABILITY", "Adaptability", "Cognitive Flexibility"),
    metric("LEARNING_AGILITY", "Learning Agility", "Growth Orientation"),
    metric("PROBLEM_SOLVING", "Problem Solving", "Analytical Reasoning"),
    metric("DECISION_MAKING", "Decision Making", "Practical Judgment"),
    metric("COMMUNICATION", "Communication", "Verbal Articulation"),
    metric("COLLABORATION", "Teamwork", "Collaborative Orientation"),
    metric("EMPATHY", "Empathy", "Emotional Intelligence"),
    metric("OWNERSHIP", "Ownership", "Conscientiousness"),
    metric("RESILIENCE", "Resilience", "Stress Tolerance"),
    metric("INITIATIVE", "Initiative", "Proactive Personality"),
    metric("INTEGRITY", "Integrity", "Ethical Reasoning"),
    metric("CUSTOMER_FOCUS", "Customer Focus", "Service Orientation"),
    metric("LEADERSHIP", "Leadership", "Social Influence"),
    metric("DRIVE", "Drive", "Achievement Motivation"),
];

pub fn lookup(code: &str) -> Option<&'static MetricDefinition> {
    CANONICAL_METRICS
        .iter()
        .find(|definition| definition.code == code)
}

/// Position of `code` in the catalogue; unknown codes share the slot after the last entry.
pub fn canonical_index(code: &str) -> usize {
    CANONICAL_METRICS
        .iter()
        .position(|definition| definition.code == code)
        .unwrap_or(CANONICAL_METRICS.len())
}

/// Label shown for a metric: catalogue name, then the record's own name, then the raw code.
pub fn display_name(code: &str, record_name: Option<&str>) -> String {
    if let Some(definition) = lookup(code) {
        return format!("{} ({})", definition.client_name, definition.academic_term);
    }

    match record_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None if !code.trim().is_empty() => code.to_string(),
        None => UNKNOWN_METRIC.to_string(),
    }
}

/// Stable sort by catalogue position. Unknown codes keep their relative order at the end.
pub fn sort_canonical_by<T, F>(items: &mut [T], code_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| canonical_index(code_of(item)));
}

pub fn sort_metrics(metrics: &mut [MetricScore]) {
    sort_canonical_by(metrics, |metric| metric.metric_code.as_str());
}
