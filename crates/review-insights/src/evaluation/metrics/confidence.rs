use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

pub fn confidence_from_ratio(ratio: f64) -> ConfidenceLevel {
    if ratio >= 0.7 {
        ConfidenceLevel::High
    } else if ratio >= 0.4 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Rolls per-metric confidence labels into one level from the share labelled `high`.
pub fn aggregate_confidence<I, S>(labels: I) -> ConfidenceLevel
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (high, total) = labels.into_iter().fold((0usize, 0usize), |(high, total), label| {
        let is_high = label.as_ref().trim().eq_ignore_ascii_case("high");
        (high + usize::from(is_high), total + 1)
    });

    if total == 0 {
        return ConfidenceLevel::Low;
    }

    confidence_from_ratio(high as f64 / total as f64)
}
