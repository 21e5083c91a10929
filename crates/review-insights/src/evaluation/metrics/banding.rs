use serde::Serialize;

/// Four-tier colour band applied to an individual metric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

pub fn score_tier(score: f64) -> ScoreTier {
    if score >= 80.0 {
        ScoreTier::Excellent
    } else if score >= 70.0 {
        ScoreTier::Good
    } else if score >= 60.0 {
        ScoreTier::Fair
    } else {
        ScoreTier::Poor
    }
}

/// Three-tier status for a whole run. Thresholds differ from [`score_tier`] and the two
/// schemes are kept separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatusBand {
    Strong,
    Moderate,
    NeedsWork,
}

impl RunStatusBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Moderate => "Moderate",
            Self::NeedsWork => "Needs Work",
        }
    }
}

pub fn run_status_band(score: f64) -> RunStatusBand {
    if score >= 70.0 {
        RunStatusBand::Strong
    } else if score >= 50.0 {
        RunStatusBand::Moderate
    } else {
        RunStatusBand::NeedsWork
    }
}
