use crate::math::stats::StatsHelper;
use crate::prelude::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Average VSWR below which a line is rated excellent.
pub const EXCELLENT_VSWR: f64 = 1.5;

/// Average VSWR below which a line is rated good.
pub const GOOD_VSWR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    #[serde(rename = "excellent")]
    Excellent,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "check connections")]
    CheckConnections,
}

impl QualityRating {
    pub fn from_average(avg: f64) -> Self {
        if avg < EXCELLENT_VSWR {
            QualityRating::Excellent
        } else if avg < GOOD_VSWR {
            QualityRating::Good
        } else {
            QualityRating::CheckConnections
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::CheckConnections => "check connections",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub rating: QualityRating,
}

/// Summarises a VSWR series. Empty input is `InsufficientData`.
pub fn assess(vswr_values: &[f64]) -> AnalysisResult<QualityReport> {
    let insufficient = || AnalysisError::InsufficientData {
        found: 0,
        required: 1,
    };
    let avg = StatsHelper::mean(vswr_values).ok_or_else(insufficient)?;
    let min = StatsHelper::min(vswr_values).ok_or_else(insufficient)?;
    let max = StatsHelper::max(vswr_values).ok_or_else(insufficient)?;

    Ok(QualityReport {
        avg,
        min,
        max,
        rating: QualityRating::from_average(avg),
    })
}
