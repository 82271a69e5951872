use crate::measurement::sweep::SweepData;
use serde::{Deserialize, Serialize};

/// Rounded speed of light used by the length formulas, in m/s.
pub const SPEED_OF_LIGHT_APPROX: f64 = 3.0e8;

/// Velocity factor used for the primary (detailed) report.
pub const DEFAULT_VELOCITY_FACTOR: f64 = 0.66;

/// Minimum index separation between resonance peaks.
pub const DEFAULT_MIN_PEAK_DISTANCE: usize = 10;

/// Fewest aligned samples the length estimator accepts.
pub const MIN_ANALYSIS_SAMPLES: usize = 10;

/// Interactive prompt printed by the instrument shell.
pub const DEFAULT_PROMPT: &str = "ch>";

/// How the two resonances used for the spacing estimate are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakSelection {
    /// First two detected peaks in ascending index order.
    #[default]
    FirstTwo,
    /// The two peaks with the lowest VSWR, still reported in index order.
    Deepest,
}

/// Tunables shared by the length estimator and the cable analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub min_peak_distance: usize,
    pub min_samples: usize,
    pub speed_of_light: f64,
    pub peak_selection: PeakSelection,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_peak_distance: DEFAULT_MIN_PEAK_DISTANCE,
            min_samples: MIN_ANALYSIS_SAMPLES,
            speed_of_light: SPEED_OF_LIGHT_APPROX,
            peak_selection: PeakSelection::FirstTwo,
        }
    }
}

/// Outcomes an analysis can report instead of a value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data: {found} aligned samples, at least {required} required")]
    InsufficientData { found: usize, required: usize },
    #[error("zero frequency delta between the chosen points")]
    ZeroFrequencyDelta,
    #[error("contract violation: {0}")]
    Contract(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A stage that reduces one aligned sweep to a summary value.
pub trait AnalysisStage {
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&self, sweep: &SweepData) -> AnalysisResult<Self::Output>;
}

/// Rejects velocity factors outside (0, 1].
pub(crate) fn check_velocity_factor(velocity_factor: f64) -> AnalysisResult<()> {
    if velocity_factor > 0.0 && velocity_factor <= 1.0 {
        Ok(())
    } else {
        Err(AnalysisError::Contract(format!(
            "velocity factor {} outside (0, 1]",
            velocity_factor
        )))
    }
}
