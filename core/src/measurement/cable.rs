use crate::processing::quality::QualityReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named cable type and its velocity factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableProfile {
    pub name: String,
    pub velocity_factor: f64,
}

impl CableProfile {
    pub fn new(name: impl Into<String>, velocity_factor: f64) -> Self {
        Self {
            name: name.into(),
            velocity_factor,
        }
    }

    /// Common coaxial presets, in report order.
    pub fn catalog() -> Vec<CableProfile> {
        vec![
            CableProfile::new("RG-58", 0.66),
            CableProfile::new("RG-174", 0.66),
            CableProfile::new("RG-213", 0.66),
            CableProfile::new("LMR-400", 0.85),
            CableProfile::new("Polyethylene coax", 0.66),
            CableProfile::new("PTFE coax", 0.70),
            CableProfile::new("Air coax", 0.80),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationMethod {
    ResonanceSpacing,
    PhaseSlope,
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationMethod::ResonanceSpacing => write!(f, "resonance-spacing"),
            EstimationMethod::PhaseSlope => write!(f, "phase-slope"),
        }
    }
}

/// Data that backs a length estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateSupport {
    Resonance {
        first_index: usize,
        second_index: usize,
        first_hz: f64,
        second_hz: f64,
        delta_hz: f64,
        /// Full-band phase-slope length; `None` when the band has zero span.
        phase_length_m: Option<f64>,
    },
    PhaseSlope {
        /// Radians per Hz across the full band.
        slope: f64,
        span_hz: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableLengthEstimate {
    pub method: EstimationMethod,
    pub velocity_factor: f64,
    pub length_m: f64,
    pub support: EstimateSupport,
}

impl CableLengthEstimate {
    /// Resonance spacing in Hz, if this estimate came from resonances.
    pub fn delta_hz(&self) -> Option<f64> {
        match self.support {
            EstimateSupport::Resonance { delta_hz, .. } => Some(delta_hz),
            EstimateSupport::PhaseSlope { .. } => None,
        }
    }

    /// Phase-slope length that accompanies the estimate.
    pub fn phase_length_m(&self) -> Option<f64> {
        match self.support {
            EstimateSupport::Resonance { phase_length_m, .. } => phase_length_m,
            EstimateSupport::PhaseSlope { .. } => Some(self.length_m),
        }
    }
}

/// Length reported for one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLength {
    pub name: String,
    pub velocity_factor: f64,
    pub method: EstimationMethod,
    pub length_m: f64,
}

/// Everything the cable analysis reports for one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableAnalysis {
    pub primary: CableLengthEstimate,
    pub profiles: Vec<ProfileLength>,
    pub quality: QualityReport,
    pub start_hz: f64,
    pub stop_hz: f64,
    pub points: usize,
}

impl CableAnalysis {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
