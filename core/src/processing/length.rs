use crate::math::reflection::{phase_series, vswr_series};
use crate::measurement::cable::{
    CableAnalysis, CableLengthEstimate, CableProfile, EstimateSupport, EstimationMethod,
    ProfileLength,
};
use crate::measurement::sweep::SweepData;
use crate::prelude::{
    check_velocity_factor, AnalysisError, AnalysisResult, AnalysisStage, EstimatorConfig,
    DEFAULT_VELOCITY_FACTOR,
};
use crate::processing::quality::assess;
use crate::processing::resonance::{find_peaks, select_pair};
use crate::telemetry::log::LogManager;
use std::f64::consts::PI;

/// Full-band phase-slope fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSlope {
    pub slope: f64,
    pub span_hz: f64,
    pub length_m: f64,
}

/// Estimates line length from VSWR resonances, falling back to phase slope.
#[derive(Debug, Clone)]
pub struct LengthEstimator {
    config: EstimatorConfig,
    logger: LogManager,
}

impl Default for LengthEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl LengthEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            logger: LogManager::for_stage("length"),
        }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn speed_of_light(&self) -> AnalysisResult<f64> {
        let c = self.config.speed_of_light;
        if c.is_finite() && c > 0.0 {
            Ok(c)
        } else {
            Err(AnalysisError::Contract(format!(
                "speed of light {} must be finite and positive",
                c
            )))
        }
    }

    /// `L = c / (2 · Δf · vf)`.
    pub fn resonance_length(&self, delta_hz: f64, velocity_factor: f64) -> AnalysisResult<f64> {
        check_velocity_factor(velocity_factor)?;
        if delta_hz == 0.0 {
            return Err(AnalysisError::ZeroFrequencyDelta);
        }
        Ok(self.speed_of_light()? / (2.0 * delta_hz.abs() * velocity_factor))
    }

    /// Endpoint slope of the wrapped phase, `L = -slope · c / (4π · vf)`.
    pub fn phase_slope(
        &self,
        frequencies: &[f64],
        phases: &[f64],
        velocity_factor: f64,
    ) -> AnalysisResult<PhaseSlope> {
        check_velocity_factor(velocity_factor)?;
        let (first_hz, last_hz) = match (frequencies.first(), frequencies.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(AnalysisError::InsufficientData {
                    found: 0,
                    required: 2,
                })
            }
        };
        let (first_phase, last_phase) = match (phases.first(), phases.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(AnalysisError::InsufficientData {
                    found: 0,
                    required: 2,
                })
            }
        };

        let span_hz = last_hz - first_hz;
        if span_hz == 0.0 {
            return Err(AnalysisError::ZeroFrequencyDelta);
        }
        let slope = (last_phase - first_phase) / span_hz;
        let length_m = -slope * self.speed_of_light()? / (4.0 * PI * velocity_factor);

        Ok(PhaseSlope {
            slope,
            span_hz,
            length_m,
        })
    }

    /// Runs the two-method decision procedure for one velocity factor.
    pub fn estimate(
        &self,
        frequencies: &[f64],
        phases: &[f64],
        vswr_values: &[f64],
        velocity_factor: f64,
    ) -> AnalysisResult<CableLengthEstimate> {
        let n = frequencies.len();
        if phases.len() != n || vswr_values.len() != n {
            return Err(AnalysisError::Contract(format!(
                "series lengths differ: {} frequencies, {} phases, {} vswr values",
                n,
                phases.len(),
                vswr_values.len()
            )));
        }
        if n < self.config.min_samples {
            return Err(AnalysisError::InsufficientData {
                found: n,
                required: self.config.min_samples,
            });
        }
        check_velocity_factor(velocity_factor)?;

        let inverted: Vec<f64> = vswr_values.iter().map(|v| -v).collect();
        let peaks = find_peaks(&inverted, self.config.min_peak_distance);
        self.logger
            .detail(&format!("{} resonance candidates {:?}", peaks.len(), peaks));

        match select_pair(&inverted, &peaks, self.config.peak_selection) {
            Some((first_index, second_index)) => {
                let first_hz = frequencies[first_index];
                let second_hz = frequencies[second_index];
                let delta_hz = (second_hz - first_hz).abs();
                let length_m = self.resonance_length(delta_hz, velocity_factor)?;

                let phase_length_m = match self.phase_slope(frequencies, phases, velocity_factor) {
                    Ok(fit) => Some(fit.length_m),
                    Err(err) => {
                        self.logger.warn(&format!("phase cross-check withheld: {}", err));
                        None
                    }
                };

                Ok(CableLengthEstimate {
                    method: EstimationMethod::ResonanceSpacing,
                    velocity_factor,
                    length_m,
                    support: EstimateSupport::Resonance {
                        first_index,
                        second_index,
                        first_hz,
                        second_hz,
                        delta_hz,
                        phase_length_m,
                    },
                })
            }
            None => {
                self.logger
                    .warn("fewer than two resonances, using full-band phase slope");
                let fit = self.phase_slope(frequencies, phases, velocity_factor)?;
                Ok(CableLengthEstimate {
                    method: EstimationMethod::PhaseSlope,
                    velocity_factor,
                    length_m: fit.length_m,
                    support: EstimateSupport::PhaseSlope {
                        slope: fit.slope,
                        span_hz: fit.span_hz,
                    },
                })
            }
        }
    }

    /// Repeats [`LengthEstimator::estimate`] for every profile.
    ///
    /// Profiles without an estimate are logged and left out; order follows
    /// the catalog.
    pub fn estimate_catalog(
        &self,
        frequencies: &[f64],
        phases: &[f64],
        vswr_values: &[f64],
        profiles: &[CableProfile],
    ) -> Vec<ProfileLength> {
        profiles
            .iter()
            .filter_map(|profile| {
                match self.estimate(frequencies, phases, vswr_values, profile.velocity_factor) {
                    Ok(estimate) => Some(ProfileLength {
                        name: profile.name.clone(),
                        velocity_factor: profile.velocity_factor,
                        method: estimate.method,
                        length_m: estimate.length_m,
                    }),
                    Err(err) => {
                        self.logger
                            .warn(&format!("no length for {}: {}", profile.name, err));
                        None
                    }
                }
            })
            .collect()
    }
}

/// Cable-length stage: primary estimate, per-profile lengths and quality.
#[derive(Debug, Clone)]
pub struct CableAnalyzer {
    estimator: LengthEstimator,
    profiles: Vec<CableProfile>,
    velocity_factor: f64,
    logger: LogManager,
}

impl Default for CableAnalyzer {
    fn default() -> Self {
        Self::new(
            EstimatorConfig::default(),
            CableProfile::catalog(),
            DEFAULT_VELOCITY_FACTOR,
        )
    }
}

impl CableAnalyzer {
    pub fn new(config: EstimatorConfig, profiles: Vec<CableProfile>, velocity_factor: f64) -> Self {
        Self {
            estimator: LengthEstimator::new(config),
            profiles,
            velocity_factor,
            logger: LogManager::for_stage("cable"),
        }
    }

    pub fn estimator(&self) -> &LengthEstimator {
        &self.estimator
    }
}

impl AnalysisStage for CableAnalyzer {
    type Output = CableAnalysis;

    fn name(&self) -> &'static str {
        "cable"
    }

    fn execute(&self, sweep: &SweepData) -> AnalysisResult<CableAnalysis> {
        let required = self.estimator.config().min_samples;
        if sweep.len() < required {
            return Err(AnalysisError::InsufficientData {
                found: sweep.len(),
                required,
            });
        }
        if !sweep.is_strictly_increasing() {
            self.logger.warn("frequencies are not strictly increasing");
        }

        let frequencies = sweep.frequencies();
        let phases = phase_series(sweep.samples());
        let vswr_values = vswr_series(sweep.samples());

        let profiles =
            self.estimator
                .estimate_catalog(frequencies, &phases, &vswr_values, &self.profiles);
        let primary =
            self.estimator
                .estimate(frequencies, &phases, &vswr_values, self.velocity_factor)?;
        let quality = assess(&vswr_values)?;

        self.logger.record(&format!(
            "{} estimate {:.3} m at VF {} over {} points",
            primary.method,
            primary.length_m,
            self.velocity_factor,
            sweep.len()
        ));

        Ok(CableAnalysis {
            primary,
            profiles,
            quality,
            start_hz: frequencies[0],
            stop_hz: frequencies[frequencies.len() - 1],
            points: sweep.len(),
        })
    }
}
