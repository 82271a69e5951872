use crate::math::reflection::transmission_db_series;
use crate::math::stats::StatsHelper;
use crate::measurement::sweep::SweepData;
use crate::prelude::{AnalysisError, AnalysisResult, AnalysisStage};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// FM broadcast band, the notch the transmission check was written for.
pub const FM_BAND_HZ: (f64, f64) = (87.5e6, 108.0e6);

/// Summary of a two-port (S21) sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionSummary {
    pub levels_db: Vec<f64>,
    pub deepest_hz: f64,
    pub deepest_db: f64,
    pub max_db: f64,
    pub band_hz: Option<(f64, f64)>,
    /// Mean level inside `band_hz`; `None` when no sample falls inside.
    pub band_mean_db: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TransmissionAnalyzer {
    band_hz: Option<(f64, f64)>,
    logger: LogManager,
}

impl Default for TransmissionAnalyzer {
    fn default() -> Self {
        Self::new(Some(FM_BAND_HZ))
    }
}

impl TransmissionAnalyzer {
    pub fn new(band_hz: Option<(f64, f64)>) -> Self {
        Self {
            band_hz,
            logger: LogManager::for_stage("transmission"),
        }
    }
}

impl AnalysisStage for TransmissionAnalyzer {
    type Output = TransmissionSummary;

    fn name(&self) -> &'static str {
        "transmission"
    }

    fn execute(&self, sweep: &SweepData) -> AnalysisResult<TransmissionSummary> {
        let levels_db = transmission_db_series(sweep.samples());
        let (deepest_idx, max_db) =
            match (StatsHelper::argmin(&levels_db), StatsHelper::max(&levels_db)) {
                (Some(idx), Some(max)) => (idx, max),
                _ => {
                    return Err(AnalysisError::InsufficientData {
                        found: 0,
                        required: 1,
                    })
                }
            };

        let band_mean_db = self.band_hz.and_then(|(low, high)| {
            let in_band: Vec<f64> = sweep
                .frequencies()
                .iter()
                .zip(&levels_db)
                .filter(|(f, _)| **f >= low && **f <= high)
                .map(|(_, db)| *db)
                .collect();
            StatsHelper::mean(&in_band)
        });

        let deepest_hz = sweep.frequencies()[deepest_idx];
        let deepest_db = levels_db[deepest_idx];
        self.logger.record(&format!(
            "deepest {:.1} dB at {:.3} MHz",
            deepest_db,
            deepest_hz / 1e6
        ));
        if self.band_hz.is_some() && band_mean_db.is_none() {
            self.logger.warn("no samples inside the configured band");
        }

        Ok(TransmissionSummary {
            levels_db,
            deepest_hz,
            deepest_db,
            max_db,
            band_hz: self.band_hz,
            band_mean_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::sweep::ReflectionSample;

    fn notch_sweep() -> SweepData {
        let frequencies: Vec<f64> = (0..12).map(|i| 80.0e6 + 5.0e6 * i as f64).collect();
        let samples = frequencies
            .iter()
            .map(|&f| {
                if (f - 100.0e6).abs() < 1.0 {
                    ReflectionSample::new(0.001, 0.0)
                } else {
                    ReflectionSample::new(0.0, 0.9)
                }
            })
            .collect();
        SweepData::aligned(frequencies, samples)
    }

    #[test]
    fn finds_notch_and_band_mean() {
        let summary = TransmissionAnalyzer::default()
            .execute(&notch_sweep())
            .unwrap();
        assert_eq!(summary.deepest_hz, 100.0e6);
        assert!((summary.deepest_db + 60.0).abs() < 1e-9);
        assert_eq!(summary.levels_db.len(), 12);
        // 90, 95, 100 and 105 MHz fall inside the FM band.
        let pass_db = 20.0 * 0.9f64.log10();
        let expected = (3.0 * pass_db - 60.0) / 4.0;
        assert!((summary.band_mean_db.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn band_without_samples_has_no_mean() {
        let summary = TransmissionAnalyzer::new(Some((1.0e9, 2.0e9)))
            .execute(&notch_sweep())
            .unwrap();
        assert_eq!(summary.band_mean_db, None);
    }

    #[test]
    fn empty_sweep_is_insufficient() {
        let result = TransmissionAnalyzer::new(None).execute(&SweepData::default());
        assert!(matches!(result, Err(AnalysisError::InsufficientData { .. })));
    }
}
