use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use vnacore::measurement::CableProfile;
use vnacore::prelude::{
    EstimatorConfig, PeakSelection, DEFAULT_MIN_PEAK_DISTANCE, DEFAULT_PROMPT,
    DEFAULT_VELOCITY_FACTOR, MIN_ANALYSIS_SAMPLES, SPEED_OF_LIGHT_APPROX,
};
use vnacore::processing::transmission::FM_BAND_HZ;

/// One parameterised measurement workflow.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub start_freq: f64,
    pub stop_freq: f64,
    pub points: usize,
    pub velocity_factor: f64,
    pub cable_profiles: Vec<CableProfile>,
    pub min_peak_distance: usize,
    pub speed_of_light: f64,
    pub peak_selection: PeakSelection,
    pub prompt: String,
    pub command_timeout_ms: u64,
    pub scan_timeout_ms: u64,
    pub data_timeout_ms: u64,
    pub calibration_slot: Option<u8>,
    pub transmission_band: Option<(f64, f64)>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            start_freq: 1.0e6,
            stop_freq: 500.0e6,
            points: 101,
            velocity_factor: DEFAULT_VELOCITY_FACTOR,
            cable_profiles: CableProfile::catalog(),
            min_peak_distance: DEFAULT_MIN_PEAK_DISTANCE,
            speed_of_light: SPEED_OF_LIGHT_APPROX,
            peak_selection: PeakSelection::FirstTwo,
            prompt: DEFAULT_PROMPT.to_string(),
            command_timeout_ms: 500,
            scan_timeout_ms: 2000,
            data_timeout_ms: 1000,
            calibration_slot: None,
            transmission_band: Some(FM_BAND_HZ),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(start_freq: f64, stop_freq: f64, points: usize, velocity_factor: f64) -> Self {
        Self {
            start_freq,
            stop_freq,
            points,
            velocity_factor,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.points < 2 {
            bail!("points must be at least 2, got {}", self.points);
        }
        if !(self.start_freq > 0.0 && self.stop_freq > self.start_freq) {
            bail!(
                "sweep range {}..{} Hz must be positive and increasing",
                self.start_freq,
                self.stop_freq
            );
        }
        if self.min_peak_distance == 0 {
            bail!("min_peak_distance must be at least 1");
        }
        if !(self.speed_of_light.is_finite() && self.speed_of_light > 0.0) {
            bail!("speed_of_light must be positive");
        }
        let factors = std::iter::once(("primary", self.velocity_factor)).chain(
            self.cable_profiles
                .iter()
                .map(|profile| (profile.name.as_str(), profile.velocity_factor)),
        );
        for (name, vf) in factors {
            if !(vf > 0.0 && vf <= 1.0) {
                bail!("velocity factor {} for {} outside (0, 1]", vf, name);
            }
        }
        Ok(())
    }

    pub fn to_estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            min_peak_distance: self.min_peak_distance,
            min_samples: MIN_ANALYSIS_SAMPLES,
            speed_of_light: self.speed_of_light,
            peak_selection: self.peak_selection,
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_millis(self.data_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_estimator_config() {
        let cfg = WorkflowConfig::from_args(1.0e6, 300.0e6, 201, 0.7);
        assert_eq!(cfg.points, 201);
        assert_eq!(cfg.to_estimator_config().min_peak_distance, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"start_freq: 1000000\nstop_freq: 300000000\npoints: 201\n\
peak_selection: deepest\ncable_profiles:\n  - name: RG-8X\n    velocity_factor: 0.78\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.points, 201);
        assert_eq!(cfg.peak_selection, PeakSelection::Deepest);
        assert_eq!(cfg.cable_profiles, vec![CableProfile::new("RG-8X", 0.78)]);
        assert_eq!(cfg.velocity_factor, DEFAULT_VELOCITY_FACTOR);
    }

    #[test]
    fn config_load_rejects_bad_velocity_factor() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"velocity_factor: 1.4\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let cfg = WorkflowConfig::from_args(300.0e6, 1.0e6, 101, 0.66);
        assert!(cfg.validate().is_err());
    }
}
