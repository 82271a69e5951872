use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// One complex S-parameter reading (real, imaginary).
pub type ReflectionSample = Complex64;

/// Frequencies (Hz) with their index-aligned samples.
///
/// Frequencies and samples come from separate instrument responses, so they
/// may disagree in length. [`SweepData::aligned`] truncates both to the
/// shorter one; every analysis stage expects that step to have happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepData {
    frequencies: Vec<f64>,
    samples: Vec<ReflectionSample>,
}

impl SweepData {
    /// Builds a sweep from independently parsed series, truncating to
    /// `min(len(frequencies), len(samples))`.
    pub fn aligned(mut frequencies: Vec<f64>, mut samples: Vec<ReflectionSample>) -> Self {
        let len = frequencies.len().min(samples.len());
        if frequencies.len() != samples.len() {
            debug!(
                "aligning sweep: {} frequencies, {} samples -> {}",
                frequencies.len(),
                samples.len(),
                len
            );
        }
        frequencies.truncate(len);
        samples.truncate(len);
        Self {
            frequencies,
            samples,
        }
    }

    /// Same as [`SweepData::aligned`] but from `(real, imag)` pairs.
    pub fn from_pairs(frequencies: Vec<f64>, pairs: &[(f64, f64)]) -> Self {
        let samples = pairs
            .iter()
            .map(|&(re, im)| ReflectionSample::new(re, im))
            .collect();
        Self::aligned(frequencies, samples)
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn samples(&self) -> &[ReflectionSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn start_hz(&self) -> Option<f64> {
        self.frequencies.first().copied()
    }

    pub fn stop_hz(&self) -> Option<f64> {
        self.frequencies.last().copied()
    }

    /// True when every frequency is larger than the one before it.
    pub fn is_strictly_increasing(&self) -> bool {
        self.frequencies.windows(2).all(|pair| pair[1] > pair[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_truncates_to_shorter_series() {
        let sweep = SweepData::from_pairs(
            vec![1.0e6, 2.0e6, 3.0e6],
            &[(0.1, 0.0), (0.2, 0.1)],
        );
        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep.samples().len(), 2);
        assert_eq!(sweep.stop_hz(), Some(2.0e6));
    }

    #[test]
    fn aligned_handles_missing_samples() {
        let sweep = SweepData::aligned(vec![1.0e6, 2.0e6], Vec::new());
        assert!(sweep.is_empty());
        assert_eq!(sweep.start_hz(), None);
    }

    #[test]
    fn monotonicity_check_rejects_repeats() {
        let ok = SweepData::from_pairs(vec![1.0, 2.0, 3.0], &[(0.0, 0.0); 3]);
        let repeated = SweepData::from_pairs(vec![1.0, 2.0, 2.0], &[(0.0, 0.0); 3]);
        assert!(ok.is_strictly_increasing());
        assert!(!repeated.is_strictly_increasing());
    }
}
