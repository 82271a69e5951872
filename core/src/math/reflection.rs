//! Scalar quantities derived from a complex S-parameter reading.

use crate::measurement::sweep::ReflectionSample;

/// VSWR reported when |Γ| >= 1 (total mismatch).
pub const VSWR_SENTINEL: f64 = 100.0;

/// Transmission level reported for a zero-magnitude reading, in dB.
pub const TRANSMISSION_FLOOR_DB: f64 = -120.0;

fn magnitude(real: f64, imag: f64) -> f64 {
    (real * real + imag * imag).sqrt()
}

/// Voltage standing-wave ratio of a reflection coefficient.
///
/// Jumps to [`VSWR_SENTINEL`] at |Γ| == 1 instead of diverging.
pub fn vswr(real: f64, imag: f64) -> f64 {
    let mag = magnitude(real, imag);
    if mag < 1.0 {
        (1.0 + mag) / (1.0 - mag)
    } else {
        VSWR_SENTINEL
    }
}

/// Wrapped phase in radians, `(-π, π]`. No unwrapping across samples.
pub fn phase(real: f64, imag: f64) -> f64 {
    imag.atan2(real)
}

/// 20·log10(|S21|), floored at [`TRANSMISSION_FLOOR_DB`] for a zero reading.
pub fn transmission_db(real: f64, imag: f64) -> f64 {
    let mag = magnitude(real, imag);
    if mag > 0.0 {
        20.0 * mag.log10()
    } else {
        TRANSMISSION_FLOOR_DB
    }
}

pub fn vswr_series(samples: &[ReflectionSample]) -> Vec<f64> {
    samples.iter().map(|s| vswr(s.re, s.im)).collect()
}

pub fn phase_series(samples: &[ReflectionSample]) -> Vec<f64> {
    samples.iter().map(|s| phase(s.re, s.im)).collect()
}

pub fn transmission_db_series(samples: &[ReflectionSample]) -> Vec<f64> {
    samples.iter().map(|s| transmission_db(s.re, s.im)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn half_magnitude_gives_moderate_vswr() {
        for (re, im) in [(0.5, 0.0), (0.0, 0.5), (-0.3, 0.4), (0.3, -0.4)] {
            let value = vswr(re, im);
            assert!(value > 1.0 && value < 3.0 + 1e-12, "vswr {}", value);
        }
        assert!((vswr(0.5, 0.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn unit_magnitude_hits_sentinel() {
        assert_eq!(vswr(1.0, 0.0), VSWR_SENTINEL);
        assert_eq!(vswr(0.0, -1.0), VSWR_SENTINEL);
        assert_eq!(vswr(1.5, 0.2), VSWR_SENTINEL);
    }

    #[test]
    fn matched_load_is_unity() {
        assert_eq!(vswr(0.0, 0.0), 1.0);
    }

    #[test]
    fn phase_quadrants() {
        assert_eq!(phase(1.0, 0.0), 0.0);
        assert!((phase(0.0, 1.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((phase(-1.0, 0.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn transmission_floor_and_unity() {
        assert_eq!(transmission_db(0.0, 0.0), TRANSMISSION_FLOOR_DB);
        assert!(transmission_db(1.0, 0.0).abs() < 1e-12);
        assert!((transmission_db(0.1, 0.0) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn series_follow_sample_order() {
        let samples = [
            ReflectionSample::new(0.0, 0.0),
            ReflectionSample::new(1.0, 0.0),
        ];
        assert_eq!(vswr_series(&samples), vec![1.0, VSWR_SENTINEL]);
        assert_eq!(phase_series(&samples), vec![0.0, 0.0]);
    }
}
