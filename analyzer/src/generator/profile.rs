use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use vnacore::measurement::ReflectionSample;
use vnacore::prelude::{DEFAULT_VELOCITY_FACTOR, SPEED_OF_LIGHT_APPROX};

/// Configuration for synthesising instrument readings of a cable under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub line_length_m: f64,
    pub velocity_factor: f64,
    pub speed_of_light: f64,
    /// Reflection magnitude at the instrument-side connector.
    pub near_reflection: f64,
    /// Magnitude of the echo from the far end.
    pub far_reflection: f64,
    /// Centre of the S21 notch, Hz.
    pub notch_hz: f64,
    /// Half-power width of the S21 notch, Hz.
    pub notch_width_hz: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            line_length_m: 2.0,
            velocity_factor: DEFAULT_VELOCITY_FACTOR,
            speed_of_light: SPEED_OF_LIGHT_APPROX,
            near_reflection: 0.3,
            far_reflection: 0.4,
            notch_hz: 98.0e6,
            notch_width_hz: 6.0e6,
            noise: 0.0,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Spacing of the VSWR minima, `c / (2 · L · vf)`.
    pub fn resonance_spacing_hz(&self) -> f64 {
        self.speed_of_light / (2.0 * self.line_length_m * self.velocity_factor)
    }

    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    fn jitter(&self, rng: &mut StdRng) -> ReflectionSample {
        if self.noise > 0.0 {
            ReflectionSample::new(
                rng.gen_range(-self.noise..self.noise),
                rng.gen_range(-self.noise..self.noise),
            )
        } else {
            ReflectionSample::new(0.0, 0.0)
        }
    }
}

/// Frequencies the instrument reports for a linear sweep, whole Hz.
pub fn sweep_frequencies(start_hz: f64, stop_hz: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start_hz.round()],
        _ => {
            let step = (stop_hz - start_hz) / (points - 1) as f64;
            (0..points)
                .map(|idx| (start_hz + step * idx as f64).round())
                .collect()
        }
    }
}

/// S11 of the cable: connector mismatch plus a delayed far-end echo.
pub fn reflection_samples(config: &GeneratorConfig, frequencies: &[f64]) -> Vec<ReflectionSample> {
    let spacing = config.resonance_spacing_hz();
    let mut rng = config.rng();
    frequencies
        .iter()
        .map(|&f| {
            let theta = 2.0 * PI * f / spacing;
            ReflectionSample::new(config.near_reflection, 0.0)
                + ReflectionSample::from_polar(config.far_reflection, -theta)
                + config.jitter(&mut rng)
        })
        .collect()
}

/// S21 of a single-pole band-stop filter centred on `notch_hz`.
pub fn transmission_samples(
    config: &GeneratorConfig,
    frequencies: &[f64],
) -> Vec<ReflectionSample> {
    let mut rng = config.rng();
    frequencies
        .iter()
        .map(|&f| {
            let detune =
                ReflectionSample::new(0.0, 2.0 * (f - config.notch_hz) / config.notch_width_hz);
            detune / (detune + 1.0) + config.jitter(&mut rng)
        })
        .collect()
}

pub fn format_frequencies(frequencies: &[f64]) -> String {
    frequencies
        .iter()
        .map(|f| format!("{:.0}\r\n", f))
        .collect()
}

pub fn format_samples(samples: &[ReflectionSample]) -> String {
    samples
        .iter()
        .map(|s| format!("{:.9} {:.9}\r\n", s.re, s.im))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vnacore::math::reflection::vswr;

    #[test]
    fn sweep_frequencies_cover_range() {
        let frequencies = sweep_frequencies(1.0e6, 500.0e6, 101);
        assert_eq!(frequencies.len(), 101);
        assert_eq!(frequencies[0], 1.0e6);
        assert_eq!(frequencies[100], 500.0e6);
        assert!(sweep_frequencies(1.0e6, 2.0e6, 0).is_empty());
    }

    #[test]
    fn reflection_minimum_sits_on_half_spacing() {
        let config = GeneratorConfig::default();
        let spacing = config.resonance_spacing_hz();
        let samples = reflection_samples(&config, &[0.5 * spacing, spacing]);
        let dip = vswr(samples[0].re, samples[0].im);
        let peak = vswr(samples[1].re, samples[1].im);
        assert!((samples[0].norm() - 0.1).abs() < 1e-9);
        assert!(dip < peak);
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let config = GeneratorConfig {
            noise: 0.01,
            seed: 7,
            ..Default::default()
        };
        let frequencies = sweep_frequencies(1.0e6, 10.0e6, 5);
        assert_eq!(
            reflection_samples(&config, &frequencies),
            reflection_samples(&config, &frequencies)
        );
    }

    #[test]
    fn transmission_notch_is_deep_at_centre() {
        let config = GeneratorConfig::default();
        let samples = transmission_samples(&config, &[config.notch_hz, 300.0e6]);
        assert!(samples[0].norm() < 1e-12);
        assert!(samples[1].norm() > 0.99);
    }

    #[test]
    fn text_matches_instrument_layout() {
        assert_eq!(format_frequencies(&[1.0e6, 2.5e6]), "1000000\r\n2500000\r\n");
        let text = format_samples(&[ReflectionSample::new(0.5, -0.25)]);
        assert_eq!(text, "0.500000000 -0.250000000\r\n");
    }
}
