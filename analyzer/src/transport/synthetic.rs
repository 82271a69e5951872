use super::{Command, Transport};
use crate::generator::profile::{
    format_frequencies, format_samples, reflection_samples, sweep_frequencies,
    transmission_samples, GeneratorConfig,
};
use log::debug;
use std::time::Duration;

/// In-process instrument that answers like the device shell: command echo,
/// response lines, then the prompt.
pub struct SyntheticInstrument {
    generator: GeneratorConfig,
    prompt: String,
    start_hz: u64,
    stop_hz: u64,
    points: usize,
    paused: bool,
    silent: bool,
}

impl SyntheticInstrument {
    pub fn new(generator: GeneratorConfig, prompt: impl Into<String>) -> Self {
        Self {
            generator,
            prompt: prompt.into(),
            start_hz: 50_000,
            stop_hz: 900_000_000,
            points: 101,
            paused: false,
            silent: false,
        }
    }

    /// An instrument that never answers.
    #[cfg(test)]
    pub fn silent(generator: GeneratorConfig) -> Self {
        Self {
            silent: true,
            ..Self::new(generator, "ch>")
        }
    }

    fn frequencies(&self) -> Vec<f64> {
        sweep_frequencies(self.start_hz as f64, self.stop_hz as f64, self.points)
    }

    fn body(&mut self, command: &Command) -> String {
        match command {
            Command::Sweep {
                start_hz,
                stop_hz,
                points,
            } => {
                self.start_hz = *start_hz;
                self.stop_hz = *stop_hz;
                self.points = *points;
                String::new()
            }
            Command::Pause => {
                self.paused = true;
                String::new()
            }
            Command::Resume => {
                self.paused = false;
                String::new()
            }
            Command::Frequencies => format_frequencies(&self.frequencies()),
            Command::Data(0) => {
                format_samples(&reflection_samples(&self.generator, &self.frequencies()))
            }
            Command::Data(1) => {
                format_samples(&transmission_samples(&self.generator, &self.frequencies()))
            }
            Command::Data(_) => "usage: data [array]\r\n".to_string(),
            Command::Version => "1.2.00-synthetic\r\n".to_string(),
            Command::Info => "Board: NanoVNA-H 4 (synthetic)\r\n".to_string(),
            Command::CalLoad(_) | Command::Cal(_) | Command::Save(_) => String::new(),
        }
    }
}

impl Transport for SyntheticInstrument {
    fn send(&mut self, command: &Command, _timeout: Duration) -> anyhow::Result<String> {
        if self.silent {
            return Ok(String::new());
        }
        let body = self.body(command);
        debug!(
            "synthetic instrument answered '{}' with {} bytes (paused: {})",
            command,
            body.len(),
            self.paused
        );
        Ok(format!("{}\r\n{}{} ", command, body, self.prompt))
    }
}
