use super::{Command, Transport};
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Answers commands from previously captured response text.
///
/// Commands without a capture get a bare prompt, which is what the device
/// prints for accepted control commands.
pub struct ReplayTransport {
    prompt: String,
    responses: HashMap<String, String>,
    #[cfg_attr(not(test), allow(dead_code))]
    sent: Vec<String>,
}

impl ReplayTransport {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            responses: HashMap::new(),
            sent: Vec::new(),
        }
    }

    pub fn with_response(mut self, command: &Command, response: impl Into<String>) -> Self {
        self.responses.insert(command.to_string(), response.into());
        self
    }

    /// Loads a `frequencies` capture and a `data <channel>` capture.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        prompt: &str,
        frequencies: P,
        data: Q,
        channel: u8,
    ) -> anyhow::Result<Self> {
        let frequencies = frequencies.as_ref();
        let data = data.as_ref();
        let frequency_text = fs::read_to_string(frequencies)
            .with_context(|| format!("reading frequency capture {}", frequencies.display()))?;
        let data_text = fs::read_to_string(data)
            .with_context(|| format!("reading data capture {}", data.display()))?;
        Ok(Self::new(prompt)
            .with_response(&Command::Frequencies, frequency_text)
            .with_response(&Command::Data(channel), data_text))
    }

    #[cfg(test)]
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

impl Transport for ReplayTransport {
    fn send(&mut self, command: &Command, _timeout: Duration) -> anyhow::Result<String> {
        let key = command.to_string();
        let response = self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("{} ", self.prompt));
        self.sent.push(key);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn replays_captured_responses() {
        let mut transport =
            ReplayTransport::new("ch>").with_response(&Command::Frequencies, "1000000\n");
        let timeout = Duration::from_millis(10);
        assert_eq!(
            transport.send(&Command::Frequencies, timeout).unwrap(),
            "1000000\n"
        );
        assert_eq!(transport.send(&Command::Pause, timeout).unwrap(), "ch> ");
        assert_eq!(transport.sent(), ["frequencies", "pause"]);
    }

    #[test]
    fn loads_captures_from_files() {
        let mut freq = NamedTempFile::new().unwrap();
        freq.write_all(b"1000000\n2000000\n").unwrap();
        let mut data = NamedTempFile::new().unwrap();
        data.write_all(b"0.1 0.2\n").unwrap();

        let mut transport =
            ReplayTransport::from_files("ch>", freq.path(), data.path(), 1).unwrap();
        let timeout = Duration::from_millis(10);
        assert_eq!(
            transport.send(&Command::Data(1), timeout).unwrap(),
            "0.1 0.2\n"
        );
        assert_eq!(transport.send(&Command::Data(0), timeout).unwrap(), "ch> ");
    }

    #[test]
    fn missing_capture_is_an_error() {
        let result = ReplayTransport::from_files(
            "ch>",
            "/nonexistent/freq.txt",
            "/nonexistent/data.txt",
            0,
        );
        assert!(result.is_err());
    }
}
