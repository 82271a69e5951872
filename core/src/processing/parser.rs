//! Tolerant parsing of instrument response text.
//!
//! Responses interleave prompt echoes with data and may end mid-line, so the
//! parser never fails: blank lines, prompt lines and lines that do not parse
//! are skipped.

use crate::prelude::DEFAULT_PROMPT;

/// Line-oriented parser for `frequencies` and `data <n>` responses.
#[derive(Debug, Clone)]
pub struct SweepParser {
    prompt: String,
}

impl Default for SweepParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepParser {
    pub fn new() -> Self {
        Self::with_prompt(DEFAULT_PROMPT)
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    fn data_lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.lines()
            .map(str::trim)
            .filter(move |line| !line.is_empty() && !line.starts_with(self.prompt.as_str()))
    }

    /// Every parseable token of every data line, in order.
    pub fn frequencies(&self, text: &str) -> Vec<f64> {
        self.data_lines(text)
            .flat_map(str::split_whitespace)
            .filter_map(parse_value)
            .collect()
    }

    /// `(real, imag)` from the first two tokens of each data line.
    ///
    /// Lines with fewer than two tokens, or whose first two tokens are not
    /// both numbers, are dropped whole.
    pub fn reflection(&self, text: &str) -> Vec<(f64, f64)> {
        self.data_lines(text)
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                let real = parse_value(tokens.next()?)?;
                let imag = parse_value(tokens.next()?)?;
                Some((real, imag))
            })
            .collect()
    }
}

fn parse_value(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// [`SweepParser::frequencies`] with the default prompt.
pub fn parse_frequencies(text: &str) -> Vec<f64> {
    SweepParser::new().frequencies(text)
}

/// [`SweepParser::reflection`] with the default prompt.
pub fn parse_reflection(text: &str) -> Vec<(f64, f64)> {
    SweepParser::new().reflection(text)
}
