use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use vnacore::measurement::{CableAnalysis, SweepData};
use vnacore::processing::TransmissionSummary;

const FILE_STAMP: &str = "%Y%m%d_%H%M%S";
const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Plain-text cable report: header, per-profile lengths, then one
/// `frequency_MHz\treal\timag` row per sample.
pub fn render_cable_report(
    analysis: &CableAnalysis,
    sweep: &SweepData,
    timestamp: NaiveDateTime,
) -> String {
    let primary = &analysis.primary;
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Cable measurement report");
    let _ = writeln!(out, "Timestamp: {}", timestamp.format(HEADER_STAMP));
    let _ = writeln!(
        out,
        "Cable length: {:.3} m ({}, VF={})",
        primary.length_m, primary.method, primary.velocity_factor
    );
    if let Some(phase_length) = primary.phase_length_m() {
        let _ = writeln!(out, "Phase-slope length: {:.3} m", phase_length);
    }
    let _ = writeln!(
        out,
        "VSWR avg/min/max: {:.2} / {:.2} / {:.2} ({})",
        analysis.quality.avg, analysis.quality.min, analysis.quality.max, analysis.quality.rating
    );
    out.push('\n');

    let _ = writeln!(out, "Cable profiles:");
    for profile in &analysis.profiles {
        let _ = writeln!(out, "{}: {:.3} m", profile.name, profile.length_m);
    }
    out.push('\n');

    let _ = writeln!(out, "frequency_MHz\treal\timag");
    for (freq, sample) in sweep.frequencies().iter().zip(sweep.samples()) {
        let _ = writeln!(out, "{:.1}\t{:.6}\t{:.6}", freq / 1e6, sample.re, sample.im);
    }
    out
}

/// Plain-text transmission report with one `frequency_MHz\tS21_dB` row per sample.
pub fn render_transmission_report(
    summary: &TransmissionSummary,
    sweep: &SweepData,
    timestamp: NaiveDateTime,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Transmission report");
    let _ = writeln!(out, "Timestamp: {}", timestamp.format(HEADER_STAMP));
    let _ = writeln!(
        out,
        "Deepest point: {:.3} MHz, {:.1} dB",
        summary.deepest_hz / 1e6,
        summary.deepest_db
    );
    if let (Some((low, high)), Some(mean)) = (summary.band_hz, summary.band_mean_db) {
        let _ = writeln!(
            out,
            "Band {:.1}-{:.1} MHz mean: {:.1} dB",
            low / 1e6,
            high / 1e6,
            mean
        );
    }
    out.push('\n');

    let _ = writeln!(out, "frequency_MHz\tS21_dB");
    for (freq, level) in sweep.frequencies().iter().zip(&summary.levels_db) {
        let _ = writeln!(out, "{:.3}\t{:.3}", freq / 1e6, level);
    }
    out
}

/// Writes timestamped report files into one directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn write(
        &self,
        prefix: &str,
        timestamp: NaiveDateTime,
        contents: &str,
    ) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating report directory {}", self.dir.display()))?;
        let path = self
            .dir
            .join(format!("{}_{}.txt", prefix, timestamp.format(FILE_STAMP)));
        fs::write(&path, contents)
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(path)
    }

    pub fn write_cable(
        &self,
        analysis: &CableAnalysis,
        sweep: &SweepData,
    ) -> anyhow::Result<PathBuf> {
        let timestamp = Local::now().naive_local();
        self.write(
            "cable_results",
            timestamp,
            &render_cable_report(analysis, sweep, timestamp),
        )
    }

    pub fn write_transmission(
        &self,
        summary: &TransmissionSummary,
        sweep: &SweepData,
    ) -> anyhow::Result<PathBuf> {
        let timestamp = Local::now().naive_local();
        self.write(
            "transmission",
            timestamp,
            &render_transmission_report(summary, sweep, timestamp),
        )
    }
}
