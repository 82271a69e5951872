use crate::transport::{Command, Transport};
use crate::workflow::config::WorkflowConfig;
use anyhow::{bail, Context};
use clap::ValueEnum;
use log::{info, warn};
use std::sync::Arc;
use vnacore::measurement::{CableAnalysis, SweepData};
use vnacore::prelude::AnalysisStage;
use vnacore::processing::{CableAnalyzer, SweepParser, TransmissionAnalyzer, TransmissionSummary};
use vnacore::telemetry::{MetricsRecorder, MetricsSnapshot};

/// Which S-parameter the workflow measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalysisMode {
    /// S11 cable length and quality.
    Cable,
    /// S21 filter response.
    Transmission,
}

impl AnalysisMode {
    pub fn data_channel(self) -> u8 {
        match self {
            AnalysisMode::Cable => 0,
            AnalysisMode::Transmission => 1,
        }
    }
}

pub enum WorkflowResult {
    Cable {
        analysis: CableAnalysis,
        sweep: SweepData,
    },
    Transmission {
        summary: TransmissionSummary,
        sweep: SweepData,
    },
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Configures the sweep and reads back frequencies plus one data array.
    pub fn acquire(
        &self,
        transport: &mut dyn Transport,
        mode: AnalysisMode,
    ) -> anyhow::Result<SweepData> {
        let cfg = &self.config;

        let probe = transport
            .send(&Command::Info, cfg.command_timeout())
            .context("probing instrument")?;
        if probe.trim().is_empty() {
            bail!("device unresponsive: no answer to '{}'", Command::Info);
        }

        let mut setup = Vec::new();
        if let Some(slot) = cfg.calibration_slot {
            setup.push(Command::CalLoad(slot));
        }
        setup.push(Command::Sweep {
            start_hz: cfg.start_freq.round() as u64,
            stop_hz: cfg.stop_freq.round() as u64,
            points: cfg.points,
        });
        setup.push(Command::Pause);
        for command in &setup {
            transport
                .send(command, cfg.command_timeout())
                .with_context(|| format!("sending '{}'", command))?;
        }

        transport
            .send(&Command::Resume, cfg.scan_timeout())
            .context("resuming sweep")?;
        let frequency_text = transport
            .send(&Command::Frequencies, cfg.data_timeout())
            .context("reading frequencies")?;
        let data_command = Command::Data(mode.data_channel());
        let data_text = transport
            .send(&data_command, cfg.data_timeout())
            .with_context(|| format!("reading '{}'", data_command))?;

        let parser = SweepParser::with_prompt(cfg.prompt.as_str());
        let frequencies = parser.frequencies(&frequency_text);
        let pairs = parser.reflection(&data_text);
        if frequencies.len() != pairs.len() {
            warn!(
                "received {} frequencies and {} samples, truncating",
                frequencies.len(),
                pairs.len()
            );
        }
        let sweep = SweepData::from_pairs(frequencies, &pairs);
        info!("acquired {} aligned points", sweep.len());
        Ok(sweep)
    }

    fn run_stage<S: AnalysisStage>(
        &self,
        stage: &S,
        sweep: &SweepData,
    ) -> anyhow::Result<S::Output> {
        self.metrics.record_analyzed();
        match stage.execute(sweep) {
            Ok(output) => Ok(output),
            Err(err) => {
                self.metrics.record_failure();
                Err(err).with_context(|| format!("running {} stage", stage.name()))
            }
        }
    }

    pub fn analyze(&self, sweep: SweepData, mode: AnalysisMode) -> anyhow::Result<WorkflowResult> {
        match mode {
            AnalysisMode::Cable => {
                let stage = CableAnalyzer::new(
                    self.config.to_estimator_config(),
                    self.config.cable_profiles.clone(),
                    self.config.velocity_factor,
                );
                let analysis = self.run_stage(&stage, &sweep)?;
                self.metrics.record_estimate(analysis.primary.method);
                Ok(WorkflowResult::Cable { analysis, sweep })
            }
            AnalysisMode::Transmission => {
                let stage = TransmissionAnalyzer::new(self.config.transmission_band);
                let summary = self.run_stage(&stage, &sweep)?;
                Ok(WorkflowResult::Transmission { summary, sweep })
            }
        }
    }

    pub fn execute(
        &self,
        transport: &mut dyn Transport,
        mode: AnalysisMode,
    ) -> anyhow::Result<WorkflowResult> {
        let sweep = self.acquire(transport, mode)?;
        self.analyze(sweep, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::GeneratorConfig;
    use crate::transport::{ReplayTransport, SyntheticInstrument};
    use vnacore::measurement::EstimationMethod;
    use vnacore::prelude::AnalysisError;

    fn synthetic(length_m: f64) -> SyntheticInstrument {
        SyntheticInstrument::new(
            GeneratorConfig {
                line_length_m: length_m,
                ..Default::default()
            },
            "ch>",
        )
    }

    #[test]
    fn runner_recovers_synthetic_cable_length() {
        let runner = Runner::new(WorkflowConfig::default());
        let mut transport = synthetic(2.0);
        let result = runner.execute(&mut transport, AnalysisMode::Cable).unwrap();

        let WorkflowResult::Cable { analysis, sweep } = result else {
            panic!("expected a cable result");
        };
        assert_eq!(sweep.len(), 101);
        assert_eq!(analysis.primary.method, EstimationMethod::ResonanceSpacing);
        assert!((analysis.primary.length_m - 2.0).abs() / 2.0 < 0.05);
        assert_eq!(runner.metrics().resonance_estimates, 1);
    }

    #[test]
    fn runner_summarises_transmission() {
        let config = WorkflowConfig {
            start_freq: 30.0e6,
            stop_freq: 250.0e6,
            calibration_slot: Some(0),
            ..Default::default()
        };
        let runner = Runner::new(config);
        let result = runner
            .execute(&mut synthetic(2.0), AnalysisMode::Transmission)
            .unwrap();

        let WorkflowResult::Transmission { summary, .. } = result else {
            panic!("expected a transmission result");
        };
        assert!((summary.deepest_hz - 98.0e6).abs() <= 1.1e6);
        assert!(summary.band_mean_db.is_some());
    }

    #[test]
    fn silent_device_is_reported() {
        let runner = Runner::new(WorkflowConfig::default());
        let mut transport = SyntheticInstrument::silent(GeneratorConfig::default());
        let err = runner
            .execute(&mut transport, AnalysisMode::Cable)
            .err()
            .unwrap();
        assert!(err.to_string().contains("device unresponsive"));
    }

    #[test]
    fn empty_data_is_insufficient() {
        let runner = Runner::new(WorkflowConfig::default());
        let mut transport =
            ReplayTransport::new("ch>").with_response(&Command::Frequencies, "1000000\n2000000\n");
        let err = runner
            .execute(&mut transport, AnalysisMode::Cable)
            .err()
            .unwrap();

        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::InsufficientData { found: 0, .. })
        ));
        assert_eq!(runner.metrics().failures, 1);
    }

    #[test]
    fn acquire_sends_setup_sequence() {
        let config = WorkflowConfig {
            calibration_slot: Some(1),
            ..Default::default()
        };
        let runner = Runner::new(config);
        let mut transport = ReplayTransport::new("ch>");
        runner.acquire(&mut transport, AnalysisMode::Cable).unwrap();
        assert_eq!(
            transport.sent(),
            [
                "info",
                "cal load 1",
                "sweep 1000000 500000000 101",
                "pause",
                "resume",
                "frequencies",
                "data 0"
            ]
        );
    }
}
