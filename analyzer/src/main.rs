use anyhow::Context;
use clap::Parser;
use generator::profile::GeneratorConfig;
use report::ReportWriter;
use std::path::PathBuf;
use transport::{ReplayTransport, SyntheticInstrument, Transport};
use vnacore::measurement::CableAnalysis;
use vnacore::prelude::AnalysisError;
use vnacore::processing::TransmissionSummary;
use workflow::config::WorkflowConfig;
use workflow::runner::{AnalysisMode, Runner, WorkflowResult};

mod generator;
mod report;
mod transport;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "NanoVNA cable-length and filter-response workflow")]
struct Args {
    /// Load a workflow config from YAML (overrides the sweep flags)
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 1.0e6)]
    start_freq: f64,
    #[arg(long, default_value_t = 500.0e6)]
    stop_freq: f64,
    #[arg(long, default_value_t = 101)]
    points: usize,
    /// Velocity factor for the primary estimate
    #[arg(long, default_value_t = 0.66)]
    velocity_factor: f64,
    #[arg(long, value_enum, default_value_t = AnalysisMode::Cable)]
    mode: AnalysisMode,
    /// Captured `frequencies` response to replay instead of a live sweep
    #[arg(long, requires = "replay_data")]
    replay_frequencies: Option<PathBuf>,
    /// Captured `data 0` / `data 1` response to replay
    #[arg(long, requires = "replay_frequencies")]
    replay_data: Option<PathBuf>,
    /// Cable length simulated by the synthetic instrument, metres
    #[arg(long, default_value_t = 2.0)]
    synthetic_length: f64,
    #[arg(long, default_value_t = 0.0)]
    noise: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write a plain-text report into this directory
    #[arg(long)]
    report_dir: Option<PathBuf>,
    /// Print the analysis as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn print_cable(analysis: &CableAnalysis) {
    println!("Cable profiles:");
    for profile in &analysis.profiles {
        println!(
            "  {:<20} (VF={:.2}): {:.2} m [{}]",
            profile.name, profile.velocity_factor, profile.length_m, profile.method
        );
    }

    let primary = &analysis.primary;
    println!("Primary estimate ({}, VF={}):", primary.method, primary.velocity_factor);
    if let Some(delta_hz) = primary.delta_hz() {
        println!("  resonance spacing: {:.2} MHz", delta_hz / 1e6);
    }
    println!(
        "  length: {:.3} m ({:.1} cm)",
        primary.length_m,
        primary.length_m * 100.0
    );
    if let Some(phase_length) = primary.phase_length_m() {
        println!("  phase-slope length: {:.3} m", phase_length);
    }
    println!(
        "Sweep: {:.1}-{:.1} MHz, {} points",
        analysis.start_hz / 1e6,
        analysis.stop_hz / 1e6,
        analysis.points
    );
    println!(
        "VSWR avg {:.2}, min {:.2}, max {:.2}: {}",
        analysis.quality.avg, analysis.quality.min, analysis.quality.max, analysis.quality.rating
    );
}

fn print_transmission(summary: &TransmissionSummary) {
    println!(
        "Deepest point: {:.1} MHz at {:.1} dB (max {:.1} dB)",
        summary.deepest_hz / 1e6,
        summary.deepest_db,
        summary.max_db
    );
    if let (Some((low, high)), Some(mean)) = (summary.band_hz, summary.band_mean_db) {
        println!(
            "Mean level {:.1}-{:.1} MHz: {:.1} dB",
            low / 1e6,
            high / 1e6,
            mean
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        let config = WorkflowConfig::from_args(
            args.start_freq,
            args.stop_freq,
            args.points,
            args.velocity_factor,
        );
        config.validate().context("validating sweep flags")?;
        config
    };

    let mut transport: Box<dyn Transport> =
        match (args.replay_frequencies.as_ref(), args.replay_data.as_ref()) {
            (Some(frequencies), Some(data)) => Box::new(ReplayTransport::from_files(
                &workflow_config.prompt,
                frequencies,
                data,
                args.mode.data_channel(),
            )?),
            _ => Box::new(SyntheticInstrument::new(
                GeneratorConfig {
                    line_length_m: args.synthetic_length,
                    noise: args.noise,
                    seed: args.seed,
                    speed_of_light: workflow_config.speed_of_light,
                    ..Default::default()
                },
                workflow_config.prompt.clone(),
            )),
        };

    let runner = Runner::new(workflow_config);
    let result = match runner.execute(transport.as_mut(), args.mode) {
        Ok(result) => result,
        Err(err) => {
            if let Some(analysis_err) = err.downcast_ref::<AnalysisError>() {
                println!("Could not determine result: {}", analysis_err);
            }
            return Err(err);
        }
    };

    match &result {
        WorkflowResult::Cable { analysis, sweep } => {
            if args.json {
                println!("{}", analysis.to_json_pretty()?);
            } else {
                print_cable(analysis);
            }
            if let Some(dir) = args.report_dir.as_ref() {
                let path = ReportWriter::new(dir).write_cable(analysis, sweep)?;
                println!("Report saved to {}", path.display());
            }
        }
        WorkflowResult::Transmission { summary, sweep } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                print_transmission(summary);
            }
            if let Some(dir) = args.report_dir.as_ref() {
                let path = ReportWriter::new(dir).write_transmission(summary, sweep)?;
                println!("Report saved to {}", path.display());
            }
        }
    }

    let metrics = runner.metrics();
    log::info!(
        "runs {}, resonance estimates {}, phase fallbacks {}, failures {}",
        metrics.analyzed,
        metrics.resonance_estimates,
        metrics.phase_fallbacks,
        metrics.failures
    );

    Ok(())
}
