//! Reflection-sweep analysis core for the NanoVNA cable-length tools.
//!
//! Raw instrument text goes in, numeric series and length estimates come out.
//! Nothing in this crate talks to a device; the driver owns the transport and
//! hands the core plain text and numeric arrays.

pub mod math;
pub mod measurement;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{AnalysisError, AnalysisResult, AnalysisStage, EstimatorConfig};
