pub mod length;
pub mod parser;
pub mod quality;
pub mod resonance;
pub mod transmission;

pub use length::{CableAnalyzer, LengthEstimator};
pub use parser::{parse_frequencies, parse_reflection, SweepParser};
pub use quality::{assess, QualityRating, QualityReport};
pub use resonance::find_peaks;
pub use transmission::{TransmissionAnalyzer, TransmissionSummary};
