pub mod cable;
pub mod sweep;

pub use cable::{
    CableAnalysis, CableLengthEstimate, CableProfile, EstimateSupport, EstimationMethod,
    ProfileLength,
};
pub use sweep::{ReflectionSample, SweepData};
