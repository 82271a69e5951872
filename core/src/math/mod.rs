pub mod reflection;
pub mod stats;

pub use reflection::{phase, transmission_db, vswr};
pub use stats::StatsHelper;
