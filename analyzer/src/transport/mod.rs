//! Instrument transport: the only way the workflow talks to a device.

use std::fmt;
use std::time::Duration;

pub mod replay;
pub mod synthetic;

pub use replay::ReplayTransport;
pub use synthetic::SyntheticInstrument;

/// Calibration steps understood by the `cal` command.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalStep {
    Reset,
    Open,
    Short,
    Load,
    Thru,
    Done,
}

/// Shell commands of the instrument.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Sweep {
        start_hz: u64,
        stop_hz: u64,
        points: usize,
    },
    Pause,
    Resume,
    Frequencies,
    /// `data 0` is S11 (reflection), `data 1` is S21 (transmission).
    Data(u8),
    CalLoad(u8),
    Cal(CalStep),
    Save(u8),
    Version,
    Info,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Sweep {
                start_hz,
                stop_hz,
                points,
            } => write!(f, "sweep {} {} {}", start_hz, stop_hz, points),
            Command::Pause => f.write_str("pause"),
            Command::Resume => f.write_str("resume"),
            Command::Frequencies => f.write_str("frequencies"),
            Command::Data(channel) => write!(f, "data {}", channel),
            Command::CalLoad(slot) => write!(f, "cal load {}", slot),
            Command::Cal(step) => {
                let step = match step {
                    CalStep::Reset => "reset",
                    CalStep::Open => "open",
                    CalStep::Short => "short",
                    CalStep::Load => "load",
                    CalStep::Thru => "thru",
                    CalStep::Done => "done",
                };
                write!(f, "cal {}", step)
            }
            Command::Save(slot) => write!(f, "save {}", slot),
            Command::Version => f.write_str("version"),
            Command::Info => f.write_str("info"),
        }
    }
}

/// Writes one command and returns whatever text arrived within `timeout`.
///
/// An empty string means the device said nothing; only I/O failures are
/// errors.
pub trait Transport {
    fn send(&mut self, command: &Command, timeout: Duration) -> anyhow::Result<String>;
}
