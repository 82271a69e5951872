use log::{debug, info, warn};

/// Stage-scoped front end for the `log` facade.
#[derive(Debug, Clone)]
pub struct LogManager {
    stage: &'static str,
}

impl LogManager {
    pub fn for_stage(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn record(&self, message: &str) {
        info!("{}: {}", self.stage, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}: {}", self.stage, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("{}: {}", self.stage, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::for_stage("vnacore")
    }
}
