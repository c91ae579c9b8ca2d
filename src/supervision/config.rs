// Supervision scheduling configuration with validation.

use serde::{Deserialize, Serialize};

/// Configuration for the periodic supervision sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisionConfig {
    /// Interval between supervision sweeps (seconds)
    pub interval_secs: u64,

    /// Upper bound on one per-RIC check, end to end (seconds). A RIC
    /// that stops answering costs a sweep at most this long.
    pub check_timeout_secs: u64,
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        Self { interval_secs: 60, check_timeout_secs: 30 }
    }
}

impl SupervisionConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=3600).contains(&self.interval_secs) {
            return Err("interval_secs must be between 1 and 3600".to_string());
        }

        if self.check_timeout_secs < 1 || self.check_timeout_secs >= self.interval_secs {
            return Err("check_timeout_secs must be >= 1 and < interval_secs".to_string());
        }

        Ok(())
    }
}
