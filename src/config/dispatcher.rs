//! Recompute dispatcher configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_WORKERS: usize = 64;
const MAX_SHUTDOWN_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    /// Concurrent recompute jobs
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// How long shutdown waits for queued and in-flight jobs
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl DispatcherConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ValidationError::InvalidWorkerCount);
        }
        if self.shutdown_timeout_secs == 0 || self.shutdown_timeout_secs > MAX_SHUTDOWN_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_worker_count() -> usize {
    4
}

fn default_shutdown_timeout() -> u64 {
    30
}
