use crate::config::{default_queue_capacity, default_stage_timeout_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pipeline worker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Upper bound for a single external stage in milliseconds (None = unbounded).
    #[serde(default = "default_stage_timeout_ms")]
    pub stage_timeout_ms: Option<u64>,
    /// Number of jobs that may wait for the worker before `load` applies backpressure.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl WorkerConfig {
    /// Stage bound as a [`Duration`].
    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            stage_timeout_ms: default_stage_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}
