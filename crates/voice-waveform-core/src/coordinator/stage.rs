use crate::{WaveformError, error::Result as CoreResult};

use std::{fmt, future::Future, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::warn;

/// External step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Decrypt,
    Prepare,
    Convert,
    ProbeDuration,
    Sample,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decrypt => "decrypt",
            Stage::Prepare => "prepare",
            Stage::Convert => "convert",
            Stage::ProbeDuration => "probe-duration",
            Stage::Sample => "sample",
        };
        f.write_str(name)
    }
}

/// Bounds every external stage by the configured timeout and by cache clears.
///
/// A clear bumps the cache generation published on the watch channel. A stage
/// run for an older generation fails with `Cancelled`, whether the clear lands
/// before the stage starts or while it is awaiting.
pub(crate) struct StageGuard {
    timeout: Option<Duration>,
    clears: watch::Receiver<u64>,
    generation: u64,
}

impl StageGuard {
    pub(crate) fn new(timeout: Option<Duration>, clears: watch::Receiver<u64>) -> Self {
        let generation = *clears.borrow();
        Self {
            timeout,
            clears,
            generation,
        }
    }

    /// Bind the following stages to the generation a job was queued under.
    pub(crate) fn arm(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) async fn run<T, F>(&mut self, stage: Stage, operation: F) -> CoreResult<T>
    where
        F: Future<Output = T>,
    {
        let timeout = self.timeout;
        let bounded = async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, operation).await.map_err(|_| {
                    warn!(stage = %stage, timeout_ms = limit.as_millis(), "Stage timed out");
                    WaveformError::StageTimeout {
                        stage: stage.to_string(),
                        timeout: limit,
                        location: ErrorLocation::from(Location::caller()),
                    }
                }),
                None => Ok(operation.await),
            }
        };

        let generation = self.generation;
        let cleared = async {
            // Err means the coordinator is gone, which also ends interest in the result.
            let _ = self.clears.wait_for(|current| *current != generation).await;
        };

        tokio::select! {
            biased;

            _ = cleared => {
                warn!(stage = %stage, "Stage abandoned by cache clear");
                Err(WaveformError::cancelled())
            }
            result = bounded => result,
        }
    }
}
