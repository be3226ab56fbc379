use thiserror::Error;

/// Outcome of a failed external stage.
///
/// Cancellation is reported explicitly so it is never confused with a
/// failure of the stage itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The operation was cancelled by its owner.
    #[error("cancelled")]
    Cancelled,

    /// The operation failed.
    #[error("{reason}")]
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

impl StageError {
    /// Build a [`StageError::Failed`] from anything printable.
    pub fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }
}
