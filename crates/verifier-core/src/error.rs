/// Process execution error types
use std::time::Duration;
use thiserror::Error;

pub type RunResult<T> = Result<T, RunError>;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("program did not complete within the provided timeout ({timeout:?})")]
    Timeout { timeout: Duration },

    #[error("failed to launch '{program}': {reason}")]
    Launch { program: String, reason: String },

    #[error("I/O error while communicating with program: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Create a launch error
    pub fn launch(program: impl Into<String>, reason: impl ToString) -> Self {
        Self::Launch {
            program: program.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
