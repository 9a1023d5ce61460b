// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    /// The child could not be launched, or one of its output pipes was not
    /// available. No reader was started and no callback was invoked.
    #[error("failed to start command '{command}': {source}")]
    Startup {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not exit with status zero (this includes
    /// termination by a signal). The precise code is available from
    /// `Executor::exit_code`.
    #[error("process exited with non-zero status")]
    NonZeroExit,

    /// Waiting on the child failed; no exit status was obtained.
    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("executor has already been run")]
    AlreadyRun,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// True for the "process ran but failed" sentinel.
    pub fn is_non_zero_exit(&self) -> bool {
        matches!(self, ExecError::NonZeroExit)
    }

    pub fn is_startup(&self) -> bool {
        matches!(self, ExecError::Startup { .. })
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;
