//! Command outcomes that stop a run before it completes.

use thiserror::Error;

/// Stops the current command.
///
/// `Cancelled` is a clean, operator-initiated stop and maps to exit status 0.
/// `Fatal` carries the reason a non-interactive run could not continue and
/// maps to exit status 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Abort {
    #[error("Operation canceled.")]
    Cancelled,

    #[error("{0}")]
    Fatal(String),
}

impl Abort {
    pub fn fatal(message: impl Into<String>) -> Self {
        Abort::Fatal(message.into())
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Abort::Cancelled => 0,
            Abort::Fatal(_) => 1,
        }
    }
}

/// Exit status for any error surfaced by a command.
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<Abort>()
        .map(Abort::exit_code)
        .unwrap_or(1)
}
