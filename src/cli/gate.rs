//! Confirmation gates in front of irreversible operations.
//!
//! Callers skip these entirely when the command was invoked with `--force`;
//! the check lives at each call site so one flag never governs another
//! command's prompts.

use anyhow::Result;

use super::prompts::Prompter;
use crate::error::Abort;

/// Ask a yes/no question; anything but yes cancels the command.
pub fn confirm_or_exit(prompter: &mut dyn Prompter, message: &str) -> Result<()> {
    if prompter.confirm(message)? {
        Ok(())
    } else {
        Err(Abort::Cancelled.into())
    }
}

/// Ask the operator to type `expected` to continue or `cancel` to stop.
///
/// Any other input re-prompts with `hint`.
pub fn confirm_typed_or_exit(
    prompter: &mut dyn Prompter,
    message: &str,
    expected: &str,
    cancel: &str,
    hint: &str,
) -> Result<()> {
    let validate = |answer: &str| {
        if answer == expected || answer == cancel {
            Ok(())
        } else {
            Err(hint.to_string())
        }
    };
    let answer = prompter.input(message, &validate)?;
    if answer == expected {
        Ok(())
    } else {
        tracing::info!("typed confirmation cancelled");
        Err(Abort::Cancelled.into())
    }
}
