//! CLI module - argument parsing, prompts and confirmation gates

mod args;
mod gate;
mod prompts;

pub use args::*;
pub use gate::{confirm_or_exit, confirm_typed_or_exit};
pub use prompts::*;
