//! Report module - summarizing what a transfer did

pub mod summary;

pub use summary::*;
