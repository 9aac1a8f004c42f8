//! docport: copy, export, import and delete document collections between projects.
//!
//! Projects are reached through a service account file. The data of each
//! project sits behind the [`store::DocumentStore`] and [`store::RemoteConfig`]
//! traits; the binary uses the filesystem-backed [`store::LocalStore`].

pub mod cli;
pub mod collections;
pub mod commands;
pub mod credential;
pub mod error;
pub mod output;
pub mod preferences;
pub mod report;
pub mod store;
pub mod transfer;
pub mod utils;
