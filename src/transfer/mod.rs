//! Transfer engine: export, import, copy and delete of collections.
//!
//! Every operation reports progress through indicatif bars, retries transient
//! store errors according to a [`RetryPolicy`] and stops at the first
//! permanent failure. Documents written before that failure stay written;
//! only batched operations are all-or-nothing.

mod copy;
mod delete;
mod export;
mod import;
mod remote_config;
mod retry;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

pub use copy::copy_collections;
pub use delete::{delete_collections, DeleteMode};
pub use export::export_collections;
pub use import::{import_documents, read_transfer_file, ImportMode};
pub use remote_config::{export_remote_config, import_remote_config};
pub use retry::RetryPolicy;

/// Contents of a transfer file: collection name to document id to body
pub type TransferFile = BTreeMap<String, BTreeMap<String, Value>>;

/// Settings shared by every transfer
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    pub show_progress: bool,
    pub retry: RetryPolicy,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl TransferOptions {
    /// No progress output and no retry delay
    pub fn quiet() -> Self {
        Self {
            show_progress: false,
            retry: RetryPolicy::immediate(),
        }
    }
}

/// Errors raised while moving documents
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to read collection '{collection}'")]
    Read {
        collection: String,
        #[source]
        source: StoreError,
    },

    #[error(
        "Stopped in collection '{collection}' after {written} of {total} document(s); \
         documents already written were kept"
    )]
    Partial {
        collection: String,
        written: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    #[error("Batch of {operations} operation(s) was rejected, nothing was changed")]
    Batch {
        operations: usize,
        #[source]
        source: StoreError,
    },

    #[error("Remote config could not be {action}")]
    RemoteConfig {
        action: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// Count of documents written before a partial failure
    pub fn written(&self) -> Option<usize> {
        match self {
            TransferError::Partial { written, .. } => Some(*written),
            _ => None,
        }
    }
}

/// Write `value` as pretty JSON, creating missing parent directories
pub(crate) fn write_json_file(path: &Path, value: &impl Serialize) -> Result<(), TransferError> {
    let write_err = |source: io::Error| TransferError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| write_err(io::Error::other(e)))?;
    fs::write(path, json).map_err(write_err)
}

/// Read and parse a JSON file
pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, TransferError> {
    let data = fs::read_to_string(path).map_err(|source| TransferError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| TransferError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
