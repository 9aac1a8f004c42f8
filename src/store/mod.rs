//! Document store abstraction.
//!
//! A project's data lives behind [`DocumentStore`] (collections of JSON
//! documents) and [`RemoteConfig`] (a single published template). The binary
//! talks to [`LocalStore`]; tests use [`MemoryStore`].

mod local;
mod memory;
mod remote_config;

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote_config::{empty_template, stamp_version, validate_template};

/// A document as stored: its id and JSON body
pub type Document = (String, Value);

/// Errors raised by a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid {kind} '{name}': must be non-empty and must not contain '/' or '\\' or be '.' or '..'")]
    InvalidName { kind: &'static str, name: String },

    #[error("Document '{collection}/{id}' must be a JSON object")]
    InvalidDocument { collection: String, id: String },

    #[error("Invalid remote config template: {0}")]
    InvalidTemplate(String),

    #[error("Corrupted data in {}", path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::QuotaExceeded(_) => true,
            StoreError::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// One operation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    Set {
        collection: String,
        id: String,
        body: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// Operations committed together: either all apply or none do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, collection: &str, id: &str, body: Value) -> &mut Self {
        self.ops.push(BatchOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            body,
        });
        self
    }

    pub fn delete(&mut self, collection: &str, id: &str) -> &mut Self {
        self.ops.push(BatchOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    /// Check every operation before anything is applied
    pub fn validate(&self) -> Result<(), StoreError> {
        for op in &self.ops {
            match op {
                BatchOp::Set {
                    collection,
                    id,
                    body,
                } => validate_document(collection, id, body)?,
                BatchOp::Delete { collection, id } => {
                    validate_name("collection", collection)?;
                    validate_name("document id", id)?;
                }
            }
        }
        Ok(())
    }
}

/// Collections of JSON documents belonging to one project
pub trait DocumentStore {
    /// Project this store is bound to
    fn project_id(&self) -> &str;

    /// Names of every existing collection, sorted
    fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    /// Every document of a collection with its body, sorted by id
    fn get_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Every document id of a collection, sorted
    fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Create or replace one document
    fn set_document(&mut self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError>;

    /// Delete one document; deleting a missing document is not an error
    fn delete_document(&mut self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Apply every operation of `batch` atomically
    fn commit(&mut self, batch: &WriteBatch) -> Result<(), StoreError>;
}

/// The project's remote config template
pub trait RemoteConfig {
    /// Current template, or an empty one when nothing was published yet
    fn get_template(&self) -> Result<Value, StoreError>;

    /// Check a template and return it ready for publishing
    fn validate_template(&self, template: Value) -> Result<Value, StoreError> {
        validate_template(&template)?;
        Ok(template)
    }

    /// Replace the current template, returning the published version
    fn publish_template(&mut self, template: Value) -> Result<Value, StoreError>;
}

/// Reject names that cannot map to a single path segment
pub fn validate_name(kind: &'static str, name: &str) -> Result<(), StoreError> {
    let has_separator = name.contains(|c: char| c == '/' || c == '\\');
    if name.is_empty() || name == "." || name == ".." || has_separator {
        return Err(StoreError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Check names and body of a document about to be written
pub fn validate_document(collection: &str, id: &str, body: &Value) -> Result<(), StoreError> {
    validate_name("collection", collection)?;
    validate_name("document id", id)?;
    if !body.is_object() {
        return Err(StoreError::InvalidDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Unavailable("down".into()).is_transient());
        assert!(StoreError::QuotaExceeded("slow down".into()).is_transient());
        assert!(StoreError::io("x", io::Error::from(io::ErrorKind::TimedOut)).is_transient());
        assert!(!StoreError::PermissionDenied("no".into()).is_transient());
        assert!(!StoreError::io("x", io::Error::from(io::ErrorKind::NotFound)).is_transient());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("collection", "users").is_ok());
        for bad in ["", ".", "..", "a/b", "a\\b"] {
            assert!(validate_name("collection", bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_batch_validation_rejects_non_object_body() {
        let mut batch = WriteBatch::new();
        batch
            .set("users", "u1", json!({"name": "a"}))
            .set("users", "u2", json!([1, 2]));
        assert_eq!(batch.len(), 2);
        assert!(matches!(
            batch.validate(),
            Err(StoreError::InvalidDocument { .. })
        ));
    }
}
