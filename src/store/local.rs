//! Filesystem-backed store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<project_id>/collections/<collection>/<document id>.json
//! <root>/<project_id>/remote_config.json
//! ```
//!
//! Documents are written to a hidden temporary file and renamed into place.
//! A collection exists as long as its directory does; deleting its last
//! document removes the directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{
    empty_template, stamp_version, validate_document, validate_name, validate_template, BatchOp,
    Document, DocumentStore, RemoteConfig, StoreError, WriteBatch,
};

const COLLECTIONS_DIR: &str = "collections";
const REMOTE_CONFIG_FILE: &str = "remote_config.json";

/// Store for one project, kept as JSON files on disk
#[derive(Debug, Clone)]
pub struct LocalStore {
    project_id: String,
    project_dir: PathBuf,
}

impl LocalStore {
    /// Open (creating if needed) the directory of `project_id` under `root`
    pub fn open(root: &Path, project_id: &str) -> Result<Self, StoreError> {
        validate_name("project id", project_id)?;
        let project_dir = root.join(project_id);
        let collections = project_dir.join(COLLECTIONS_DIR);
        fs::create_dir_all(&collections).map_err(|e| StoreError::io(&collections, e))?;
        tracing::debug!(project = project_id, dir = %project_dir.display(), "opened local store");
        Ok(Self {
            project_id: project_id.to_string(),
            project_dir,
        })
    }

    /// Default store root under the user's data directory
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docport")
            .join("projects")
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.project_dir.join(COLLECTIONS_DIR).join(collection)
    }

    fn document_path(&self, collection: &str, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", id))
    }

    /// Sorted entries of `dir`, or nothing if it does not exist
    fn entries(dir: &Path) -> Result<Vec<fs::DirEntry>, StoreError> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };
        let mut entries = read
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::io(dir, e))?;
        entries.sort_by_key(|entry| entry.file_name());
        Ok(entries)
    }

    /// Documents of a collection directory as `(id, path)`, skipping temporaries and foreign files.
    ///
    /// Ids may start with a dot; only the `.json` extension marks a document.
    fn document_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, StoreError> {
        let mut documents = Vec::new();
        for entry in Self::entries(dir)? {
            let path = entry.path();
            let is_file = entry
                .file_type()
                .map_err(|e| StoreError::io(&path, e))?
                .is_file();
            if !is_file || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            // Temporaries end in `.tmp` and were skipped above
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                documents.push((stem.to_string(), path));
            }
        }
        Ok(documents)
    }

    fn read_json(path: &Path) -> Result<Value, StoreError> {
        let data = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&data).map_err(|source| StoreError::Corrupted {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = dir.join(format!(".{}.tmp", file_name));
        fs::write(&tmp, contents).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
    }

    fn remove_document_file(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let path = self.document_path(collection, id);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::io(&path, e)),
        }
        // Only succeeds once the directory is empty
        let _ = fs::remove_dir(self.collection_dir(collection));
        Ok(())
    }

    fn apply(&self, op: &BatchOp) -> Result<(), StoreError> {
        match op {
            BatchOp::Set {
                collection,
                id,
                body,
            } => self.set_document_unchecked(collection, id, body),
            BatchOp::Delete { collection, id } => self.remove_document_file(collection, id),
        }
    }

    fn set_document_unchecked(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
    ) -> Result<(), StoreError> {
        let path = self.document_path(collection, id);
        let json = serde_json::to_vec_pretty(body).map_err(|source| StoreError::Corrupted {
            path: path.clone(),
            source,
        })?;
        Self::write_atomic(&path, &json)
    }

    /// Previous bytes of the document touched by `op`, for rollback
    fn snapshot(&self, op: &BatchOp) -> Result<(PathBuf, Option<Vec<u8>>), StoreError> {
        let (collection, id) = match op {
            BatchOp::Set { collection, id, .. } | BatchOp::Delete { collection, id } => {
                (collection, id)
            }
        };
        let path = self.document_path(collection, id);
        match fs::read(&path) {
            Ok(bytes) => Ok((path, Some(bytes))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok((path, None)),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn rollback(undo: Vec<(PathBuf, Option<Vec<u8>>)>) {
        for (path, previous) in undo.into_iter().rev() {
            let restored = match previous {
                Some(bytes) => Self::write_atomic(&path, &bytes),
                None => match fs::remove_file(&path) {
                    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(StoreError::io(&path, e)),
                    _ => {
                        if let Some(dir) = path.parent() {
                            let _ = fs::remove_dir(dir);
                        }
                        Ok(())
                    }
                },
            };
            if let Err(err) = restored {
                tracing::error!(path = %path.display(), %err, "failed to roll back batch operation");
            }
        }
    }
}

impl DocumentStore for LocalStore {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.project_dir.join(COLLECTIONS_DIR);
        let mut names = Vec::new();
        for entry in Self::entries(&dir)? {
            let is_dir = entry
                .file_type()
                .map_err(|e| StoreError::io(entry.path(), e))?
                .is_dir();
            if let (true, Some(name)) = (is_dir, entry.file_name().to_str()) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn get_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_name("collection", collection)?;
        let mut documents = Vec::new();
        for (id, path) in Self::document_files(&self.collection_dir(collection))? {
            documents.push((id, Self::read_json(&path)?));
        }
        tracing::debug!(collection, count = documents.len(), "read documents");
        Ok(documents)
    }

    fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        validate_name("collection", collection)?;
        Ok(Self::document_files(&self.collection_dir(collection))?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    fn set_document(&mut self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError> {
        validate_document(collection, id, body)?;
        self.set_document_unchecked(collection, id, body)
    }

    fn delete_document(&mut self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_name("collection", collection)?;
        validate_name("document id", id)?;
        self.remove_document_file(collection, id)
    }

    fn commit(&mut self, batch: &WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        let mut undo = Vec::with_capacity(batch.len());
        for op in batch.ops() {
            let step = self.snapshot(op).and_then(|snapshot| {
                undo.push(snapshot);
                self.apply(op)
            });
            if let Err(err) = step {
                tracing::warn!(%err, applied = undo.len(), "batch failed, rolling back");
                Self::rollback(undo);
                return Err(err);
            }
        }
        tracing::debug!(operations = batch.len(), "committed batch");
        Ok(())
    }
}

impl RemoteConfig for LocalStore {
    fn get_template(&self) -> Result<Value, StoreError> {
        let path = self.project_dir.join(REMOTE_CONFIG_FILE);
        if !path.exists() {
            return Ok(empty_template());
        }
        Self::read_json(&path)
    }

    fn publish_template(&mut self, template: Value) -> Result<Value, StoreError> {
        validate_template(&template)?;
        let path = self.project_dir.join(REMOTE_CONFIG_FILE);
        let previous = if path.exists() {
            Some(Self::read_json(&path)?)
        } else {
            None
        };
        let published = stamp_version(template, previous.as_ref());
        let json = serde_json::to_vec_pretty(&published).map_err(|source| StoreError::Corrupted {
            path: path.clone(),
            source,
        })?;
        Self::write_atomic(&path, &json)?;
        Ok(published)
    }
}
