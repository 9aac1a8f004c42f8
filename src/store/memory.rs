//! In-memory store with failure injection

use std::collections::BTreeMap;

use serde_json::Value;

use super::{
    empty_template, stamp_version, validate_document, validate_name, validate_template, BatchOp,
    Document, DocumentStore, RemoteConfig, StoreError, WriteBatch,
};

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// A store held entirely in memory.
///
/// Collections may exist while empty. Deleting the last document of a
/// collection removes the collection, as a hosted document database would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    project_id: String,
    collections: Collections,
    template: Option<Value>,
    writes: usize,
    fail_writes_after: Option<usize>,
    transient_failures: usize,
}

impl MemoryStore {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Build a store from a `{collection: {id: body}}` JSON object
    pub fn with_data(project_id: impl Into<String>, data: Value) -> Self {
        let mut store = Self::new(project_id);
        if let Value::Object(collections) = data {
            for (name, documents) in collections {
                let docs = match documents {
                    Value::Object(docs) => docs.into_iter().collect(),
                    _ => BTreeMap::new(),
                };
                store.collections.insert(name, docs);
            }
        }
        store
    }

    /// Snapshot of every collection as a `{collection: {id: body}}` JSON object
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.collections).unwrap_or(Value::Null)
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<&Value> {
        self.collections.get(collection)?.get(id)
    }

    /// Number of successful single-document writes and deletes so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make every write after the first `count` fail permanently
    pub fn fail_writes_after(mut self, count: usize) -> Self {
        self.fail_writes_after = Some(count);
        self
    }

    /// Make the next `count` write attempts fail with a transient error
    pub fn with_transient_failures(mut self, count: usize) -> Self {
        self.transient_failures = count;
        self
    }

    fn check_write(&mut self) -> Result<(), StoreError> {
        if self.transient_failures > 0 {
            self.transient_failures -= 1;
            return Err(StoreError::Unavailable("injected transient failure".to_string()));
        }
        if self.fail_writes_after.is_some_and(|limit| self.writes >= limit) {
            return Err(StoreError::PermissionDenied(
                "injected permanent failure".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(collections: &mut Collections, op: &BatchOp) {
        match op {
            BatchOp::Set {
                collection,
                id,
                body,
            } => {
                collections
                    .entry(collection.clone())
                    .or_default()
                    .insert(id.clone(), body.clone());
            }
            BatchOp::Delete { collection, id } => {
                if let Some(docs) = collections.get_mut(collection) {
                    docs.remove(id);
                    if docs.is_empty() {
                        collections.remove(collection);
                    }
                }
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.keys().cloned().collect())
    }

    fn get_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_name("collection", collection)?;
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, body)| (id.clone(), body.clone())).collect())
            .unwrap_or_default())
    }

    fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        validate_name("collection", collection)?;
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn set_document(&mut self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError> {
        validate_document(collection, id, body)?;
        self.check_write()?;
        let op = BatchOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            body: body.clone(),
        };
        Self::apply(&mut self.collections, &op);
        self.writes += 1;
        Ok(())
    }

    fn delete_document(&mut self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_name("collection", collection)?;
        validate_name("document id", id)?;
        self.check_write()?;
        let op = BatchOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        Self::apply(&mut self.collections, &op);
        self.writes += 1;
        Ok(())
    }

    fn commit(&mut self, batch: &WriteBatch) -> Result<(), StoreError> {
        batch.validate()?;
        self.check_write()?;
        let mut staged = self.collections.clone();
        for op in batch.ops() {
            Self::apply(&mut staged, op);
        }
        self.collections = staged;
        Ok(())
    }
}

impl RemoteConfig for MemoryStore {
    fn get_template(&self) -> Result<Value, StoreError> {
        Ok(self.template.clone().unwrap_or_else(empty_template))
    }

    fn publish_template(&mut self, template: Value) -> Result<Value, StoreError> {
        validate_template(&template)?;
        let published = stamp_version(template, self.template.as_ref());
        self.template = Some(published.clone());
        Ok(published)
    }
}
