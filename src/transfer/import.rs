//! Import of a transfer file into a store

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::report::TransferSummary;
use crate::store::{DocumentStore, WriteBatch};
use crate::utils::{abandon_on_error, create_progress_bar, create_spinner, finish_with_success};

use super::{read_json_file, TransferError, TransferFile, TransferOptions};

/// How documents are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// One write per document; a failure keeps what was already written
    #[default]
    Sequential,
    /// A single atomic commit of every document
    Batched,
}

/// Read a transfer file.
///
/// Collections whose value is `null` are skipped.
pub fn read_transfer_file(path: &Path) -> Result<TransferFile, TransferError> {
    let raw: BTreeMap<String, Option<BTreeMap<String, Value>>> = read_json_file(path)?;
    let skipped = raw.values().filter(|docs| docs.is_none()).count();
    if skipped > 0 {
        tracing::debug!(skipped, "skipping null collections in transfer file");
    }
    Ok(raw
        .into_iter()
        .filter_map(|(name, docs)| docs.map(|docs| (name, docs)))
        .collect())
}

/// Write every document of `data` into `store`, replacing documents with the same id
pub fn import_documents(
    store: &mut dyn DocumentStore,
    data: &TransferFile,
    mode: ImportMode,
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    match mode {
        ImportMode::Sequential => import_sequential(store, data, options),
        ImportMode::Batched => import_batched(store, data, options),
    }
}

fn import_sequential(
    store: &mut dyn DocumentStore,
    data: &TransferFile,
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut summary = TransferSummary::new("Import summary");

    for (collection, documents) in data {
        let total = documents.len();
        let pb = create_progress_bar(
            total as u64,
            &format!("Importing {}", collection),
            options.show_progress,
        );

        for (written, (id, body)) in documents.iter().enumerate() {
            options
                .retry
                .run("set_document", || store.set_document(collection, id, body))
                .map_err(|source| {
                    abandon_on_error(&pb);
                    tracing::error!(collection = %collection, written, total, "import stopped");
                    TransferError::Partial {
                        collection: collection.clone(),
                        written,
                        total,
                        source,
                    }
                })?;
            pb.inc(1);
        }

        finish_with_success(&pb, &format!("Imported {} ({} documents)", collection, total));
        tracing::info!(collection = %collection, documents = total, "imported collection");
        summary.record(collection, total);
    }

    Ok(summary)
}

fn import_batched(
    store: &mut dyn DocumentStore,
    data: &TransferFile,
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut summary = TransferSummary::new("Import summary");
    let mut batch = WriteBatch::new();
    for (collection, documents) in data {
        for (id, body) in documents {
            batch.set(collection, id, body.clone());
        }
        summary.record(collection, documents.len());
    }

    let spinner = create_spinner(
        &format!("Committing {} document(s) in one batch", batch.len()),
        options.show_progress,
    );
    options
        .retry
        .run("commit", || store.commit(&batch))
        .map_err(|source| {
            abandon_on_error(&spinner);
            TransferError::Batch {
                operations: batch.len(),
                source,
            }
        })?;
    finish_with_success(&spinner, &format!("Committed {} document(s)", batch.len()));
    tracing::info!(documents = batch.len(), "imported batch");

    Ok(summary)
}
