//! Deletion of every document of collections

use crate::report::TransferSummary;
use crate::store::{DocumentStore, WriteBatch};
use crate::utils::{abandon_on_error, create_progress_bar, create_spinner, finish_with_success};

use super::{TransferError, TransferOptions};

/// How documents are deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// One atomic commit per run; a failure deletes nothing
    #[default]
    Batched,
    /// One delete per document; a failure keeps what was already deleted
    PerDocument,
}

/// Delete every document of `collections`.
///
/// Ids are listed before anything is deleted, so documents created while the
/// deletion runs are not touched.
pub fn delete_collections(
    store: &mut dyn DocumentStore,
    collections: &[String],
    mode: DeleteMode,
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut targets: Vec<(String, Vec<String>)> = Vec::new();
    for collection in collections {
        if targets.iter().any(|(name, _)| name == collection) {
            continue;
        }
        let ids = options
            .retry
            .run("list_document_ids", || store.list_document_ids(collection))
            .map_err(|err| TransferError::Read {
                collection: collection.clone(),
                source: err,
            })?;
        targets.push((collection.clone(), ids));
    }

    match mode {
        DeleteMode::Batched => delete_batched(store, &targets, options),
        DeleteMode::PerDocument => delete_per_document(store, &targets, options),
    }
}

fn delete_batched(
    store: &mut dyn DocumentStore,
    targets: &[(String, Vec<String>)],
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut summary = TransferSummary::new("Delete summary");
    let mut batch = WriteBatch::new();
    for (collection, ids) in targets {
        for id in ids {
            batch.delete(collection, id);
        }
        summary.record(collection, ids.len());
    }

    if batch.is_empty() {
        return Ok(summary);
    }

    let spinner = create_spinner(
        &format!("Deleting {} document(s) in one batch", batch.len()),
        options.show_progress,
    );
    options
        .retry
        .run("commit", || store.commit(&batch))
        .map_err(|err| {
            abandon_on_error(&spinner);
            TransferError::Batch {
                operations: batch.len(),
                source: err,
            }
        })?;
    finish_with_success(&spinner, &format!("Deleted {} document(s)", batch.len()));
    tracing::info!(documents = batch.len(), "deleted batch");

    Ok(summary)
}

fn delete_per_document(
    store: &mut dyn DocumentStore,
    targets: &[(String, Vec<String>)],
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut summary = TransferSummary::new("Delete summary");

    for (collection, ids) in targets {
        let total = ids.len();
        let pb = create_progress_bar(
            total as u64,
            &format!("Deleting {}", collection),
            options.show_progress,
        );

        for (written, id) in ids.iter().enumerate() {
            options
                .retry
                .run("delete_document", || store.delete_document(collection, id))
                .map_err(|err| {
                    abandon_on_error(&pb);
                    TransferError::Partial {
                        collection: collection.clone(),
                        written,
                        total,
                        source: err,
                    }
                })?;
            pb.inc(1);
        }

        finish_with_success(&pb, &format!("Deleted {} ({} documents)", collection, total));
        tracing::info!(collection = %collection, documents = total, "deleted collection");
        summary.record(collection, total);
    }

    Ok(summary)
}
