//! Copy of collections between two projects

use crate::report::TransferSummary;
use crate::store::DocumentStore;
use crate::utils::{abandon_on_error, create_progress_bar, finish_with_success};

use super::{TransferError, TransferOptions};

/// Copy every document of `collections` from `source` to `destination`.
///
/// Collections are handled in the given order. Documents with the same id in
/// the destination are replaced; other destination documents are left alone.
pub fn copy_collections(
    source: &dyn DocumentStore,
    destination: &mut dyn DocumentStore,
    collections: &[String],
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let mut summary = TransferSummary::new("Copy summary");

    for collection in collections {
        let documents = options
            .retry
            .run("get_documents", || source.get_documents(collection))
            .map_err(|err| TransferError::Read {
                collection: collection.clone(),
                source: err,
            })?;

        let total = documents.len();
        let pb = create_progress_bar(
            total as u64,
            &format!("Copying {}", collection),
            options.show_progress,
        );

        for (written, (id, body)) in documents.iter().enumerate() {
            options
                .retry
                .run("set_document", || destination.set_document(collection, id, body))
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

        finish_with_success(&pb, &format!("Copied {} ({} documents)", collection, total));
        tracing::info!(
            collection = %collection,
            from = source.project_id(),
            to = destination.project_id(),
            documents = total,
            "copied collection"
        );
        summary.record(collection, total);
    }

    Ok(summary)
}
