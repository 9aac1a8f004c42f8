//! Export of collections to a transfer file

use std::path::Path;

use crate::report::TransferSummary;
use crate::store::DocumentStore;
use crate::utils::{abandon_on_error, create_progress_bar, finish_with_success};

use super::{write_json_file, TransferError, TransferFile, TransferOptions};

/// Read every document of `collections` and write them to `path`.
///
/// Nothing is written if any collection fails to read. A name listed twice
/// is exported once.
pub fn export_collections(
    store: &dyn DocumentStore,
    collections: &[String],
    path: &Path,
    options: &TransferOptions,
) -> Result<TransferSummary, TransferError> {
    let pb = create_progress_bar(
        collections.len() as u64,
        "Exporting collections",
        options.show_progress,
    );
    let mut summary = TransferSummary::new("Export summary");
    let mut data = TransferFile::new();

    for collection in collections {
        if data.contains_key(collection) {
            pb.inc(1);
            continue;
        }
        pb.set_message(format!("Exporting {}", collection));
        let documents = options
            .retry
            .run("get_documents", || store.get_documents(collection))
            .map_err(|source| {
                abandon_on_error(&pb);
                TransferError::Read {
                    collection: collection.clone(),
                    source,
                }
            })?;

        tracing::info!(collection = %collection, documents = documents.len(), "exported collection");
        summary.record(collection, documents.len());
        data.insert(collection.clone(), documents.into_iter().collect());
        pb.inc(1);
    }

    write_json_file(path, &data).inspect_err(|_| abandon_on_error(&pb))?;
    finish_with_success(
        &pb,
        &format!("Exported {} collection(s)", summary.collections.len()),
    );
    Ok(summary)
}
