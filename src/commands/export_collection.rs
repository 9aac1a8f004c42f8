use anyhow::Result;

use crate::cli::{confirm_or_exit, ExportCollectionArgs, Prompter};
use crate::collections::resolve_collections;
use crate::output::resolve_output_path;
use crate::transfer::export_collections;
use crate::utils::{highlight, list_to_bullets, print_completion, print_project_info};

use super::{fallback, Session};

const EXPORT_PREFIX: &str = "firestore_export";

/// Export collections of a project to a JSON file
pub fn run_export_collection(
    args: &ExportCollectionArgs,
    session: &Session,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut preferences = session.load_preferences()?;
    let credential = session.resolve_credential(
        args.service_account_path.as_deref(),
        &mut preferences,
        fallback(prompter, args.force),
        None,
    )?;
    let project_id = credential.account.project_id;
    print_project_info(&project_id);

    let store = session.open_store(&project_id)?;
    let collections = resolve_collections(
        &store,
        args.selection.all_collections,
        &args.requested_collections(),
        &project_id,
        fallback(prompter, args.force),
    )?;
    let path = resolve_output_path(
        args.output_file.as_deref(),
        args.overwrite,
        EXPORT_PREFIX,
        fallback(prompter, args.force),
    )?;

    if !args.force {
        confirm_or_exit(
            prompter,
            &format!(
                "Are you sure you want to export the content of the collections{}\n from the project '{}' to the file '{}' ?",
                highlight(list_to_bullets(&collections)),
                highlight(&project_id),
                highlight(path.display())
            ),
        )?;
    }

    let summary = export_collections(&store, &collections, &path, &session.transfer)?;
    summary.display();
    print_completion(&format!(
        "Successfully exported data from {} into {}.",
        project_id,
        path.display()
    ));
    Ok(())
}
