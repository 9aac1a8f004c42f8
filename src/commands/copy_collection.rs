use anyhow::Result;

use crate::cli::{confirm_or_exit, CopyCollectionArgs, Prompter};
use crate::collections::resolve_collections;
use crate::transfer::copy_collections;
use crate::utils::{highlight, list_to_bullets, print_completion, print_info, print_project_info};

use super::{fallback, Session};

const SOURCE_PROMPT: &str = "What is the path to the service account of the source project ?";
const DESTINATION_PROMPT: &str =
    "What is the path to the service account of the destination project ?";

/// Copy collections from one project to another
pub fn run_copy_collection(
    args: &CopyCollectionArgs,
    session: &Session,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let mut preferences = session.load_preferences()?;
    let source_credential = session.resolve_credential(
        args.service_account_path.as_deref(),
        &mut preferences,
        fallback(prompter, args.force),
        Some(SOURCE_PROMPT),
    )?;
    let source_id = source_credential.account.project_id;
    print_project_info(&source_id);

    let destination_credential = session.resolve_credential(
        Some(args.destination_service_account_path.as_path()),
        &mut preferences,
        fallback(prompter, args.force),
        Some(DESTINATION_PROMPT),
    )?;
    let destination_id = destination_credential.account.project_id;
    print_info(&format!("Destination project: {}", highlight(&destination_id)));

    let source = session.open_store(&source_id)?;
    let collections = resolve_collections(
        &source,
        args.selection.all_collections,
        &args.selection.collections,
        &source_id,
        fallback(prompter, args.force),
    )?;

    if !args.force {
        confirm_or_exit(
            prompter,
            &format!(
                "Are you sure you want to copy the collections{}\n from the project '{}' to the project '{}' ?",
                highlight(list_to_bullets(&collections)),
                highlight(&source_id),
                highlight(&destination_id)
            ),
        )?;
    }

    let mut destination = session.open_store(&destination_id)?;
    let summary = copy_collections(&source, &mut destination, &collections, &session.transfer)?;
    summary.display();
    print_completion(&format!(
        "Successfully copied collections from {} to {}.",
        source_id, destination_id
    ));
    Ok(())
}
