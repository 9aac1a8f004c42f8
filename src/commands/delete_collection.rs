use anyhow::Result;

use crate::cli::{confirm_typed_or_exit, DeleteCollectionArgs, Prompter};
use crate::collections::resolve_collections;
use crate::transfer::{delete_collections, DeleteMode};
use crate::utils::{highlight, list_to_bullets, print_completion, print_project_info};

use super::{fallback, Session};

const CANCEL_TOKEN: &str = "cancel";

/// Delete every document of collections.
///
/// Unless forced, the operator must type the project id to go ahead.
pub fn run_delete_collection(
    args: &DeleteCollectionArgs,
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

    let mut store = session.open_store(&project_id)?;
    let collections = resolve_collections(
        &store,
        args.selection.all_collections,
        &args.selection.collections,
        &project_id,
        fallback(prompter, args.force),
    )?;

    if !args.force {
        let message = format!(
            "Are you sure you want to delete the collections{}\nfrom the project '{}' ?\n\nTo validate type '{}', else to cancel type '{}'.",
            highlight(list_to_bullets(&collections)),
            highlight(&project_id),
            highlight(&project_id),
            highlight(CANCEL_TOKEN)
        );
        let hint = format!(
            "Please enter '{}' to continue or '{}' to cancel.",
            highlight(&project_id),
            highlight(CANCEL_TOKEN)
        );
        confirm_typed_or_exit(prompter, &message, &project_id, CANCEL_TOKEN, &hint)?;
    }

    let mode = if args.per_document {
        DeleteMode::PerDocument
    } else {
        DeleteMode::Batched
    };
    let summary = delete_collections(&mut store, &collections, mode, &session.transfer)?;
    summary.display();
    print_completion(&format!(
        "Successfully deleted collections from {}.",
        project_id
    ));
    Ok(())
}
