use anyhow::Result;

use crate::cli::{confirm_or_exit, ImportCollectionArgs, Prompter};
use crate::error::Abort;
use crate::transfer::{import_documents, read_transfer_file, ImportMode};
use crate::utils::{highlight, print_completion, print_project_info};

use super::{fallback, Session};

/// Import the collections of a JSON file into a project
pub fn run_import_collection(
    args: &ImportCollectionArgs,
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

    if !args.json_path.is_file() {
        return Err(Abort::fatal(format!("File not found: {}", args.json_path.display())).into());
    }
    let data = read_transfer_file(&args.json_path)?;

    if !args.force {
        confirm_or_exit(
            prompter,
            &format!(
                "Are you sure you want to import the content of the file {} to the project '{}' ?",
                highlight(args.json_path.display()),
                highlight(&project_id)
            ),
        )?;
    }

    let mode = if args.batch {
        ImportMode::Batched
    } else {
        ImportMode::Sequential
    };
    let mut store = session.open_store(&project_id)?;
    let summary = import_documents(&mut store, &data, mode, &session.transfer)?;
    summary.display();
    print_completion(&format!(
        "Successfully imported data from {} to {}.",
        args.json_path.display(),
        project_id
    ));
    Ok(())
}
