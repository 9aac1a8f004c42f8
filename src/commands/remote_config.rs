use anyhow::Result;

use crate::cli::{confirm_or_exit, ExportRemoteConfigArgs, ImportRemoteConfigArgs, Prompter};
use crate::error::Abort;
use crate::output::resolve_output_path;
use crate::transfer::{export_remote_config, import_remote_config};
use crate::utils::{highlight, print_completion, print_project_info, print_success};

use super::{fallback, Session};

const EXPORT_PREFIX: &str = "remote_config";

/// Export the remote config template of a project to a JSON file
pub fn run_export_remote_config(
    args: &ExportRemoteConfigArgs,
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
                "Are you sure you want to export the remote config from the project '{}' to the file '{}' ?",
                highlight(&project_id),
                highlight(path.display())
            ),
        )?;
    }

    export_remote_config(&store, &path, &session.transfer)?;
    print_completion(&format!(
        "Successfully exported remote config from {} into {}.",
        project_id,
        path.display()
    ));
    Ok(())
}

/// Validate and publish a remote config template from a JSON file
pub fn run_import_remote_config(
    args: &ImportRemoteConfigArgs,
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

    if !args.force {
        confirm_or_exit(
            prompter,
            &format!(
                "Are you sure you want to import the content of the file {} to the remote config of the project '{}' ?",
                highlight(args.json_path.display()),
                highlight(&project_id)
            ),
        )?;
    }

    let mut store = session.open_store(&project_id)?;
    let published = import_remote_config(&mut store, &args.json_path, &session.transfer)?;
    if let Some(version) = published
        .pointer("/version/versionNumber")
        .and_then(|v| v.as_str())
    {
        print_success(&format!("Published version {}", version));
    }
    print_completion(&format!(
        "Successfully imported remote config from {} to {}.",
        args.json_path.display(),
        project_id
    ));
    Ok(())
}
