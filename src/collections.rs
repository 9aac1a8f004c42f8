//! Resolution of the collection names a command acts on

use anyhow::Result;

use crate::cli::Prompter;
use crate::error::Abort;
use crate::store::DocumentStore;
use crate::utils::{list_to_text, print_error};

/// Resolve the collections to operate on.
///
/// - `select_all` returns every existing collection, ignoring `explicit`.
/// - Explicit names are returned unchanged (order and duplicates kept) only if
///   every one of them exists.
/// - Otherwise the operator picks from the existing collections through
///   `prompter`; without one the command aborts.
///
/// The result is never empty.
pub fn resolve_collections(
    store: &dyn DocumentStore,
    select_all: bool,
    explicit: &[String],
    project_id: &str,
    prompter: Option<&mut dyn Prompter>,
) -> Result<Vec<String>> {
    let existing = store.list_collections()?;
    tracing::debug!(project = project_id, existing = existing.len(), "listed collections");

    let resolved = if select_all {
        existing
    } else if explicit.is_empty() {
        match prompter {
            Some(prompter) => select_collections(prompter, &existing)?,
            None => return Err(Abort::fatal("No collection specified").into()),
        }
    } else {
        let missing: Vec<String> = explicit
            .iter()
            .filter(|name| !existing.contains(name))
            .cloned()
            .collect();
        if missing.is_empty() {
            explicit.to_vec()
        } else {
            let message = format!(
                "One or more given collection cannot be found in the {} project: {}",
                project_id,
                list_to_text(&missing)
            );
            match prompter {
                Some(prompter) => {
                    print_error(&message);
                    select_collections(prompter, &existing)?
                }
                None => return Err(Abort::fatal(message).into()),
            }
        }
    };

    if resolved.is_empty() {
        return Err(Abort::fatal(format!(
            "No collection selected in the {} project",
            project_id
        ))
        .into());
    }
    Ok(resolved)
}

fn select_collections(prompter: &mut dyn Prompter, existing: &[String]) -> Result<Vec<String>> {
    if existing.is_empty() {
        return Ok(Vec::new());
    }
    let picked = prompter.multi_select("Select collection(s) from the followings:", existing)?;
    Ok(picked.into_iter().map(|i| existing[i].clone()).collect())
}
