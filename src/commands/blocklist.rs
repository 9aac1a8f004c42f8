use anyhow::Result;

use crate::cli::BlocklistArgs;
use crate::report::display_blocklist;
use crate::utils::{highlight, list_to_text, print_info, print_success};

use super::Session;

/// Add, remove or list blocklisted projects.
///
/// Removals run before additions; with no option the list is shown.
pub fn run_blocklist(args: &BlocklistArgs, session: &Session) -> Result<()> {
    let mut preferences = session.load_preferences()?;
    let mut changed = false;

    if !args.remove.is_empty() {
        let removed = preferences.remove_from_blocklist(&args.remove);
        changed |= !removed.is_empty();
        if removed.is_empty() {
            print_info("None of the given projects were in the blocklist");
        } else {
            print_success(&format!(
                "Removed {} from the blocklist",
                highlight(list_to_text(&removed))
            ));
        }
    }

    if !args.add.is_empty() {
        let added = preferences.add_to_blocklist(&args.add);
        changed |= !added.is_empty();
        if added.is_empty() {
            print_info("Every given project was already in the blocklist");
        } else {
            print_success(&format!(
                "Added {} to the blocklist",
                highlight(list_to_text(&added))
            ));
        }
    }

    if changed {
        session.save_preferences(&preferences)?;
        tracing::info!(size = preferences.blocklist.len(), "saved blocklist");
    }

    if args.list || (args.add.is_empty() && args.remove.is_empty()) {
        display_blocklist(&preferences.blocklist);
    }
    Ok(())
}
