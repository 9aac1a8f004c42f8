use anyhow::Result;

use crate::cli::{ConfigArgs, Prompter};
use crate::credential::{prompt_service_account_path, validate_service_account_path};
use crate::report::display_blocklist;
use crate::utils::{highlight, print_error, print_info, print_success};

use super::Session;

/// Show the preferences or set the default service account
pub fn run_config(args: &ConfigArgs, session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let mut preferences = session.load_preferences()?;

    if let Some(requested) = &args.service_account_path {
        let path = match validate_service_account_path(Some(requested.as_path()), &preferences) {
            Ok(_) => requested.clone(),
            Err(err) => {
                print_error(&err.to_string());
                prompt_service_account_path(
                    prompter,
                    &preferences,
                    "What is the path to your default service account ?",
                )?
            }
        };
        preferences.set_default_service_account(&path);
        session.save_preferences(&preferences)?;
        print_success(&format!(
            "Successfully set {} as default service account path.",
            path.display()
        ));
    }

    if args.show || args.service_account_path.is_none() {
        print_info(&format!("Config file: {}", session.preferences.path().display()));
        match preferences.default_service_account() {
            Some(path) => print_info(&format!(
                "Default service account: {}",
                highlight(path.display())
            )),
            None => print_info("Default service account: not set"),
        }
        display_blocklist(&preferences.blocklist);
    }
    Ok(())
}
