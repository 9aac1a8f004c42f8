//! Command handlers.
//!
//! Each handler resolves what it needs (credential, collections, output file),
//! asks for confirmation unless forced, then hands the work to the transfer
//! engine and reports the outcome.

mod blocklist;
mod config;
mod copy_collection;
mod delete_collection;
mod export_collection;
mod import_collection;
mod remote_config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, Prompter};
use crate::credential::{self, ResolvedCredential};
use crate::preferences::{PreferenceStore, Preferences};
use crate::store::LocalStore;
use crate::transfer::TransferOptions;

pub use blocklist::run_blocklist;
pub use config::run_config;
pub use copy_collection::run_copy_collection;
pub use delete_collection::run_delete_collection;
pub use export_collection::run_export_collection;
pub use import_collection::run_import_collection;
pub use remote_config::{run_export_remote_config, run_import_remote_config};

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone)]
pub struct Session {
    pub preferences: PreferenceStore,
    pub store_root: PathBuf,
    pub transfer: TransferOptions,
}

impl Session {
    pub fn new(config_path: impl Into<PathBuf>, store_root: impl Into<PathBuf>) -> Self {
        Self {
            preferences: PreferenceStore::new(config_path),
            store_root: store_root.into(),
            transfer: TransferOptions::default(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let mut session = Self::new(cli.config_path(), cli.store_root());
        session.transfer.show_progress = cli.show_progress();
        session
    }

    pub fn with_transfer_options(mut self, transfer: TransferOptions) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn load_preferences(&self) -> Result<Preferences> {
        Ok(self.preferences.load()?)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        Ok(self.preferences.save(preferences)?)
    }

    /// Resolve a credential and persist a newly entered default path
    pub fn resolve_credential(
        &self,
        explicit_path: Option<&Path>,
        preferences: &mut Preferences,
        prompter: Option<&mut dyn Prompter>,
        message: Option<&str>,
    ) -> Result<ResolvedCredential> {
        let resolved = credential::resolve_credential(explicit_path, preferences, prompter, message)?;
        if resolved.default_changed {
            self.save_preferences(preferences)?;
            tracing::info!(path = %resolved.path.display(), "saved new default service account");
        }
        Ok(resolved)
    }

    /// Open the store of `project_id`
    pub fn open_store(&self, project_id: &str) -> Result<LocalStore> {
        LocalStore::open(&self.store_root, project_id)
            .with_context(|| format!("Failed to open the store of project '{}'", project_id))
    }
}

/// The prompter to fall back on, or none when the command is forced
pub(crate) fn fallback(prompter: &mut dyn Prompter, force: bool) -> Option<&mut dyn Prompter> {
    if force {
        None
    } else {
        Some(prompter)
    }
}

/// Run the command selected on the command line
pub fn run(cli: &Cli, prompter: &mut dyn Prompter) -> Result<()> {
    let session = Session::from_cli(cli);
    tracing::debug!(
        config = %session.preferences.path().display(),
        store_root = %session.store_root.display(),
        "starting command"
    );

    match &cli.command {
        Commands::ExportCollection(args) => run_export_collection(args, &session, prompter),
        Commands::ImportCollection(args) => run_import_collection(args, &session, prompter),
        Commands::CopyCollection(args) => run_copy_collection(args, &session, prompter),
        Commands::DeleteCollection(args) => run_delete_collection(args, &session, prompter),
        Commands::ExportRemoteConfig(args) => run_export_remote_config(args, &session, prompter),
        Commands::ImportRemoteConfig(args) => run_import_remote_config(args, &session, prompter),
        Commands::Config(args) => run_config(args, &session, prompter),
        Commands::Blocklist(args) => run_blocklist(args, &session),
    }
}
