//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::preferences::PreferenceStore;
use crate::store::LocalStore;

/// docport - Copy, export, import and delete document collections between projects
#[derive(Parser, Debug)]
#[command(name = "docport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Preference file holding the default service account and the blocklist.
    /// Defaults to docport/config.json under the user's config directory.
    #[arg(long, global = true, env = "DOCPORT_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Directory holding one sub-directory of data per project.
    /// Defaults to docport/projects under the user's data directory.
    #[arg(long, global = true, env = "DOCPORT_STORE_ROOT")]
    pub store_root: Option<PathBuf>,

    /// Increase log output (-v for info, -vv for debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide progress bars and spinners
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export collections of a project to a JSON file
    ExportCollection(ExportCollectionArgs),

    /// Import the collections of a JSON file into a project
    ImportCollection(ImportCollectionArgs),

    /// Copy collections from one project to another
    CopyCollection(CopyCollectionArgs),

    /// Delete every document of collections
    DeleteCollection(DeleteCollectionArgs),

    /// Export the remote config template of a project to a JSON file
    ExportRemoteConfig(ExportRemoteConfigArgs),

    /// Publish a remote config template from a JSON file
    ImportRemoteConfig(ImportRemoteConfigArgs),

    /// Show or change the default service account
    Config(ConfigArgs),

    /// Manage the projects docport refuses to work on
    #[command(visible_alias = "blacklist")]
    Blocklist(BlocklistArgs),
}

/// Options shared by commands that pick collections
#[derive(Args, Debug, Clone, Default)]
pub struct CollectionSelection {
    /// Collection names (space or comma separated)
    #[arg(short = 'c', long = "collections", num_args = 1.., value_delimiter = ',')]
    pub collections: Vec<String>,

    /// Act on every collection of the project
    #[arg(short = 'a', long = "all-collections")]
    pub all_collections: bool,
}

#[derive(Args, Debug)]
pub struct ExportCollectionArgs {
    /// Collection names, in addition to those given with -c
    pub names: Vec<String>,

    #[command(flatten)]
    pub selection: CollectionSelection,

    /// Output file; defaults to firestore_export-<timestamp>.json
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Service account file of the project to export from
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

impl ExportCollectionArgs {
    /// Positional names followed by -c names
    pub fn requested_collections(&self) -> Vec<String> {
        self.names
            .iter()
            .chain(&self.selection.collections)
            .cloned()
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct ImportCollectionArgs {
    /// JSON file produced by export-collection
    pub json_path: PathBuf,

    /// Service account file of the project to import into
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    /// Commit every document in one atomic batch
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CopyCollectionArgs {
    /// Service account file of the destination project
    pub destination_service_account_path: PathBuf,

    /// Service account file of the source project
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    #[command(flatten)]
    pub selection: CollectionSelection,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct DeleteCollectionArgs {
    /// Service account file of the project to delete from
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    #[command(flatten)]
    pub selection: CollectionSelection,

    /// Delete documents one at a time instead of in one atomic batch
    #[arg(short = 'p', long)]
    pub per_document: bool,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ExportRemoteConfigArgs {
    /// Output file; defaults to remote_config-<timestamp>.json
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Service account file of the project to export from
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    /// Overwrite the output file if it already exists
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ImportRemoteConfigArgs {
    /// JSON file holding the template to publish
    pub json_path: PathBuf,

    /// Service account file of the project to publish to
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    /// Skip confirmations and interactive fallbacks
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// New default service account file
    #[arg(short = 's', long = "service-account-path")]
    pub service_account_path: Option<PathBuf>,

    /// Print the current preferences
    #[arg(long)]
    pub show: bool,
}

#[derive(Args, Debug)]
pub struct BlocklistArgs {
    /// Project ids to add
    #[arg(short = 'a', long, num_args = 1.., value_delimiter = ',')]
    pub add: Vec<String>,

    /// Project ids to remove
    #[arg(short = 'r', long, num_args = 1.., value_delimiter = ',')]
    pub remove: Vec<String>,

    /// Print the blocklist
    #[arg(short = 'l', long)]
    pub list: bool,
}

impl Cli {
    /// Preference file, falling back to the per-user default
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(PreferenceStore::default_path)
    }

    /// Local store root, falling back to the per-user default
    pub fn store_root(&self) -> PathBuf {
        self.store_root
            .clone()
            .unwrap_or_else(LocalStore::default_root)
    }

    /// Whether progress bars should be drawn
    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

