//! Service account credentials and their resolution.
//!
//! A credential comes from an explicit path, the stored default, or the
//! operator typing a path. Every candidate goes through the same validation,
//! in this order, stopping at the first failure:
//!
//! 1. a path was given
//! 2. the file exists
//! 3. it has a `.json` extension
//! 4. it decodes as a service account
//! 5. its project is not blocklisted

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Prompter;
use crate::error::Abort;
use crate::preferences::Preferences;
use crate::utils::print_error;

const DEFAULT_PATH_PROMPT: &str = "What is the path to your project service account ?";

/// Reasons a service account path is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No service account path specified")]
    MissingPath,

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid service account file extension: {}", .0.display())]
    InvalidExtension(PathBuf),

    #[error("Invalid service account file: {} ({reason})", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("The project '{0}' is blocklisted")]
    Blocklisted(String),
}

/// A parsed service account file, bound to one project
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ServiceAccount {
    /// Decode a service account from JSON text
    pub fn from_json(path: &Path, data: &str) -> Result<Self, CredentialError> {
        let malformed = |reason: String| CredentialError::Malformed {
            path: path.to_path_buf(),
            reason,
        };
        let account: ServiceAccount =
            serde_json::from_str(data).map_err(|e| malformed(e.to_string()))?;
        if account.account_type != "service_account" {
            return Err(malformed(format!(
                "expected type 'service_account', found '{}'",
                account.account_type
            )));
        }
        if account.project_id.trim().is_empty() {
            return Err(malformed("empty project_id".to_string()));
        }
        Ok(account)
    }
}

/// Validate a candidate path and load the service account it points to
pub fn validate_service_account_path(
    path: Option<&Path>,
    preferences: &Preferences,
) -> Result<ServiceAccount, CredentialError> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Err(CredentialError::MissingPath),
    };
    if !path.is_file() {
        return Err(CredentialError::NotFound(path.to_path_buf()));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(CredentialError::InvalidExtension(path.to_path_buf()));
    }
    let data = fs::read_to_string(path).map_err(|e| CredentialError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let account = ServiceAccount::from_json(path, &data)?;
    if preferences.is_blocklisted(&account.project_id) {
        return Err(CredentialError::Blocklisted(account.project_id));
    }
    Ok(account)
}

/// Outcome of [`resolve_credential`]
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub account: ServiceAccount,
    pub path: PathBuf,
    /// The preferences now carry a new default path and should be saved
    pub default_changed: bool,
}

/// Resolve the credential for a command.
///
/// `prompter` is the interactive fallback; without one every failure is fatal.
/// When no explicit path is given and the stored default is unusable, the
/// path the operator enters becomes the new default in `preferences`, and the
/// caller decides when to persist it.
pub fn resolve_credential(
    explicit_path: Option<&Path>,
    preferences: &mut Preferences,
    prompter: Option<&mut dyn Prompter>,
    message: Option<&str>,
) -> Result<ResolvedCredential> {
    let message = message.unwrap_or(DEFAULT_PATH_PROMPT);

    if let Some(path) = explicit_path {
        return match validate_service_account_path(Some(path), preferences) {
            Ok(account) => Ok(ResolvedCredential {
                account,
                path: path.to_path_buf(),
                default_changed: false,
            }),
            Err(err) => match prompter {
                Some(prompter) => {
                    print_error(&err.to_string());
                    let (account, path) = prompt_service_account(prompter, preferences, message)?;
                    Ok(ResolvedCredential {
                        account,
                        path,
                        default_changed: false,
                    })
                }
                None => Err(Abort::fatal(err.to_string()).into()),
            },
        };
    }

    let default = preferences.default_service_account().map(Path::to_path_buf);
    match validate_service_account_path(default.as_deref(), preferences) {
        Ok(account) => {
            tracing::debug!(project = %account.project_id, "using default service account");
            Ok(ResolvedCredential {
                account,
                path: default.unwrap_or_default(),
                default_changed: false,
            })
        }
        Err(err) => {
            let Some(prompter) = prompter else {
                return Err(Abort::fatal(err.to_string()).into());
            };
            if default.is_some() {
                print_error(&err.to_string());
            }
            let path = prompt_service_account_path(prompter, preferences, message)?;
            let account = validate_service_account_path(Some(&path), preferences)
                .map_err(|e| Abort::fatal(e.to_string()))?;
            preferences.set_default_service_account(&path);
            Ok(ResolvedCredential {
                account,
                path,
                default_changed: true,
            })
        }
    }
}

/// Ask for a path until it validates
pub fn prompt_service_account_path(
    prompter: &mut dyn Prompter,
    preferences: &Preferences,
    message: &str,
) -> Result<PathBuf> {
    let validate = |input: &str| {
        validate_service_account_path(Some(Path::new(input)), preferences)
            .map(|_| ())
            .map_err(|e| e.to_string())
    };
    prompter.input(message, &validate).map(PathBuf::from)
}

/// Ask for a path, then confirm the project it belongs to, until the operator accepts one
pub fn prompt_service_account(
    prompter: &mut dyn Prompter,
    preferences: &Preferences,
    message: &str,
) -> Result<(ServiceAccount, PathBuf)> {
    loop {
        let path = prompt_service_account_path(prompter, preferences, message)?;
        let account = validate_service_account_path(Some(&path), preferences)
            .map_err(|e| Abort::fatal(e.to_string()))?;
        let question = format!("Do you want to use the '{}' project ?", account.project_id);
        if prompter.confirm(&question)? {
            return Ok((account, path));
        }
    }
}
