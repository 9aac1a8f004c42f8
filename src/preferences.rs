//! Persisted preferences: the default service account path and the project blocklist.
//!
//! The record is loaded, modified in memory and written back whole by the
//! caller. There is no locking; concurrent invocations race and the last
//! writer wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading or writing the preference file
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Config file corrupted, please fix it or delete it: {}", path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to access config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The persisted preference record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredPreferences")]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_path: Option<PathBuf>,

    pub blocklist: Vec<String>,
}

/// Preference file as read, where older files may still carry `blacklist`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    #[serde(default)]
    service_account_path: Option<PathBuf>,

    #[serde(default)]
    blocklist: Vec<String>,

    #[serde(default)]
    blacklist: Vec<String>,
}

impl From<StoredPreferences> for Preferences {
    fn from(stored: StoredPreferences) -> Self {
        let mut preferences = Preferences {
            service_account_path: stored.service_account_path,
            blocklist: Vec::new(),
        };
        preferences.add_to_blocklist(&stored.blocklist);
        preferences.add_to_blocklist(&stored.blacklist);
        preferences
    }
}

impl Preferences {
    pub fn default_service_account(&self) -> Option<&Path> {
        self.service_account_path.as_deref()
    }

    pub fn set_default_service_account(&mut self, path: impl Into<PathBuf>) {
        self.service_account_path = Some(path.into());
    }

    pub fn is_blocklisted(&self, project_id: &str) -> bool {
        self.blocklist.iter().any(|id| id == project_id)
    }

    /// Add project ids not already present, returning the ones actually added.
    pub fn add_to_blocklist<S: AsRef<str>>(&mut self, project_ids: &[S]) -> Vec<String> {
        let mut added = Vec::new();
        for id in project_ids {
            let id = id.as_ref();
            if !self.is_blocklisted(id) {
                self.blocklist.push(id.to_string());
                added.push(id.to_string());
            }
        }
        added
    }

    /// Remove project ids, returning the ones that were present.
    pub fn remove_from_blocklist<S: AsRef<str>>(&mut self, project_ids: &[S]) -> Vec<String> {
        let (removed, kept): (Vec<String>, Vec<String>) = self
            .blocklist
            .drain(..)
            .partition(|id| project_ids.iter().any(|r| r.as_ref() == id));
        self.blocklist = kept;
        removed
    }
}

/// Location of the preference file on disk
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default preference file under the user's config directory
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docport")
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the preference record, creating an empty one on first access.
    pub fn load(&self) -> Result<Preferences, PreferenceError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "creating preference file");
            self.save(&Preferences::default())?;
        }
        let data = fs::read_to_string(&self.path).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| PreferenceError::Corrupted {
            path: self.path.clone(),
            source,
        })
    }

    /// Rewrite the whole preference record.
    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        let io_err = |source: io::Error| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| io_err(io::Error::other(e)))?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested").join("config.json"));

        let prefs = store.load().unwrap();

        assert_eq!(prefs, Preferences::default());
        let written = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value, serde_json::json!({ "blocklist": [] }));
    }

    #[test]
    fn test_default_path_round_trip_with_fresh_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let store = PreferenceStore::new(&path);
        let mut prefs = store.load().unwrap();
        prefs.set_default_service_account("/keys/prod.json");
        store.save(&prefs).unwrap();

        let reloaded = PreferenceStore::new(&path).load().unwrap();
        assert_eq!(
            reloaded.default_service_account(),
            Some(Path::new("/keys/prod.json"))
        );
    }

    #[test]
    fn test_blocklist_add_then_remove() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.add_to_blocklist(&["a", "b"]), vec!["a", "b"]);
        assert_eq!(prefs.remove_from_blocklist(&["a"]), vec!["a"]);
        assert_eq!(prefs.blocklist, vec!["b"]);
    }

    #[test]
    fn test_blocklist_has_no_duplicates() {
        let mut prefs = Preferences::default();
        prefs.add_to_blocklist(&["a"]);
        let added = prefs.add_to_blocklist(&["a", "b", "b"]);
        assert_eq!(added, vec!["b"]);
        assert_eq!(prefs.blocklist, vec!["a", "b"]);
    }

    #[test]
    fn test_removing_unknown_id_is_a_no_op() {
        let mut prefs = Preferences::default();
        prefs.add_to_blocklist(&["a"]);
        assert!(prefs.remove_from_blocklist(&["z"]).is_empty());
        assert_eq!(prefs.blocklist, vec!["a"]);
    }

    #[test]
    fn test_legacy_blacklist_and_unknown_fields() {
        let prefs: Preferences = serde_json::from_str(
            r#"{"serviceAccountPath":"sa.json","blacklist":["prod"],"theme":"dark"}"#,
        )
        .unwrap();
        assert_eq!(prefs.default_service_account(), Some(Path::new("sa.json")));
        assert!(prefs.is_blocklisted("prod"));
    }

    #[test]
    fn test_blocklist_and_blacklist_keys_are_merged() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"blocklist":["a","b"],"blacklist":["b","c"]}"#).unwrap();
        assert_eq!(prefs.blocklist, vec!["a", "b", "c"]);

        let written = serde_json::to_value(&prefs).unwrap();
        assert_eq!(written, serde_json::json!({ "blocklist": ["a", "b", "c"] }));
    }

    #[test]
    fn test_file_with_both_keys_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"blacklist":["legacy"],"blocklist":["prod"]}"#).unwrap();

        let prefs = PreferenceStore::new(&path).load().unwrap();

        assert!(prefs.is_blocklisted("legacy"));
        assert!(prefs.is_blocklisted("prod"));
    }

    #[test]
    fn test_missing_blocklist_is_empty() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert!(prefs.blocklist.is_empty());
        assert!(prefs.default_service_account().is_none());
    }

    #[test]
    fn test_corrupted_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = PreferenceStore::new(&path).load().unwrap_err();
        assert!(matches!(err, PreferenceError::Corrupted { .. }));
        assert!(err.to_string().starts_with("Config file corrupted"));
    }
}
