//! Export and import of the remote config template

use std::path::Path;

use serde_json::Value;

use crate::store::RemoteConfig;
use crate::utils::{abandon_on_error, create_spinner, finish_with_success};

use super::{read_json_file, write_json_file, TransferError, TransferOptions};

/// Write the current template of `store` to `path`
pub fn export_remote_config(
    store: &dyn RemoteConfig,
    path: &Path,
    options: &TransferOptions,
) -> Result<Value, TransferError> {
    let spinner = create_spinner("Fetching remote config", options.show_progress);
    let template = options
        .retry
        .run("get_template", || store.get_template())
        .map_err(|err| {
            abandon_on_error(&spinner);
            TransferError::RemoteConfig {
                action: "fetched",
                source: err,
            }
        })?;

    write_json_file(path, &template).inspect_err(|_| abandon_on_error(&spinner))?;
    finish_with_success(&spinner, "Remote config exported");
    tracing::info!(path = %path.display(), "exported remote config");
    Ok(template)
}

/// Validate the template stored at `path` and publish it, returning the published version
pub fn import_remote_config(
    store: &mut dyn RemoteConfig,
    path: &Path,
    options: &TransferOptions,
) -> Result<Value, TransferError> {
    let template: Value = read_json_file(path)?;
    let template = store
        .validate_template(template)
        .map_err(|err| TransferError::RemoteConfig {
            action: "validated",
            source: err,
        })?;

    let spinner = create_spinner("Publishing remote config", options.show_progress);
    let published = options
        .retry
        .run("publish_template", || store.publish_template(template.clone()))
        .map_err(|err| {
            abandon_on_error(&spinner);
            TransferError::RemoteConfig {
                action: "published",
                source: err,
            }
        })?;
    finish_with_success(&spinner, "Remote config published");
    let version = published
        .pointer("/version/versionNumber")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    tracing::info!(version, "published remote config");
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_export_then_import_into_another_project() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("remote_config.json");
        let mut source = MemoryStore::new("src");
        source
            .publish_template(json!({ "parameters": { "welcome": { "defaultValue": { "value": "hi" } } } }))
            .unwrap();

        export_remote_config(&source, &path, &TransferOptions::quiet()).unwrap();
        let mut destination = MemoryStore::new("dst");
        let published = import_remote_config(&mut destination, &path, &TransferOptions::quiet())
            .unwrap();

        assert_eq!(published["parameters"]["welcome"]["defaultValue"]["value"], "hi");
        assert_eq!(published["version"]["versionNumber"], "1");
    }

    #[test]
    fn test_invalid_template_is_not_published() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("remote_config.json");
        fs::write(&path, r#"{"parameters": {"x": {}}}"#).unwrap();
        let mut store = MemoryStore::new("dst");

        let err = import_remote_config(&mut store, &path, &TransferOptions::quiet()).unwrap_err();

        assert!(matches!(
            err,
            TransferError::RemoteConfig {
                action: "validated",
                ..
            }
        ));
        assert_eq!(store.get_template().unwrap(), crate::store::empty_template());
    }
}
