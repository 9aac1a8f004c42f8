//! Choice of the file an export writes to

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;

use crate::cli::Prompter;
use crate::error::Abort;

/// Resolve the output file of an export before it starts.
///
/// Without a requested path a `<prefix>-<unix millis>.json` name is generated.
/// An existing file is kept unless `overwrite` is set or the operator chooses
/// to overwrite it; "keep both" switches to the first free `<stem>-<n>.<ext>`.
pub fn resolve_output_path(
    requested: Option<&Path>,
    overwrite: bool,
    prefix: &str,
    prompter: Option<&mut dyn Prompter>,
) -> Result<PathBuf> {
    let path = requested
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_file_name(prefix));

    if overwrite || !path.exists() {
        return Ok(path);
    }

    let Some(prompter) = prompter else {
        return Err(Abort::fatal(format!("File already exists: {}", path.display())).into());
    };

    let alternative = next_free_path(&path);
    let choices = vec![
        "Overwrite it".to_string(),
        format!("Keep both, write to {}", alternative.display()),
        "Cancel".to_string(),
    ];
    let message = format!("File already exists: {}", path.display());
    match prompter.select(&message, &choices)? {
        0 => Ok(path),
        1 => Ok(alternative),
        _ => Err(Abort::Cancelled.into()),
    }
}

/// `<prefix>-<unix millis>.json` in the working directory
pub fn default_file_name(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}.json", prefix, Utc::now().timestamp_millis()))
}

/// First `<stem>-<n>.<ext>` next to `path` that does not exist, counting from 1
pub fn next_free_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    (1u64..)
        .map(|n| {
            let name = match &extension {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            parent.join(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
