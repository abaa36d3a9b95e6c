//! Reading and writing `manifest.json` inside a package directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{MANIFEST_FILE, Manifest};
use crate::error::{IoResultExt, Result, ThemeError};
use crate::fsutil::write_atomic;

pub fn manifest_path(package: &Path) -> PathBuf {
    package.join(MANIFEST_FILE)
}

/// Load a package's manifest.
///
/// A missing package directory and a missing manifest are distinct
/// `NotFound` errors; malformed JSON is a parse error.
#[instrument(skip_all, fields(package = %package.display()))]
pub fn read(package: &Path) -> Result<Manifest> {
    if !package.is_dir() {
        return Err(ThemeError::package_not_found(package));
    }
    let path = manifest_path(package);
    if !path.is_file() {
        return Err(ThemeError::ManifestNotFound {
            path: package.display().to_string(),
        });
    }

    let raw = fs::read_to_string(&path).at_path(&path)?;
    let manifest: Manifest =
        serde_json::from_str(&raw).map_err(|e| ThemeError::ManifestParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    debug!(kind = %manifest.kind, mappings = manifest.mapping_count(), "Read manifest");
    Ok(manifest)
}

/// Serialize and atomically replace a package's manifest.
#[instrument(skip_all, fields(package = %package.display()))]
pub fn write(package: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let mut json = serde_json::to_string_pretty(manifest)
        .map_err(|e| ThemeError::Other(format!("Failed to serialize manifest: {e}")))?;
    json.push('\n');

    let path = manifest_path(package);
    write_atomic(&path, json.as_bytes())?;
    debug!(path = %path.display(), bytes = json.len(), "Wrote manifest");
    Ok(path)
}
