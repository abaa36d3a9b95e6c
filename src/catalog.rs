//! Listing the packages in a local directory.
//!
//! Package sources (downloads, shared folders) hand the engine a plain
//! directory tree; this turns it into entries a browser can show.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{IoResultExt, Result, ThemeError};
use crate::kind::ComponentKind;
use crate::manifest::{self, PREVIEW_FILE, package_name};

/// One package found in a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: ComponentKind,
    pub path: PathBuf,
    pub has_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub mappings: usize,
    /// Why the manifest could not be read, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogEntry {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// List package directories directly inside `dir`, sorted by name then kind.
///
/// Directories without a package extension are ignored. A package whose
/// manifest is missing or malformed is still listed, with `error` set.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn list_packages(dir: &Path) -> Result<Vec<CatalogEntry>> {
    if !dir.is_dir() {
        return Err(ThemeError::SourceNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).at_path(dir)? {
        let path = entry.at_path(dir)?.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(kind) = ComponentKind::from_package_path(&path) else {
            trace!(path = %path.display(), "Not a package directory");
            continue;
        };
        entries.push(describe(path, kind));
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name).then(a.kind.cmp(&b.kind)));

    debug!(packages = entries.len(), "Listed packages");
    Ok(entries)
}

fn describe(path: PathBuf, kind: ComponentKind) -> CatalogEntry {
    let has_preview = path.join(PREVIEW_FILE).is_file();
    let mut entry = CatalogEntry {
        name: package_name(&path),
        kind,
        path,
        has_preview,
        author: None,
        version: None,
        mappings: 0,
        error: None,
    };
    match manifest::read(&entry.path) {
        Ok(manifest) => {
            entry.mappings = manifest.mapping_count();
            entry.author = Some(manifest.info.author);
            entry.version = Some(manifest.info.version);
        }
        Err(e) => entry.error = Some(e.to_string()),
    }
    entry
}
