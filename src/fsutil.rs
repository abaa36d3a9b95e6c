//! Filesystem primitives shared by the engines.
//!
//! Copies are plain overwrites and are not atomic; only manifest writes go
//! through [`write_atomic`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tracing::trace;
use walkdir::WalkDir;

use crate::config::to_package_relative;
use crate::error::{IoResultExt, Result, ThemeError};

/// Copy `from` to `to`, creating the destination's parent directories.
///
/// Returns the number of bytes copied.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    if !from.is_file() {
        return Err(ThemeError::SourceNotFound {
            path: from.display().to_string(),
        });
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| ThemeError::copy_failed(from, to, e))?;
    }
    let bytes = fs::copy(from, to).map_err(|e| ThemeError::copy_failed(from, to, e))?;
    trace!(from = %from.display(), to = %to.display(), bytes, "Copied file");
    Ok(bytes)
}

/// Write `contents` to a sibling temp file and rename it over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).at_path(parent)?;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let temp_name = format!(
        ".{}.tmp-{}-{stamp}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("manifest"),
        std::process::id(),
    );
    let temp_path = parent.join(temp_name);

    fs::write(&temp_path, contents).at_path(&temp_path)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ThemeError::io(path, e));
    }
    Ok(())
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).at_path(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).at_path(path)?;
    Ok(hex::encode(hasher.finalize()))
}

/// True when both files exist and hash identically.
pub fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    if !a.is_file() || !b.is_file() {
        return Ok(false);
    }
    if fs::metadata(a).at_path(a)?.len() != fs::metadata(b).at_path(b)?.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}

/// Every visible regular file under `root`, as sorted package-relative paths.
///
/// Hidden files and directories (names starting with `.`) are skipped, which
/// also keeps in-flight temp files out of manifests.
pub fn package_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
            ThemeError::io(path, io::Error::from(e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match to_package_relative(entry.path(), root) {
            Some(relative) => files.push(relative),
            None => trace!(path = %entry.path().display(), "Skipping non UTF-8 package file"),
        }
    }
    files.sort();
    Ok(files)
}

/// Remove a directory tree if present.
pub fn remove_dir_if_exists(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).at_path(dir)?;
    Ok(true)
}

/// The `<stem>.<ext>` directory for a package inside `parent`.
pub fn package_dir(parent: &Path, stem: &str, extension: &str) -> PathBuf {
    parent.join(format!("{stem}.{extension}"))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}
