//! Path helpers for configured locations and package-relative paths.
//!
//! Supports absolute paths, paths relative to the config file, and "~" home
//! directory expansion. Package-relative paths are always stored with forward
//! slashes regardless of host platform.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, ThemeError};

/// Resolve a path taken from a config file or flag.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to `base_dir`
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        base_dir = %base_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(base_dir.join(path))
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| ThemeError::ConfigParse("Could not determine home directory".to_string()))
}

/// Render a path relative to `base` as forward-slash segments.
///
/// Returns `None` when `path` is not under `base` or contains non-UTF-8 or
/// parent (`..`) components.
pub fn to_package_relative(path: &Path, base: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Join forward-slash package segments onto a host directory.
pub fn join_package_relative(base: &Path, package_path: &str) -> PathBuf {
    package_path
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |acc, seg| acc.join(seg))
}

/// Split a package path into its non-empty segments.
pub fn segments(package_path: &str) -> Vec<&str> {
    package_path.split('/').filter(|s| !s.is_empty()).collect()
}

/// File stem of the last segment (`"SystemIcons/Tools.png"` → `"Tools"`).
pub fn file_stem(segment: &str) -> &str {
    segment.rsplit_once('.').map_or(segment, |(stem, _)| stem)
}
