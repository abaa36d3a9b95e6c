//! Directory scanning for installed systems.
//!
//! Lists the ROM root's immediate subdirectories and derives each system's tag
//! from its directory name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace};

use super::{SystemInfo, SystemInventory};
use crate::config::DeviceLayout;
use crate::config::layout::media_dir;
use crate::error::{IoResultExt, Result, ThemeError};

/// Extracts the tag from a system directory name.
///
/// The tag is the contents of the last `(...)` group:
/// - `Game Boy Advance (GBA)` → `GBA`
/// - `Arcade (FBN) (MAME)` → `MAME`
/// - `Tools` → `` (empty)
pub fn extract_tag(name: &str) -> &str {
    let Some(open) = name.rfind('(') else {
        return "";
    };
    let rest = &name[open + 1..];
    match rest.find(')') {
        Some(close) => rest[..close].trim(),
        None => "",
    }
}

/// Scans the device and produces the system inventory.
///
/// Hidden entries (including `.media`) and plain files are skipped. Systems
/// and collections come back sorted by name so downstream walks are
/// deterministic.
#[instrument(skip_all, fields(root = %layout.root().display()))]
pub fn discover(layout: &DeviceLayout) -> Result<SystemInventory> {
    let roms = layout.roms_dir();
    if !roms.is_dir() {
        return Err(ThemeError::RomRootNotFound {
            path: roms.display().to_string(),
        });
    }

    let systems = list_visible_dirs(&roms)?
        .into_iter()
        .map(|(name, path)| {
            let info = SystemInfo::new(name, path);
            debug!(name = %info.name, tag = %info.tag, "Detected system");
            info
        })
        .collect::<Vec<_>>();

    let collections_root = layout.collections_dir();
    let collections = if collections_root.is_dir() {
        list_visible_dirs(&collections_root)?
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    } else {
        Vec::new()
    };

    info!(
        systems = systems.len(),
        collections = collections.len(),
        "Inventory complete"
    );

    Ok(SystemInventory {
        root: layout.root().to_path_buf(),
        recently_played: layout.recently_played_dir(),
        tools: layout.tools_dir(),
        collections_root,
        systems,
        collections,
    })
}

/// Creates the `.media` folder for the root, recently played, tools and every
/// system. Safe to call repeatedly.
#[instrument(skip_all)]
pub fn ensure_media_directories(inventory: &SystemInventory) -> Result<Vec<PathBuf>> {
    let mut dirs = vec![
        media_dir(&inventory.root),
        media_dir(&inventory.recently_played),
        media_dir(&inventory.tools),
    ];
    dirs.extend(inventory.systems.iter().map(|s| s.media_path.clone()));

    let mut created = Vec::new();
    for dir in dirs {
        if dir.is_dir() {
            trace!(dir = %dir.display(), "Media directory present");
            continue;
        }
        fs::create_dir_all(&dir).at_path(&dir)?;
        debug!(dir = %dir.display(), "Created media directory");
        created.push(dir);
    }
    info!(created = created.len(), "Media directories ensured");
    Ok(created)
}

fn list_visible_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).at_path(dir)? {
        let entry = entry.at_path(dir)?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            trace!(path = %path.display(), "Skipping non UTF-8 entry");
            continue;
        };
        if name.starts_with('.') {
            trace!(name = %name, "Skipping hidden entry");
            continue;
        }
        if !path.is_dir() {
            continue;
        }
        entries.push((name, path));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}
