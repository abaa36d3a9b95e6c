//! Discovery of the systems installed on a device.
//!
//! The inventory is a read-only snapshot: it is recomputed for every
//! operation and never persisted.

mod scanner;

pub use scanner::{discover, ensure_media_directories, extract_tag};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::DeviceLayout;

/// One detected system directory under the ROM root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// Directory name, e.g. `Game Boy Advance (GBA)`.
    pub name: String,
    /// Contents of the last parenthesized group of `name`; empty if none.
    pub tag: String,
    pub path: PathBuf,
    /// The system's `.media` folder.
    pub media_path: PathBuf,
}

impl SystemInfo {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        let name = name.into();
        let tag = extract_tag(&name).to_string();
        let media_path = crate::config::layout::media_dir(&path);
        Self {
            name,
            tag,
            path,
            media_path,
        }
    }

    pub fn has_tag(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// Snapshot of the device's menu roots and systems.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInventory {
    pub root: PathBuf,
    pub recently_played: PathBuf,
    pub tools: PathBuf,
    pub collections_root: PathBuf,
    /// Systems sorted by directory name.
    pub systems: Vec<SystemInfo>,
    /// Collection directory names sorted.
    pub collections: Vec<String>,
}

impl SystemInventory {
    /// Menu roots only, with no systems or collections. Used where nothing
    /// resolves through a system directory and `Roms/` may be absent.
    pub fn empty(layout: &DeviceLayout) -> Self {
        Self {
            root: layout.root().to_path_buf(),
            recently_played: layout.recently_played_dir(),
            tools: layout.tools_dir(),
            collections_root: layout.collections_dir(),
            systems: Vec::new(),
            collections: Vec::new(),
        }
    }

    /// Exact, case-sensitive directory name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&SystemInfo> {
        self.systems.iter().find(|s| s.name == name)
    }

    /// First system carrying `tag`. Empty tags never match.
    pub fn find_by_tag(&self, tag: &str) -> Option<&SystemInfo> {
        if tag.is_empty() {
            return None;
        }
        self.systems.iter().find(|s| s.tag == tag)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
