//! Inverse mapping: every device slot a kind covers.
//!
//! Each slot is expressed as the package path it would be stored under and then
//! run through forward resolution, so `resolve(slot.package_path)` always
//! yields `slot.device_path` on the same device.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument, trace};

use super::{
    COLLECTION_ICONS, COLLECTION_WALLPAPERS, FONTS, LIST_WALLPAPERS, MENU_SLOTS, OVERLAYS,
    PathResolver, SYSTEM_ICONS, SYSTEM_WALLPAPERS, TOOL_ICONS,
};
use crate::config::layout::{BACKGROUND_FILE, LIST_BACKGROUND_FILE, media_dir};
use crate::config::{DeviceLayout, FontSlot};
use crate::error::{IoResultExt, Result};
use crate::inventory::SystemInventory;
use crate::kind::ComponentKind;
use crate::manifest::PathMapping;

/// Enumerate the device slots owned by `kind`.
///
/// Fixed slots (specials, per-system files, fonts) are listed whether or not
/// the device file exists; tool icons, collection icons and overlays are
/// discovered by listing their device folders. Callers copy only the slots
/// whose device file exists.
#[instrument(skip(layout, inventory))]
pub fn device_slots(
    layout: &DeviceLayout,
    inventory: &SystemInventory,
    kind: ComponentKind,
) -> Result<Vec<PathMapping>> {
    let resolver = PathResolver::live(layout, inventory);
    let mut package_paths = Vec::new();

    match kind {
        ComponentKind::Wallpaper => {
            for special in ["Root", "Root-Media"].into_iter().chain(MENU_SLOTS) {
                package_paths.push(format!("{SYSTEM_WALLPAPERS}/{special}.png"));
            }
            for special in ["Root"].into_iter().chain(MENU_SLOTS) {
                package_paths.push(format!("{LIST_WALLPAPERS}/{special}-list.png"));
            }
            for system in regular_systems(inventory) {
                package_paths.push(format!("{SYSTEM_WALLPAPERS}/{system}.png"));
                package_paths.push(format!("{LIST_WALLPAPERS}/{system}-list.png"));
            }
            for collection in &inventory.collections {
                package_paths.push(format!("{COLLECTION_WALLPAPERS}/{collection}.png"));
            }
        }
        ComponentKind::Icon => {
            for special in MENU_SLOTS {
                package_paths.push(format!("{SYSTEM_ICONS}/{special}.png"));
            }
            for system in regular_systems(inventory) {
                package_paths.push(format!("{SYSTEM_ICONS}/{system}.png"));
            }
            for tool in media_icons(&media_dir(&layout.tools_dir()))? {
                package_paths.push(format!("{TOOL_ICONS}/{tool}"));
            }
            for collection in media_icons(&media_dir(&layout.collections_dir()))? {
                package_paths.push(format!("{COLLECTION_ICONS}/{collection}"));
            }
        }
        ComponentKind::Overlay => {
            for (tag, file) in overlay_files(&layout.overlays_dir())? {
                package_paths.push(format!("{OVERLAYS}/{tag}/{file}"));
            }
        }
        ComponentKind::Font => {
            for slot in FontSlot::ALL {
                package_paths.push(format!("{FONTS}/{}", slot.package_file()));
            }
        }
        ComponentKind::FullTheme | ComponentKind::Accent | ComponentKind::Led => {}
    }

    let slots: Vec<PathMapping> = package_paths
        .into_iter()
        .filter_map(|package_path| {
            let resolution = resolver.resolve(kind, &package_path, None)?;
            Some(PathMapping::new(package_path, resolution.device_path, resolution.metadata))
        })
        .collect();

    debug!(kind = %kind, slots = slots.len(), "Enumerated device slots");
    Ok(slots)
}

/// System names that do not collide with a fixed menu slot.
fn regular_systems(inventory: &SystemInventory) -> impl Iterator<Item = &str> {
    inventory.systems.iter().filter_map(|system| {
        let name = system.name.as_str();
        if MENU_SLOTS.contains(&name) || name == "Root" || name == "Root-Media" {
            trace!(name, "System name shadows a menu slot; skipping");
            None
        } else {
            Some(name)
        }
    })
}

/// `.png` files in a media folder other than its own backgrounds.
fn media_icons(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut icons = Vec::new();
    for entry in fs::read_dir(dir).at_path(dir)? {
        let entry = entry.at_path(dir)?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if name.starts_with('.')
            || !name.ends_with(".png")
            || name == BACKGROUND_FILE
            || name == LIST_BACKGROUND_FILE
        {
            continue;
        }
        icons.push(name);
    }
    icons.sort();
    Ok(icons)
}

/// `(tag, file)` pairs for every `Overlays/<tag>/<file>.png` on the device.
fn overlay_files(dir: &Path) -> Result<Vec<(String, String)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).at_path(dir)? {
        let entry = entry.at_path(dir)?;
        let tag_dir = entry.path();
        let Some(tag) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if tag.starts_with('.') || !tag_dir.is_dir() {
            continue;
        }
        for file in fs::read_dir(&tag_dir).at_path(&tag_dir)? {
            let file = file.at_path(&tag_dir)?;
            let Some(name) = file.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if file.path().is_file() && name.ends_with(".png") && !name.starts_with('.') {
                files.push((tag.clone(), name));
            }
        }
    }
    files.sort();
    Ok(files)
}
