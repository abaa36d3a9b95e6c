//! Translation between package-relative paths and device paths.
//!
//! # Rules
//!
//! | Package location | Device destination |
//! |------------------|--------------------|
//! | `SystemWallpapers/<System>.png` | `<system>/.media/bg.png` |
//! | `SystemWallpapers/Root.png` | `<root>/bg.png` |
//! | `SystemWallpapers/Root-Media.png` | `<root>/.media/bg.png` |
//! | `SystemWallpapers/{Recently Played,Tools,Collections}.png` | `<menu dir>/.media/bg.png` |
//! | `ListWallpapers/<System>-list.png` | `<system or menu dir>/.media/bglist.png` |
//! | `CollectionWallpapers/<Name>.png` | `Collections/<Name>/.media/bg.png` |
//! | `SystemIcons/<System>.png` | `Roms/.media/<System Dir>.png` |
//! | `SystemIcons/{Recently Played,Tools,Collections}.png` | `<root>/.media/<Name>.png` |
//! | `ToolIcons/<Tool>.png` | `Tools/<platform>/.media/<Tool>.png` |
//! | `CollectionIcons/<Name>.png` | `Collections/.media/<Name>.png` |
//! | `Overlays/<TAG>/<file>.png` | `Overlays/<TAG>/<file>.png` |
//! | `Fonts/{OG,Next}[.backup].ttf` | font slots |
//!
//! Special names are matched exactly and case-sensitively. Anything else
//! resolves to `None`, which callers treat as "skip this file".

mod slots;

pub use slots::device_slots;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::trace;

use crate::config::layout::{BACKGROUND_FILE, LIST_BACKGROUND_FILE, media_dir};
use crate::config::{DeviceLayout, FontSlot, segments};
use crate::inventory::{SystemInventory, extract_tag};
use crate::kind::ComponentKind;

pub const META_SYSTEM_NAME: &str = "SystemName";
pub const META_SYSTEM_TAG: &str = "SystemTag";
pub const META_OVERLAY_NAME: &str = "OverlayName";
pub const META_COLLECTION_NAME: &str = "CollectionName";
pub const META_TOOL_NAME: &str = "ToolName";
pub const META_FONT_SLOT: &str = "FontSlot";
pub const META_SLOT: &str = "Slot";

pub const SYSTEM_WALLPAPERS: &str = "SystemWallpapers";
pub const LIST_WALLPAPERS: &str = "ListWallpapers";
pub const COLLECTION_WALLPAPERS: &str = "CollectionWallpapers";
pub const SYSTEM_ICONS: &str = "SystemIcons";
pub const TOOL_ICONS: &str = "ToolIcons";
pub const COLLECTION_ICONS: &str = "CollectionIcons";
pub const OVERLAYS: &str = "Overlays";
pub const FONTS: &str = "Fonts";

const ROOT: &str = "Root";
const ROOT_MEDIA: &str = "Root-Media";
const RECENTLY_PLAYED: &str = "Recently Played";
const TOOLS: &str = "Tools";
const COLLECTIONS: &str = "Collections";
const LIST_SUFFIX: &str = "-list";
const PNG: &str = ".png";

/// Names with fixed meaning under `SystemWallpapers/` and `SystemIcons/`.
pub const MENU_SLOTS: [&str; 3] = [RECENTLY_PLAYED, TOOLS, COLLECTIONS];

/// Where a package file lands on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub device_path: PathBuf,
    pub metadata: BTreeMap<String, String>,
}

impl Resolution {
    fn new(device_path: PathBuf) -> Self {
        Self {
            device_path,
            metadata: BTreeMap::new(),
        }
    }

    fn with(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// How system names are turned into system directories.
#[derive(Debug, Clone, Copy)]
enum SystemLookup<'a> {
    /// Match against the systems actually present on a device.
    Live(&'a SystemInventory),
    /// Take the name as the directory name; no device required.
    Conventional,
}

/// A system directory chosen for a package file.
struct SystemTarget {
    name: String,
    tag: String,
    media_path: PathBuf,
}

/// Resolves package-relative paths against a device layout.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    layout: &'a DeviceLayout,
    lookup: SystemLookup<'a>,
}

impl<'a> PathResolver<'a> {
    /// Resolver backed by a discovered inventory.
    pub const fn live(layout: &'a DeviceLayout, inventory: &'a SystemInventory) -> Self {
        Self {
            layout,
            lookup: SystemLookup::Live(inventory),
        }
    }

    /// Resolver that needs no device: system names map to same-named
    /// directories under the ROM root.
    pub const fn conventional(layout: &'a DeviceLayout) -> Self {
        Self {
            layout,
            lookup: SystemLookup::Conventional,
        }
    }

    pub const fn layout(&self) -> &DeviceLayout {
        self.layout
    }

    /// The kind that owns a package file, if any.
    ///
    /// Inside a `.font` package the font files sit bare at the root.
    pub fn classify(kind: ComponentKind, package_path: &str) -> Option<ComponentKind> {
        let segs = segments(package_path);
        let first = *segs.first()?;
        if kind == ComponentKind::Font && segs.len() == 1 {
            return FontSlot::from_package_file(first).map(|_| ComponentKind::Font);
        }
        let owner = ComponentKind::owning_dir(first)?;
        (kind == ComponentKind::FullTheme || kind == owner).then_some(owner)
    }

    /// Resolve a package file to its device destination.
    ///
    /// `context_tag` is the fallback system tag used when a system file's own
    /// name carries no `(TAG)` and matches no system directory by name.
    pub fn resolve(
        &self,
        kind: ComponentKind,
        package_path: &str,
        context_tag: Option<&str>,
    ) -> Option<Resolution> {
        let owner = Self::classify(kind, package_path)?;
        let segs = segments(package_path);

        let resolution = match (owner, segs.as_slice()) {
            (ComponentKind::Font, [file] | [FONTS, file]) => self.resolve_font(file),
            (ComponentKind::Wallpaper, [SYSTEM_WALLPAPERS, file]) => {
                self.resolve_system_wallpaper(png_stem(file)?, context_tag)
            }
            (ComponentKind::Wallpaper, [LIST_WALLPAPERS, file]) => {
                let base = png_stem(file)?.strip_suffix(LIST_SUFFIX)?;
                self.resolve_list_wallpaper(base, context_tag)
            }
            (ComponentKind::Wallpaper, [COLLECTION_WALLPAPERS, file]) => {
                let name = png_stem(file)?;
                Some(
                    Resolution::new(
                        media_dir(&self.layout.collections_dir().join(name)).join(BACKGROUND_FILE),
                    )
                    .with(META_COLLECTION_NAME, name),
                )
            }
            (ComponentKind::Icon, [SYSTEM_ICONS, file]) => {
                self.resolve_system_icon(png_stem(file)?, context_tag)
            }
            (ComponentKind::Icon, [TOOL_ICONS, file]) => {
                let name = png_stem(file)?;
                Some(
                    Resolution::new(media_dir(&self.layout.tools_dir()).join(*file))
                        .with(META_TOOL_NAME, name),
                )
            }
            (ComponentKind::Icon, [COLLECTION_ICONS, file]) => {
                let name = png_stem(file)?;
                Some(
                    Resolution::new(media_dir(&self.layout.collections_dir()).join(*file))
                        .with(META_COLLECTION_NAME, name),
                )
            }
            (ComponentKind::Overlay, [OVERLAYS, tag, file]) => {
                png_stem(file)?;
                Some(
                    Resolution::new(self.layout.overlays_dir().join(tag).join(file))
                        .with(META_SYSTEM_TAG, tag)
                        .with(META_OVERLAY_NAME, file),
                )
            }
            _ => None,
        };

        trace!(
            package_path,
            resolved = ?resolution.as_ref().map(|r| r.device_path.display().to_string()),
            "Resolved package path"
        );
        resolution
    }

    fn resolve_font(&self, file: &str) -> Option<Resolution> {
        let slot = FontSlot::from_package_file(file)?;
        Some(Resolution::new(self.layout.font_path(slot)).with(META_FONT_SLOT, slot.name()))
    }

    fn resolve_system_wallpaper(&self, stem: &str, context_tag: Option<&str>) -> Option<Resolution> {
        let fixed = match stem {
            ROOT => Some(self.layout.root_background()),
            ROOT_MEDIA => Some(self.layout.root_media_dir().join(BACKGROUND_FILE)),
            _ => self.menu_dir(stem).map(|dir| media_dir(&dir).join(BACKGROUND_FILE)),
        };
        if let Some(path) = fixed {
            return Some(Resolution::new(path).with(META_SLOT, stem));
        }
        let system = self.lookup_system(stem, context_tag)?;
        Some(system_resolution(system.media_path.join(BACKGROUND_FILE), &system))
    }

    fn resolve_list_wallpaper(&self, base: &str, context_tag: Option<&str>) -> Option<Resolution> {
        let fixed = match base {
            ROOT => Some(self.layout.root_media_dir()),
            _ => self.menu_dir(base).map(|dir| media_dir(&dir)),
        };
        if let Some(dir) = fixed {
            return Some(Resolution::new(dir.join(LIST_BACKGROUND_FILE)).with(META_SLOT, base));
        }
        let system = self.lookup_system(base, context_tag)?;
        Some(system_resolution(system.media_path.join(LIST_BACKGROUND_FILE), &system))
    }

    fn resolve_system_icon(&self, stem: &str, context_tag: Option<&str>) -> Option<Resolution> {
        if MENU_SLOTS.contains(&stem) {
            return Some(
                Resolution::new(self.layout.root_media_dir().join(format!("{stem}{PNG}")))
                    .with(META_SLOT, stem),
            );
        }
        let system = self.lookup_system(stem, context_tag)?;
        let path = self
            .layout
            .system_icons_dir()
            .join(format!("{}{PNG}", system.name));
        Some(system_resolution(path, &system))
    }

    /// Directory behind one of the fixed menu entries.
    fn menu_dir(&self, name: &str) -> Option<PathBuf> {
        match name {
            RECENTLY_PLAYED => Some(self.layout.recently_played_dir()),
            TOOLS => Some(self.layout.tools_dir()),
            COLLECTIONS => Some(self.layout.collections_dir()),
            _ => None,
        }
    }

    /// Pick the system directory a file stem refers to.
    ///
    /// Live lookup tries the exact directory name first, then the tag embedded
    /// in the stem, then the caller's context tag.
    fn lookup_system(&self, stem: &str, context_tag: Option<&str>) -> Option<SystemTarget> {
        if stem.is_empty() {
            return None;
        }
        let embedded = extract_tag(stem);
        let tag = if embedded.is_empty() {
            context_tag.unwrap_or_default()
        } else {
            embedded
        };

        match self.lookup {
            SystemLookup::Live(inventory) => {
                let system = inventory
                    .find_by_name(stem)
                    .or_else(|| inventory.find_by_tag(tag))?;
                Some(SystemTarget {
                    name: system.name.clone(),
                    tag: system.tag.clone(),
                    media_path: system.media_path.clone(),
                })
            }
            SystemLookup::Conventional => Some(SystemTarget {
                name: stem.to_string(),
                tag: tag.to_string(),
                media_path: media_dir(&self.layout.roms_dir().join(stem)),
            }),
        }
    }
}

fn system_resolution(path: PathBuf, system: &SystemTarget) -> Resolution {
    let resolution = Resolution::new(path).with(META_SYSTEM_NAME, &system.name);
    if system.tag.is_empty() {
        resolution
    } else {
        resolution.with(META_SYSTEM_TAG, &system.tag)
    }
}

fn png_stem(file: &str) -> Option<&str> {
    file.strip_suffix(PNG).filter(|stem| !stem.is_empty())
}
