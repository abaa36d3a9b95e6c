//! Manifest data types and their JSON wire shape.
//!
//! [`Manifest`] is the in-memory model; it serializes through
//! [`ManifestDocument`], which mirrors the on-disk keys exactly
//! (`theme_info` / `component_info`, grouped or flat `path_mappings`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::kind::ComponentKind;
use crate::resolver::PathResolver;

/// Version stamped into freshly exported packages.
pub const PACKAGE_VERSION: &str = "1.0.0";
/// Author recorded when none is configured.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Tool identification written into `exported_by`.
pub fn exported_by() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// One file entry: where it lives in the package and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    /// Relative, forward-slash separated.
    #[serde(rename = "theme_path", alias = "package_path")]
    pub package_path: String,
    /// Absolute device path.
    pub device_path: PathBuf,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl PathMapping {
    pub fn new(
        package_path: impl Into<String>,
        device_path: PathBuf,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            package_path: package_path.into(),
            device_path,
            metadata,
        }
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Identifying block shared by themes and components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "Utc::now")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub exported_by: String,
}

impl PackageInfo {
    /// Fresh info stamped now by this tool.
    pub fn new(name: impl Into<String>, author: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            author: author
                .filter(|a| !a.trim().is_empty())
                .map_or_else(default_author, str::to_string),
            creation_date: Utc::now(),
            exported_by: exported_by(),
        }
    }
}

fn default_version() -> String {
    PACKAGE_VERSION.to_string()
}

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallpaperContent {
    pub present: bool,
    pub count: usize,
    pub system_count: usize,
    pub list_count: usize,
    pub collection_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconContent {
    pub present: bool,
    pub system_count: usize,
    pub tool_count: usize,
    pub collection_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayContent {
    pub present: bool,
    pub count: usize,
    /// Sorted, unique system tags with at least one overlay.
    pub systems: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontContent {
    pub present: bool,
    pub og_replaced: bool,
    pub next_replaced: bool,
    pub og_backup: bool,
    pub next_backup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagContent {
    pub present: bool,
}

/// Summary counts and flags; only sections the package kind owns are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallpapers: Option<WallpaperContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<IconContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlays: Option<OverlayContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accents: Option<FlagContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leds: Option<FlagContent>,
}

impl Content {
    /// Whether the section for `kind` claims content.
    pub fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Wallpaper => self.wallpapers.as_ref().is_some_and(|c| c.present),
            ComponentKind::Icon => self.icons.as_ref().is_some_and(|c| c.present),
            ComponentKind::Overlay => self.overlays.as_ref().is_some_and(|c| c.present),
            ComponentKind::Font => self.fonts.as_ref().is_some_and(|c| c.present),
            ComponentKind::Accent => self.accents.as_ref().is_some_and(|c| c.present),
            ComponentKind::Led => self.leds.as_ref().is_some_and(|c| c.present),
            ComponentKind::FullTheme => ComponentKind::COMPONENTS.iter().any(|k| self.has(*k)),
        }
    }
}

/// The six accent colors, as `0xRRGGBB` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentColors {
    pub color1: String,
    pub color2: String,
    pub color3: String,
    pub color4: String,
    pub color5: String,
    pub color6: String,
}

impl AccentColors {
    pub const KEYS: [&'static str; 6] = ["color1", "color2", "color3", "color4", "color5", "color6"];

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "color1" => &self.color1,
            "color2" => &self.color2,
            "color3" => &self.color3,
            "color4" => &self.color4,
            "color5" => &self.color5,
            "color6" => &self.color6,
            _ => return None,
        };
        Some(value)
    }

    /// Set a color by key. Returns false for unknown keys.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "color1" => &mut self.color1,
            "color2" => &mut self.color2,
            "color3" => &mut self.color3,
            "color4" => &mut self.color4,
            "color5" => &mut self.color5,
            "color6" => &mut self.color6,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// Settings for one light position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedLight {
    pub effect: u32,
    pub color1: String,
    pub color2: String,
    pub speed: u32,
    pub brightness: u32,
    pub trigger: u32,
    #[serde(rename = "inbrightness")]
    pub in_brightness: u32,
}

/// Light position name → settings.
pub type LedSettings = BTreeMap<String, LedLight>;

/// A package manifest.
///
/// Serializes to the on-disk JSON shape; construct fresh ones with
/// [`Manifest::new`] and rebuild content with `regenerate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ManifestDocument", try_from = "ManifestDocument")]
pub struct Manifest {
    pub kind: ComponentKind,
    pub info: PackageInfo,
    pub content: Content,
    /// Mappings bucketed by owning kind, each sorted by package path.
    pub path_mappings: BTreeMap<ComponentKind, Vec<PathMapping>>,
    pub accent_colors: Option<AccentColors>,
    pub led_settings: Option<LedSettings>,
}

impl Manifest {
    pub fn new(kind: ComponentKind, info: PackageInfo) -> Self {
        Self {
            kind,
            info,
            content: Content::default(),
            path_mappings: BTreeMap::new(),
            accent_colors: None,
            led_settings: None,
        }
    }

    /// Mappings recorded for one kind; empty when none.
    pub fn mappings(&self, kind: ComponentKind) -> &[PathMapping] {
        self.path_mappings.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn all_mappings(&self) -> impl Iterator<Item = &PathMapping> {
        self.path_mappings.values().flatten()
    }

    pub fn find_mapping(&self, package_path: &str) -> Option<&PathMapping> {
        self.all_mappings().find(|m| m.package_path == package_path)
    }

    pub fn mapping_count(&self) -> usize {
        self.path_mappings.values().map(Vec::len).sum()
    }
}

/// `component_info` block: package info plus the component type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(flatten)]
    pub info: PackageInfo,
}

/// `path_mappings` as stored: grouped for themes, flat for components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireMappings {
    Grouped(BTreeMap<String, Vec<PathMapping>>),
    Flat(Vec<PathMapping>),
}

impl Default for WireMappings {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

/// The manifest exactly as it appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_info: Option<PackageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_info: Option<ComponentInfo>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub path_mappings: WireMappings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_colors: Option<AccentColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_settings: Option<LedSettings>,
}

impl From<Manifest> for ManifestDocument {
    fn from(manifest: Manifest) -> Self {
        let (theme_info, component_info, path_mappings) = if manifest.kind == ComponentKind::FullTheme {
            let grouped = manifest
                .path_mappings
                .into_iter()
                .filter_map(|(kind, entries)| Some((kind.mapping_group()?.to_string(), entries)))
                .collect();
            (Some(manifest.info), None, WireMappings::Grouped(grouped))
        } else {
            let flat = manifest.path_mappings.into_values().flatten().collect();
            let info = ComponentInfo {
                kind: manifest.kind,
                info: manifest.info,
            };
            (None, Some(info), WireMappings::Flat(flat))
        };

        Self {
            theme_info,
            component_info,
            content: manifest.content,
            path_mappings,
            accent_colors: manifest.accent_colors,
            led_settings: manifest.led_settings,
        }
    }
}

impl TryFrom<ManifestDocument> for Manifest {
    type Error = String;

    fn try_from(doc: ManifestDocument) -> Result<Self, Self::Error> {
        let (kind, info) = match (doc.theme_info, doc.component_info) {
            (Some(info), _) => (ComponentKind::FullTheme, info),
            (None, Some(component)) => (component.kind, component.info),
            (None, None) => return Err("missing theme_info or component_info".to_string()),
        };

        let mut path_mappings: BTreeMap<ComponentKind, Vec<PathMapping>> = BTreeMap::new();
        match doc.path_mappings {
            WireMappings::Grouped(groups) => {
                for (group, entries) in groups {
                    let Some(owner) = ComponentKind::ALL
                        .into_iter()
                        .find(|k| k.mapping_group() == Some(group.as_str()))
                    else {
                        warn!(group = %group, "Ignoring unknown path_mappings group");
                        continue;
                    };
                    path_mappings.entry(owner).or_default().extend(entries);
                }
            }
            WireMappings::Flat(entries) => {
                for entry in entries {
                    let owner = if kind == ComponentKind::FullTheme {
                        PathResolver::classify(kind, &entry.package_path)
                    } else {
                        Some(kind)
                    };
                    match owner {
                        Some(owner) => path_mappings.entry(owner).or_default().push(entry),
                        None => warn!(path = %entry.package_path, "Ignoring unclassifiable mapping"),
                    }
                }
            }
        }
        for entries in path_mappings.values_mut() {
            entries.sort_by(|a, b| a.package_path.cmp(&b.package_path));
        }

        Ok(Self {
            kind,
            info,
            content: doc.content,
            path_mappings,
            accent_colors: doc.accent_colors,
            led_settings: doc.led_settings,
        })
    }
}
