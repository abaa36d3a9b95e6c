//! Component kinds and the package conventions attached to each.
//!
//! String → kind conversion happens only at the edges (CLI labels and package
//! directory extensions); everything below works with [`ComponentKind`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Top-level package directories owned by the wallpaper kind.
pub const WALLPAPER_DIRS: &[&str] = &["SystemWallpapers", "ListWallpapers", "CollectionWallpapers"];
/// Top-level package directories owned by the icon kind.
pub const ICON_DIRS: &[&str] = &["SystemIcons", "ToolIcons", "CollectionIcons"];
pub const OVERLAY_DIRS: &[&str] = &["Overlays"];
pub const FONT_DIRS: &[&str] = &["Fonts"];

/// One of the seven package categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    #[serde(rename = "theme")]
    FullTheme,
    Wallpaper,
    Icon,
    Accent,
    Led,
    Font,
    Overlay,
}

impl ComponentKind {
    /// Every kind, full theme first.
    pub const ALL: [Self; 7] = [
        Self::FullTheme,
        Self::Wallpaper,
        Self::Icon,
        Self::Accent,
        Self::Led,
        Self::Font,
        Self::Overlay,
    ];

    /// The six single-purpose component kinds, in deconstruction order.
    pub const COMPONENTS: [Self; 6] = [
        Self::Wallpaper,
        Self::Icon,
        Self::Accent,
        Self::Led,
        Self::Font,
        Self::Overlay,
    ];

    /// Package directory extension (without the dot).
    pub const fn extension(self) -> &'static str {
        match self {
            Self::FullTheme => "theme",
            Self::Wallpaper => "bg",
            Self::Icon => "icon",
            Self::Accent => "acc",
            Self::Led => "led",
            Self::Font => "font",
            Self::Overlay => "over",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTheme => "theme",
            Self::Wallpaper => "wallpaper",
            Self::Icon => "icon",
            Self::Accent => "accent",
            Self::Led => "led",
            Self::Font => "font",
            Self::Overlay => "overlay",
        }
    }

    /// Key of this kind's group inside a full theme's `path_mappings`.
    pub const fn mapping_group(self) -> Option<&'static str> {
        match self {
            Self::Wallpaper => Some("wallpapers"),
            Self::Icon => Some("icons"),
            Self::Overlay => Some("overlays"),
            Self::Font => Some("fonts"),
            Self::FullTheme | Self::Accent | Self::Led => None,
        }
    }

    /// Top-level package subdirectories this kind owns.
    ///
    /// A full theme owns nothing directly; it is the union of its components.
    pub const fn package_dirs(self) -> &'static [&'static str] {
        match self {
            Self::Wallpaper => WALLPAPER_DIRS,
            Self::Icon => ICON_DIRS,
            Self::Overlay => OVERLAY_DIRS,
            Self::Font => FONT_DIRS,
            Self::FullTheme | Self::Accent | Self::Led => &[],
        }
    }

    /// True for kinds whose content is copied as files.
    pub const fn carries_files(self) -> bool {
        matches!(self, Self::Wallpaper | Self::Icon | Self::Overlay | Self::Font)
    }

    /// True for kinds whose device paths depend on the installed systems.
    pub const fn needs_inventory(self) -> bool {
        matches!(self, Self::Wallpaper | Self::Icon | Self::Overlay)
    }

    /// True for kinds applied through a leaf settings writer.
    pub const fn is_leaf_setting(self) -> bool {
        matches!(self, Self::Accent | Self::Led)
    }

    pub const fn requires_preview(self) -> bool {
        !matches!(self, Self::Led)
    }

    /// Kind owning a top-level package directory name.
    pub fn owning_dir(dir: &str) -> Option<Self> {
        [Self::Wallpaper, Self::Icon, Self::Overlay, Self::Font]
            .into_iter()
            .find(|kind| kind.package_dirs().contains(&dir))
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.extension() == ext)
    }

    /// Infer the kind of a package directory from its extension.
    pub fn from_package_path(path: &Path) -> Result<Self, ThemeError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| ThemeError::UnknownPackageKind {
                path: path.display().to_string(),
            })
    }

    /// Expand an optional selection into the concrete component kinds to act on.
    ///
    /// For a full theme with no selection, or one naming the full theme itself,
    /// every component is included; for a component kind the selection is
    /// ignored.
    pub fn expand_selection(self, selection: Option<&[Self]>) -> Vec<Self> {
        match self {
            Self::FullTheme => {
                let mut kinds: Vec<Self> = match selection {
                    Some(selected)
                        if !selected.is_empty() && !selected.contains(&Self::FullTheme) =>
                    {
                        selected.to_vec()
                    }
                    _ => Self::COMPONENTS.to_vec(),
                };
                kinds.sort();
                kinds.dedup();
                kinds
            }
            other => vec![other],
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentKind {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theme" | "full" | "fulltheme" => Ok(Self::FullTheme),
            "wallpaper" | "wallpapers" | "bg" => Ok(Self::Wallpaper),
            "icon" | "icons" => Ok(Self::Icon),
            "accent" | "accents" | "acc" => Ok(Self::Accent),
            "led" | "leds" => Ok(Self::Led),
            "font" | "fonts" => Ok(Self::Font),
            "overlay" | "overlays" | "over" => Ok(Self::Overlay),
            other => Err(ThemeError::InvalidKind(other.to_string())),
        }
    }
}
