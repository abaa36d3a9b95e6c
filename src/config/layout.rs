//! Fixed device filesystem locations.
//!
//! Every absolute device path the engine reads or writes is derived from a
//! [`DeviceLayout`]; nothing below this module hard-codes a device path.

use std::path::{Path, PathBuf};

use serde::Serialize;

pub const DEFAULT_DEVICE_ROOT: &str = "/mnt/SDCARD";
pub const DEFAULT_PLATFORM: &str = "tg5040";

pub const MEDIA_DIR: &str = ".media";
pub const BACKGROUND_FILE: &str = "bg.png";
pub const LIST_BACKGROUND_FILE: &str = "bglist.png";

const ROMS_DIR: &str = "Roms";
const RECENTLY_PLAYED_DIR: &str = "Recently Played";
const TOOLS_DIR: &str = "Tools";
const COLLECTIONS_DIR: &str = "Collections";
const OVERLAYS_DIR: &str = "Overlays";

/// One of the four fixed font files on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FontSlot {
    Og,
    Next,
    OgBackup,
    NextBackup,
}

impl FontSlot {
    pub const ALL: [Self; 4] = [Self::Og, Self::Next, Self::OgBackup, Self::NextBackup];

    /// File name used inside packages.
    pub const fn package_file(self) -> &'static str {
        match self {
            Self::Og => "OG.ttf",
            Self::Next => "Next.ttf",
            Self::OgBackup => "OG.backup.ttf",
            Self::NextBackup => "Next.backup.ttf",
        }
    }

    /// File name on the device.
    pub const fn device_file(self) -> &'static str {
        match self {
            Self::Og => "font1.ttf",
            Self::Next => "font2.ttf",
            Self::OgBackup => "font1.backup.ttf",
            Self::NextBackup => "font2.backup.ttf",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Og => "OG",
            Self::Next => "Next",
            Self::OgBackup => "OG.backup",
            Self::NextBackup => "Next.backup",
        }
    }

    /// Backup slot guarding a live slot, if this is a live slot.
    pub const fn backup(self) -> Option<Self> {
        match self {
            Self::Og => Some(Self::OgBackup),
            Self::Next => Some(Self::NextBackup),
            Self::OgBackup | Self::NextBackup => None,
        }
    }

    pub fn from_package_file(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.package_file() == name)
    }
}

/// Absolute device locations derived from the SD card root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceLayout {
    root: PathBuf,
    platform: String,
    accent_file: Option<PathBuf>,
    led_file: Option<PathBuf>,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_ROOT, DEFAULT_PLATFORM)
    }
}

impl DeviceLayout {
    pub fn new(root: impl Into<PathBuf>, platform: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            platform: platform.into(),
            accent_file: None,
            led_file: None,
        }
    }

    /// Override where accent settings live.
    pub fn with_accent_file(mut self, path: PathBuf) -> Self {
        self.accent_file = Some(path);
        self
    }

    /// Override where LED settings live.
    pub fn with_led_file(mut self, path: PathBuf) -> Self {
        self.led_file = Some(path);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn roms_dir(&self) -> PathBuf {
        self.root.join(ROMS_DIR)
    }

    pub fn root_media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }

    pub fn recently_played_dir(&self) -> PathBuf {
        self.root.join(RECENTLY_PLAYED_DIR)
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(TOOLS_DIR).join(&self.platform)
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.root.join(COLLECTIONS_DIR)
    }

    pub fn overlays_dir(&self) -> PathBuf {
        self.root.join(OVERLAYS_DIR)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.root.join(".system").join(&self.platform).join("res")
    }

    pub fn font_path(&self, slot: FontSlot) -> PathBuf {
        self.fonts_dir().join(slot.device_file())
    }

    /// Main menu background (outside any `.media` folder).
    pub fn root_background(&self) -> PathBuf {
        self.root.join(BACKGROUND_FILE)
    }

    /// Icons of the systems themselves live in the ROM root's media folder.
    pub fn system_icons_dir(&self) -> PathBuf {
        self.roms_dir().join(MEDIA_DIR)
    }

    pub fn accent_settings_file(&self) -> PathBuf {
        self.accent_file.clone().unwrap_or_else(|| {
            self.root
                .join(".userdata")
                .join("shared")
                .join("minuisettings.txt")
        })
    }

    pub fn led_settings_file(&self) -> PathBuf {
        self.led_file.clone().unwrap_or_else(|| {
            self.root
                .join(".userdata")
                .join("shared")
                .join("ledsettings_brick.txt")
        })
    }
}

/// Media folder of any directory.
pub fn media_dir(dir: &Path) -> PathBuf {
    dir.join(MEDIA_DIR)
}
