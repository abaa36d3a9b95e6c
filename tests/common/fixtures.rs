//! Test fixture helpers for creating fake devices and packages.
//!
//! Everything lives in a [`TempDir`] that is removed when the fixture drops.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use themer::config::{DeviceLayout, FontSlot};
use themer::kind::ComponentKind;
use themer::manifest::{self, Manifest, PackageInfo};

pub const PLATFORM: &str = "tg5040";

/// Systems installed on every [`FakeDevice`].
pub const SYSTEMS: &[&str] = &[
    "Game Boy (GB)",
    "Game Boy Advance (GBA)",
    "Ports",
    "Super Nintendo Entertainment System (SFC)",
];

/// Write `bytes` at `path`, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, bytes).unwrap_or_else(|_| panic!("Failed to write {path:?}"));
}

/// A fake SD card with a ROM root, menus, tools and settings files.
///
/// # Example
///
/// ```ignore
/// let device = FakeDevice::new().with_wallpapers();
/// let layout = device.layout();
/// ```
pub struct FakeDevice {
    pub dir: TempDir,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDevice {
    /// Card with the standard systems, a tool and a collection, all media
    /// folders empty.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let device = Self { dir };
        let layout = device.layout();
        for system in SYSTEMS {
            fs::create_dir_all(layout.roms_dir().join(system).join(".media"))
                .expect("Failed to create system dir");
        }
        fs::create_dir_all(layout.recently_played_dir()).expect("Failed to create menu dir");
        fs::create_dir_all(layout.tools_dir().join("Files.pak")).expect("Failed to create tool");
        fs::create_dir_all(layout.collections_dir().join("Favorites"))
            .expect("Failed to create collection");
        write_file(
            &layout.accent_settings_file(),
            b"font=1\ncolor1=0xFFFFFF\ncolor2=0x9B2257\ncolor3=0x1E2329\ncolor4=0xFFFFFF\ncolor5=0x000000\ncolor6=0xFFFFFF\n",
        );
        write_file(
            &layout.led_settings_file(),
            b"[F1 key]\neffect=1\ncolor1=0xFFFFFF\ncolor2=0x000000\nspeed=1000\nbrightness=100\ntrigger=1\ninbrightness=100\n",
        );
        device
    }

    /// Fill the wallpaper slots with distinct bytes.
    #[must_use]
    pub fn with_wallpapers(self) -> Self {
        let layout = self.layout();
        write_file(&layout.root_background(), b"root-bg");
        write_file(&layout.recently_played_dir().join(".media/bg.png"), b"recent-bg");
        write_file(&layout.tools_dir().join(".media/bglist.png"), b"tools-list");
        for system in SYSTEMS {
            let media = layout.roms_dir().join(system).join(".media");
            write_file(&media.join("bg.png"), format!("{system}-bg").as_bytes());
        }
        write_file(
            &layout.collections_dir().join("Favorites/.media/bg.png"),
            b"favorites-bg",
        );
        self
    }

    /// Fill the icon slots with distinct bytes.
    #[must_use]
    pub fn with_icons(self) -> Self {
        let layout = self.layout();
        for system in SYSTEMS {
            write_file(
                &layout.system_icons_dir().join(format!("{system}.png")),
                format!("{system}-icon").as_bytes(),
            );
        }
        write_file(&layout.root_media_dir().join("Tools.png"), b"tools-icon");
        write_file(&layout.tools_dir().join(".media/Files.png"), b"files-icon");
        write_file(&layout.collections_dir().join(".media/Favorites.png"), b"fav-icon");
        self
    }

    #[must_use]
    pub fn with_fonts(self) -> Self {
        let layout = self.layout();
        write_file(&layout.font_path(FontSlot::Og), b"font-og");
        write_file(&layout.font_path(FontSlot::Next), b"font-next");
        self
    }

    #[must_use]
    pub fn with_overlays(self) -> Self {
        let layout = self.layout();
        write_file(&layout.overlays_dir().join("GBA/scanlines.png"), b"gba-scan");
        write_file(&layout.overlays_dir().join("GB/grid.png"), b"gb-grid");
        self
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("sdcard")
    }

    pub fn layout(&self) -> DeviceLayout {
        DeviceLayout::new(self.root(), PLATFORM)
    }

    /// Scratch directory next to the card for packages.
    pub fn packages_dir(&self) -> PathBuf {
        let dir = self.dir.path().join("packages");
        fs::create_dir_all(&dir).expect("Failed to create packages dir");
        dir
    }

    pub fn read(&self, path: &Path) -> Vec<u8> {
        fs::read(path).unwrap_or_else(|_| panic!("Failed to read {path:?}"))
    }
}

/// Builds a package directory file by file.
pub struct PackageBuilder {
    path: PathBuf,
    kind: ComponentKind,
    manifest: Manifest,
}

impl PackageBuilder {
    /// Start a package `<dir>/<name>.<ext>`.
    #[must_use]
    pub fn new(dir: &Path, name: &str, kind: ComponentKind) -> Self {
        let path = dir.join(format!("{name}.{}", kind.extension()));
        fs::create_dir_all(&path).expect("Failed to create package dir");
        Self {
            path,
            kind,
            manifest: Manifest::new(kind, PackageInfo::new(name, Some("tester"))),
        }
    }

    #[must_use]
    pub fn file(self, rel: &str, bytes: &[u8]) -> Self {
        write_file(&self.path.join(rel), bytes);
        self
    }

    #[must_use]
    pub fn manifest(mut self, edit: impl FnOnce(&mut Manifest)) -> Self {
        edit(&mut self.manifest);
        self
    }

    /// Write the manifest and return the package path.
    pub fn build(self) -> PathBuf {
        manifest::write(&self.path, &self.manifest).expect("Failed to write manifest");
        self.path
    }

    /// Regenerate the manifest from the files written so far.
    pub fn build_regenerated(self, layout: &DeviceLayout) -> PathBuf {
        let kind = self.kind;
        let path = self.build();
        let regenerated =
            manifest::regenerate(&path, kind, layout).expect("Failed to regenerate");
        manifest::write(&path, &regenerated).expect("Failed to write manifest");
        path
    }
}
