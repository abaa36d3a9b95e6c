//! Resolution, selection and skip behavior during import.

use std::fs;

use themer::config::FontSlot;
use themer::engine::{self, EngineContext, ImportRequest};
use themer::error::ThemeError;
use themer::kind::ComponentKind;
use themer::manifest::AccentColors;
use themer::settings::{AccentStore, file_stores};

use crate::common::fixtures::{FakeDevice, PackageBuilder, write_file};

#[test]
fn test_tag_matches_differently_named_system() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Tags", ComponentKind::Wallpaper)
        .file("SystemWallpapers/GBA (GBA).png", b"gba")
        .file("SystemWallpapers/Super Famicom (SFC).png", b"sfc")
        .file("ListWallpapers/Game Boy (GB)-list.png", b"gb-list")
        .build_regenerated(&layout);

    let report = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap();
    assert_eq!(report.copied.len(), 3);

    let roms = layout.roms_dir();
    assert_eq!(fs::read(roms.join("Game Boy Advance (GBA)/.media/bg.png")).unwrap(), b"gba");
    assert_eq!(
        fs::read(roms.join("Super Nintendo Entertainment System (SFC)/.media/bg.png")).unwrap(),
        b"sfc"
    );
    assert_eq!(fs::read(roms.join("Game Boy (GB)/.media/bglist.png")).unwrap(), b"gb-list");
}

#[test]
fn test_context_tag_places_untagged_file() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Loose", ComponentKind::Wallpaper)
        .file("SystemWallpapers/sunset.png", b"sunset")
        .build();

    let without = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap();
    assert_eq!(without.unresolved, vec!["SystemWallpapers/sunset.png"]);
    assert!(without.copied.is_empty());

    let request = ImportRequest::for_package(&package)
        .unwrap()
        .with_context_tag("GB");
    let with = engine::import(&ctx, &request).unwrap();
    assert!(with.unresolved.is_empty());
    assert_eq!(
        fs::read(layout.roms_dir().join("Game Boy (GB)/.media/bg.png")).unwrap(),
        b"sunset"
    );
}

#[test]
fn test_unresolvable_files_are_skipped_not_fatal() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Mixed", ComponentKind::FullTheme)
        .file("SystemWallpapers/Neo Geo Pocket (NGP).png", b"ngp")
        .file("SystemWallpapers/Root.png", b"root")
        .file("Notes/readme.txt", b"hello")
        .build();

    let report = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap();
    assert_eq!(report.copied.len(), 1);
    assert_eq!(
        report.unresolved,
        vec!["Notes/readme.txt", "SystemWallpapers/Neo Geo Pocket (NGP).png"]
    );
    assert_eq!(fs::read(layout.root_background()).unwrap(), b"root");
}

#[test]
fn test_selection_limits_theme_import() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let before = accents.read_accents().unwrap();

    let package = PackageBuilder::new(&device.packages_dir(), "Partial", ComponentKind::FullTheme)
        .file("SystemWallpapers/Root.png", b"root")
        .file("SystemIcons/Ports.png", b"ports-icon")
        .manifest(|m| {
            m.accent_colors = Some(AccentColors {
                color1: "0x123456".to_string(),
                ..AccentColors::default()
            });
        })
        .build();

    let request = ImportRequest::for_package(&package)
        .unwrap()
        .with_selection(vec![ComponentKind::Icon]);
    let report = engine::import(&ctx, &request).unwrap();

    assert_eq!(report.kinds, vec![ComponentKind::Icon]);
    assert_eq!(report.copied.len(), 1);
    assert!(!report.accents_applied);
    assert!(!layout.root_background().exists());
    assert!(layout.system_icons_dir().join("Ports.png").is_file());
    assert_eq!(accents.read_accents().unwrap(), before);
}

#[test]
fn test_overlays_keep_tag_folder() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "CRT", ComponentKind::Overlay)
        .file("Overlays/GBA/crt.png", b"crt")
        .file("Overlays/crt.png", b"no-tag-folder")
        .build();

    let report = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap();
    assert_eq!(report.copied.len(), 1);
    assert_eq!(report.unresolved, vec!["Overlays/crt.png"]);
    assert_eq!(fs::read(layout.overlays_dir().join("GBA/crt.png")).unwrap(), b"crt");
}

#[test]
fn test_font_import_backs_up_live_font_once() {
    let device = FakeDevice::new().with_fonts();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Pixel", ComponentKind::Font)
        .file("OG.ttf", b"pixel-og")
        .build();
    let request = ImportRequest::for_package(&package).unwrap();

    let first = engine::import(&ctx, &request).unwrap();
    assert_eq!(first.font_backups, vec![layout.font_path(FontSlot::OgBackup)]);
    assert_eq!(fs::read(layout.font_path(FontSlot::OgBackup)).unwrap(), b"font-og");
    assert_eq!(fs::read(layout.font_path(FontSlot::Og)).unwrap(), b"pixel-og");

    // The original stays in the backup slot.
    let second = engine::import(&ctx, &request).unwrap();
    assert!(second.font_backups.is_empty());
    assert_eq!(fs::read(layout.font_path(FontSlot::OgBackup)).unwrap(), b"font-og");
}

#[test]
fn test_dry_run_touches_nothing() {
    let device = FakeDevice::new().with_wallpapers();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let settings_before = fs::read(layout.accent_settings_file()).unwrap();

    let package = PackageBuilder::new(&device.packages_dir(), "Dry", ComponentKind::FullTheme)
        .file("SystemWallpapers/Root.png", b"new-root")
        .manifest(|m| m.accent_colors = Some(AccentColors::default()))
        .build();

    let request = ImportRequest::for_package(&package).unwrap().dry_run(true);
    let report = engine::import(&ctx, &request).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.copied.len(), 1);
    assert!(report.accents_applied);
    assert_eq!(fs::read(layout.root_background()).unwrap(), b"root-bg");
    assert_eq!(fs::read(layout.accent_settings_file()).unwrap(), settings_before);
}

#[test]
fn test_skip_unchanged_on_second_import() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Same", ComponentKind::Icon)
        .file("SystemIcons/Ports.png", b"p")
        .file("SystemIcons/Game Boy (GB).png", b"g")
        .build();
    let request = ImportRequest::for_package(&package)
        .unwrap()
        .skip_unchanged(true);

    let first = engine::import(&ctx, &request).unwrap();
    assert_eq!(first.copied.len(), 2);

    write_file(&layout.system_icons_dir().join("Ports.png"), b"changed");
    let second = engine::import(&ctx, &request).unwrap();
    assert_eq!(second.copied.len(), 1);
    assert_eq!(second.unchanged.len(), 1);
    assert_eq!(second.copied[0].package_path, "SystemIcons/Ports.png");
}

#[test]
fn test_missing_manifest_aborts_before_copying() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = device.packages_dir().join("Bare.bg");
    write_file(&package.join("SystemWallpapers/Root.png"), b"root");

    let err = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap_err();
    assert!(matches!(err, ThemeError::ManifestNotFound { .. }));
    assert!(!layout.root_background().exists());
}

#[test]
fn test_missing_rom_root_is_an_error() {
    let device = FakeDevice::new();
    fs::remove_dir_all(device.layout().roms_dir()).unwrap();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Any", ComponentKind::Wallpaper)
        .file("SystemWallpapers/Root.png", b"root")
        .build();
    let err = engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap_err();
    assert!(matches!(err, ThemeError::RomRootNotFound { .. }));
}
