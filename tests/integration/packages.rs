//! Manifest regeneration, catalog listing and verification.

use std::fs;

use themer::catalog::list_packages;
use themer::engine::{self, EngineContext, ImportRequest};
use themer::kind::ComponentKind;
use themer::manifest::{self, AccentColors};
use themer::settings::file_stores;

use crate::common::fixtures::{FakeDevice, PackageBuilder, write_file};

#[test]
fn test_regenerate_is_idempotent() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let package = PackageBuilder::new(&device.packages_dir(), "Stable", ComponentKind::FullTheme)
        .file("SystemWallpapers/Game Boy (GB).png", b"gb")
        .file("ListWallpapers/Root-list.png", b"root-list")
        .file("SystemIcons/Collections.png", b"col")
        .file("Overlays/GB/grid.png", b"grid")
        .file("Fonts/Next.ttf", b"next")
        .manifest(|m| m.accent_colors = Some(AccentColors::default()))
        .build();

    let first = manifest::regenerate(&package, ComponentKind::FullTheme, &layout).unwrap();
    manifest::write(&package, &first).unwrap();
    let raw_first = fs::read_to_string(manifest::manifest_path(&package)).unwrap();

    let second = manifest::regenerate(&package, ComponentKind::FullTheme, &layout).unwrap();
    manifest::write(&package, &second).unwrap();
    let raw_second = fs::read_to_string(manifest::manifest_path(&package)).unwrap();

    assert_eq!(first, second);
    assert_eq!(raw_first, raw_second);
    assert_eq!(first.mapping_count(), 5);
    assert!(first.content.has(ComponentKind::Overlay));
    assert!(first.content.fonts.as_ref().unwrap().next_replaced);
    assert_eq!(first.accent_colors, Some(AccentColors::default()));
}

#[test]
fn test_regenerate_tracks_added_and_removed_files() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let package = PackageBuilder::new(&device.packages_dir(), "Grow", ComponentKind::Icon)
        .file("SystemIcons/Ports.png", b"ports")
        .build_regenerated(&layout);
    assert_eq!(manifest::read(&package).unwrap().mapping_count(), 1);

    write_file(&package.join("ToolIcons/Files.png"), b"files");
    fs::remove_file(package.join("SystemIcons/Ports.png")).unwrap();
    let regenerated = manifest::regenerate(&package, ComponentKind::Icon, &layout).unwrap();

    let paths: Vec<_> = regenerated
        .all_mappings()
        .map(|m| m.package_path.as_str())
        .collect();
    assert_eq!(paths, vec!["ToolIcons/Files.png"]);
    let icons = regenerated.content.icons.unwrap();
    assert_eq!((icons.system_count, icons.tool_count), (0, 1));
}

#[test]
fn test_component_manifest_wire_shape() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let package = PackageBuilder::new(&device.packages_dir(), "Shape", ComponentKind::Wallpaper)
        .file("SystemWallpapers/Ports.png", b"ports")
        .build_regenerated(&layout);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(manifest::manifest_path(&package)).unwrap())
            .unwrap();
    assert_eq!(raw["component_info"]["type"], "wallpaper");
    assert!(raw.get("theme_info").is_none());
    assert!(raw["path_mappings"].is_array());
    assert_eq!(raw["path_mappings"][0]["theme_path"], "SystemWallpapers/Ports.png");
}

#[test]
fn test_catalog_lists_packages_with_errors() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let dir = device.packages_dir();
    PackageBuilder::new(&dir, "Retro", ComponentKind::FullTheme)
        .file("SystemWallpapers/Root.png", b"root")
        .file("preview.png", b"png")
        .build_regenerated(&layout);
    PackageBuilder::new(&dir, "Retro", ComponentKind::Icon)
        .file("SystemIcons/Ports.png", b"ports")
        .build();
    write_file(&dir.join("Broken.over/manifest.json"), b"{ not json");

    let entries = list_packages(&dir).unwrap();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.kind, e.is_valid()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Broken", ComponentKind::Overlay, false),
            ("Retro", ComponentKind::FullTheme, true),
            ("Retro", ComponentKind::Icon, true),
        ]
    );
    assert!(entries[1].has_preview);
    assert_eq!(entries[1].mappings, 1);
    assert_eq!(entries[1].author.as_deref(), Some("tester"));
}

#[test]
fn test_verify_after_import() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let package = PackageBuilder::new(&device.packages_dir(), "Check", ComponentKind::FullTheme)
        .file("SystemWallpapers/Game Boy (GB).png", b"gb")
        .file("SystemIcons/Ports.png", b"ports")
        .manifest(|m| {
            m.accent_colors = Some(AccentColors {
                color1: "0xABCDEF".to_string(),
                ..AccentColors::default()
            });
        })
        .build();

    let before = engine::verify(&ctx, &package, None).unwrap();
    assert!(!before.is_applied());
    assert_eq!(before.missing.len(), 2);
    assert_eq!(before.accents_match, Some(false));

    engine::import(&ctx, &ImportRequest::for_package(&package).unwrap()).unwrap();
    let after = engine::verify(&ctx, &package, None).unwrap();
    assert!(after.is_applied(), "{after:?}");
    assert_eq!(after.matching.len(), 2);
    assert_eq!(after.accents_match, Some(true));
    assert_eq!(after.leds_match, None);
}
