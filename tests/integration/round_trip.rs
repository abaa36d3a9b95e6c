//! Export from one card, import onto another.

use std::fs;

use themer::engine::{self, EngineContext, ExportRequest, ImportRequest};
use themer::kind::ComponentKind;
use themer::settings::{AccentStore, LedStore, file_stores};

use crate::common::fixtures::{FakeDevice, write_file};
use crate::common::init_test_logging;

fn full_device() -> FakeDevice {
    FakeDevice::new()
        .with_wallpapers()
        .with_icons()
        .with_fonts()
        .with_overlays()
}

#[test]
fn test_export_then_import_reproduces_device() {
    init_test_logging();
    let source = full_device();
    let layout = source.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let request = ExportRequest::new("Snapshot", ComponentKind::FullTheme, source.packages_dir())
        .with_author("tester");
    let exported = engine::export(&ctx, &request).unwrap();
    assert!(exported.copied.len() > 10);
    assert!(exported.accents_exported);
    assert!(exported.leds_exported);

    let target = FakeDevice::new();
    let target_layout = target.layout();
    write_file(
        &target_layout.accent_settings_file(),
        b"font=2\ncolor1=0x000000\n",
    );
    let (target_accents, target_leds) = file_stores(&target_layout);
    let target_ctx = EngineContext::new(&target_layout, &target_accents, &target_leds);

    let imported = engine::import(
        &target_ctx,
        &ImportRequest::for_package(&exported.package).unwrap(),
    )
    .unwrap();
    assert!(imported.unresolved.is_empty(), "{:?}", imported.unresolved);
    assert_eq!(imported.copied.len(), exported.copied.len());

    for copy in &exported.copied {
        let rel = copy.device_path.strip_prefix(source.root()).unwrap();
        assert_eq!(
            fs::read(target.root().join(rel)).unwrap(),
            source.read(&copy.device_path),
            "{} differs after round trip",
            rel.display()
        );
    }

    assert_eq!(
        target_accents.read_accents().unwrap(),
        accents.read_accents().unwrap()
    );
    assert_eq!(target_leds.read_leds().unwrap(), leds.read_leds().unwrap());
    // Unrelated keys in the settings file survive.
    let raw = fs::read_to_string(target_layout.accent_settings_file()).unwrap();
    assert!(raw.contains("font=2"));
}

#[test]
fn test_exported_manifest_matches_files() {
    let source = full_device();
    let layout = source.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let report = engine::export(
        &ctx,
        &ExportRequest::new("Icons", ComponentKind::Icon, source.packages_dir()),
    )
    .unwrap();

    assert!(report.package.ends_with("Icons.icon"));
    assert_eq!(report.manifest.mapping_count(), report.copied.len());
    let icons = report.manifest.content.icons.as_ref().unwrap();
    assert_eq!(icons.system_count, 5);
    assert_eq!(icons.tool_count, 1);
    assert_eq!(icons.collection_count, 1);
    assert!(report.manifest.accent_colors.is_none());
    assert!(report.package.join("SystemIcons/Game Boy (GB).png").is_file());
    assert!(report.package.join("ToolIcons/Files.png").is_file());
}

#[test]
fn test_component_export_round_trip() {
    let source = full_device();
    let layout = source.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let out = source.packages_dir();

    let overlays = engine::export(&ctx, &ExportRequest::new("Scan", ComponentKind::Overlay, &out))
        .unwrap();
    assert!(overlays.package.join("Overlays/GBA/scanlines.png").is_file());

    let fonts = engine::export(&ctx, &ExportRequest::new("Type", ComponentKind::Font, &out))
        .unwrap();
    assert!(fonts.package.join("OG.ttf").is_file());
    assert!(fonts.package.join("Next.ttf").is_file());

    let target = FakeDevice::new();
    let target_layout = target.layout();
    let (ta, tl) = file_stores(&target_layout);
    let target_ctx = EngineContext::new(&target_layout, &ta, &tl);
    for package in [&overlays.package, &fonts.package] {
        engine::import(&target_ctx, &ImportRequest::for_package(package).unwrap()).unwrap();
    }

    assert_eq!(
        fs::read(target_layout.overlays_dir().join("GBA/scanlines.png")).unwrap(),
        b"gba-scan"
    );
    assert_eq!(
        fs::read(target_layout.font_path(themer::config::FontSlot::Og)).unwrap(),
        b"font-og"
    );
}
