//! Splitting a theme into component packages.

use std::fs;

use themer::engine::{self, DeconstructRequest, EngineContext, ExportRequest, ImportRequest};
use themer::kind::ComponentKind;
use themer::manifest::{self, AccentColors, LedLight, PackageInfo};
use themer::settings::{AccentStore, file_stores};

use crate::common::fixtures::{FakeDevice, PackageBuilder};

#[test]
fn test_only_components_with_content_are_created() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let out = device.packages_dir().join("parts");

    let theme = PackageBuilder::new(&device.packages_dir(), "Ocean", ComponentKind::FullTheme)
        .file("SystemWallpapers/Root.png", b"root")
        .file("CollectionWallpapers/Favorites.png", b"fav")
        .file("preview.png", b"preview")
        .manifest(|m| {
            m.accent_colors = Some(AccentColors {
                color1: "0x0077BE".to_string(),
                ..AccentColors::default()
            });
        })
        .build();

    let report = engine::deconstruct(&ctx, &DeconstructRequest::new(&theme, &out)).unwrap();

    let kinds: Vec<_> = report.packages.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![ComponentKind::Wallpaper, ComponentKind::Accent]);
    assert_eq!(
        report.skipped,
        vec![
            ComponentKind::Icon,
            ComponentKind::Led,
            ComponentKind::Font,
            ComponentKind::Overlay
        ]
    );

    let mut created: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    created.sort();
    assert_eq!(created, vec!["Ocean.acc", "Ocean.bg"]);

    let bg = manifest::read(&out.join("Ocean.bg")).unwrap();
    assert_eq!(bg.mapping_count(), 2);
    assert_eq!(bg.content.wallpapers.as_ref().unwrap().collection_count, 1);
    assert!(bg.accent_colors.is_none());
    assert!(out.join("Ocean.bg/preview.png").is_file());

    let acc = manifest::read(&out.join("Ocean.acc")).unwrap();
    assert_eq!(acc.accent_colors.unwrap().color1, "0x0077BE");
    assert_eq!(acc.info.author, "tester");
}

#[test]
fn test_components_reassemble_the_theme() {
    let source = FakeDevice::new()
        .with_wallpapers()
        .with_icons()
        .with_fonts()
        .with_overlays();
    let layout = source.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let packages = source.packages_dir();

    let theme = engine::export(
        &ctx,
        &ExportRequest::new("Whole", ComponentKind::FullTheme, &packages),
    )
    .unwrap();
    let parts = engine::deconstruct(&ctx, &DeconstructRequest::new(&theme.package, &packages))
        .unwrap();
    assert_eq!(parts.packages.len(), 6);
    assert!(parts.skipped.is_empty());

    let total: usize = parts
        .packages
        .iter()
        .filter(|p| p.kind.carries_files())
        .map(|p| p.files)
        .sum();
    assert_eq!(total, theme.copied.len());

    // Applying every component gives the same card as applying the theme.
    let target = FakeDevice::new();
    let target_layout = target.layout();
    let (ta, tl) = file_stores(&target_layout);
    let target_ctx = EngineContext::new(&target_layout, &ta, &tl);
    for part in &parts.packages {
        let report =
            engine::import(&target_ctx, &ImportRequest::for_package(&part.path).unwrap()).unwrap();
        assert!(report.unresolved.is_empty(), "{:?}", report.unresolved);
    }
    for copy in &theme.copied {
        let rel = copy.device_path.strip_prefix(source.root()).unwrap();
        assert_eq!(
            fs::read(target.root().join(rel)).unwrap(),
            source.read(&copy.device_path)
        );
    }
    assert_eq!(ta.read_accents().unwrap(), accents.read_accents().unwrap());
}

#[test]
fn test_led_component_carries_settings() {
    let device = FakeDevice::new();
    let layout = device.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);

    let theme = PackageBuilder::new(&device.packages_dir(), "Glow", ComponentKind::FullTheme)
        .manifest(|m| {
            m.info = PackageInfo::new("Glow", Some("ana"));
            m.led_settings = Some(
                [(
                    "F2 key".to_string(),
                    LedLight {
                        effect: 4,
                        color1: "0x00FF00".to_string(),
                        ..LedLight::default()
                    },
                )]
                .into(),
            );
        })
        .build();

    let report = engine::deconstruct(
        &ctx,
        &DeconstructRequest::new(&theme, device.packages_dir()),
    )
    .unwrap();
    assert_eq!(report.packages.len(), 1);
    let led = manifest::read(&report.packages[0].path).unwrap();
    assert_eq!(led.kind, ComponentKind::Led);
    assert_eq!(led.led_settings.unwrap()["F2 key"].effect, 4);
    assert_eq!(led.info.author, "ana");
}
