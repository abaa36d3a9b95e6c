//! Rebuilding a manifest from the files actually present in a package.
//!
//! Regeneration never consults a device: system names are taken from file
//! names (conventional resolution), so the result depends only on the package
//! tree and the configured layout.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use super::schema::{
    AccentColors, Content, FlagContent, FontContent, IconContent, LedSettings, Manifest,
    OverlayContent, PackageInfo, PathMapping, WallpaperContent,
};
use super::{MANIFEST_FILE, PREVIEW_FILE, store};
use crate::config::{DeviceLayout, FontSlot, file_stem, segments};
use crate::error::{Result, ThemeError};
use crate::fsutil::package_files;
use crate::kind::ComponentKind;
use crate::resolver::{
    COLLECTION_ICONS, COLLECTION_WALLPAPERS, LIST_WALLPAPERS, META_SYSTEM_TAG, PathResolver,
    SYSTEM_ICONS, SYSTEM_WALLPAPERS, TOOL_ICONS,
};

/// Recompute a package's manifest from disk.
///
/// The existing manifest's info block and leaf settings are kept when it
/// parses; content and mappings are always rebuilt. A missing or unreadable
/// manifest starts from fresh info named after the package directory.
#[instrument(skip(layout), fields(package = %package.display()))]
pub fn regenerate(package: &Path, kind: ComponentKind, layout: &DeviceLayout) -> Result<Manifest> {
    if !package.is_dir() {
        return Err(ThemeError::package_not_found(package));
    }

    let (info, accents, leds) = match store::read(package) {
        Ok(existing) => (existing.info, existing.accent_colors, existing.led_settings),
        Err(ThemeError::ManifestNotFound { .. }) => {
            debug!("No existing manifest; starting fresh");
            (PackageInfo::new(package_name(package), None), None, None)
        }
        Err(e) => {
            warn!(error = %e, "Existing manifest unreadable; starting fresh");
            (PackageInfo::new(package_name(package), None), None, None)
        }
    };

    build(package, kind, layout, info, accents, leds)
}

/// Assemble a manifest for `package` from its files plus the given info and
/// leaf settings.
pub fn build(
    package: &Path,
    kind: ComponentKind,
    layout: &DeviceLayout,
    info: PackageInfo,
    accent_colors: Option<AccentColors>,
    led_settings: Option<LedSettings>,
) -> Result<Manifest> {
    let resolver = PathResolver::conventional(layout);
    let kinds = kind.expand_selection(None);

    let mut path_mappings: BTreeMap<ComponentKind, Vec<PathMapping>> = kinds
        .iter()
        .filter(|k| k.carries_files())
        .map(|k| (*k, Vec::new()))
        .collect();

    let mut skipped = 0usize;
    for file in package_files(package)? {
        if file == MANIFEST_FILE || file == PREVIEW_FILE {
            continue;
        }
        let Some(owner) = PathResolver::classify(kind, &file) else {
            debug!(path = %file, "Not owned by this package kind; skipping");
            skipped += 1;
            continue;
        };
        match resolver.resolve(kind, &file, None) {
            Some(resolution) => path_mappings
                .entry(owner)
                .or_default()
                .push(PathMapping::new(file, resolution.device_path, resolution.metadata)),
            None => {
                debug!(path = %file, "Unresolved package file; skipping");
                skipped += 1;
            }
        }
    }
    for entries in path_mappings.values_mut() {
        entries.sort_by(|a, b| a.package_path.cmp(&b.package_path));
    }

    let accent_colors = accent_colors.filter(|_| kinds.contains(&ComponentKind::Accent));
    let led_settings = led_settings
        .filter(|leds| kinds.contains(&ComponentKind::Led) && !leds.is_empty());
    let content = summarize(
        &kinds,
        &path_mappings,
        accent_colors.is_some(),
        led_settings.is_some(),
    );

    let manifest = Manifest {
        kind,
        info,
        content,
        path_mappings,
        accent_colors,
        led_settings,
    };
    info!(
        kind = %kind,
        mappings = manifest.mapping_count(),
        skipped,
        "Manifest regenerated"
    );
    Ok(manifest)
}

/// Content sections for the given kinds, derived from their mappings.
pub fn summarize(
    kinds: &[ComponentKind],
    mappings: &BTreeMap<ComponentKind, Vec<PathMapping>>,
    has_accents: bool,
    has_leds: bool,
) -> Content {
    let mut content = Content::default();
    let empty = Vec::new();

    for kind in kinds {
        let entries = mappings.get(kind).unwrap_or(&empty);
        let under = |dir: &str| {
            entries
                .iter()
                .filter(|m| segments(&m.package_path).first() == Some(&dir))
                .count()
        };
        match kind {
            ComponentKind::Wallpaper => {
                content.wallpapers = Some(WallpaperContent {
                    present: !entries.is_empty(),
                    count: entries.len(),
                    system_count: under(SYSTEM_WALLPAPERS),
                    list_count: under(LIST_WALLPAPERS),
                    collection_count: under(COLLECTION_WALLPAPERS),
                });
            }
            ComponentKind::Icon => {
                content.icons = Some(IconContent {
                    present: !entries.is_empty(),
                    system_count: under(SYSTEM_ICONS),
                    tool_count: under(TOOL_ICONS),
                    collection_count: under(COLLECTION_ICONS),
                });
            }
            ComponentKind::Overlay => {
                let systems: BTreeSet<String> = entries
                    .iter()
                    .filter_map(|m| m.meta(META_SYSTEM_TAG).map(str::to_string))
                    .collect();
                content.overlays = Some(OverlayContent {
                    present: !entries.is_empty(),
                    count: entries.len(),
                    systems: systems.into_iter().collect(),
                });
            }
            ComponentKind::Font => {
                let slots: BTreeSet<FontSlot> = entries
                    .iter()
                    .filter_map(|m| {
                        let last = segments(&m.package_path).last().copied()?;
                        FontSlot::from_package_file(last)
                    })
                    .collect();
                content.fonts = Some(FontContent {
                    present: !slots.is_empty(),
                    og_replaced: slots.contains(&FontSlot::Og),
                    next_replaced: slots.contains(&FontSlot::Next),
                    og_backup: slots.contains(&FontSlot::OgBackup),
                    next_backup: slots.contains(&FontSlot::NextBackup),
                });
            }
            ComponentKind::Accent => content.accents = Some(FlagContent { present: has_accents }),
            ComponentKind::Led => content.leds = Some(FlagContent { present: has_leds }),
            ComponentKind::FullTheme => {}
        }
    }
    content
}

/// Display name of a package: its directory name without the extension.
pub fn package_name(package: &Path) -> String {
    package
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| "Untitled".to_string(), |n| file_stem(n).to_string())
}
