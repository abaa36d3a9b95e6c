//! Splitting a full theme into single-purpose component packages.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{EngineContext, package_target};
use crate::config::join_package_relative;
use crate::error::{IoResultExt, Result, ThemeError};
use crate::fsutil::{copy_file, package_dir, remove_dir_if_exists};
use crate::kind::ComponentKind;
use crate::manifest::{self, PREVIEW_FILE, PackageInfo, exported_by, package_name};

#[derive(Debug, Clone)]
pub struct DeconstructRequest {
    pub theme: PathBuf,
    pub output_dir: PathBuf,
}

impl DeconstructRequest {
    pub fn new(theme: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme: theme.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// One component package produced from the theme.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentPackage {
    pub kind: ComponentKind,
    pub path: PathBuf,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeconstructReport {
    pub theme: PathBuf,
    pub packages: Vec<ComponentPackage>,
    /// Component kinds the theme had no content for.
    pub skipped: Vec<ComponentKind>,
}

/// Materialize one package per component kind the theme has content for.
///
/// The theme's manifest is regenerated from its tree first, so counts reflect
/// the files actually present. A theme with no recognized content yields an
/// empty report.
#[instrument(skip_all, fields(theme = %request.theme.display()))]
pub fn deconstruct(ctx: &EngineContext<'_>, request: &DeconstructRequest) -> Result<DeconstructReport> {
    let theme = request.theme.as_path();
    if !theme.is_dir() {
        return Err(ThemeError::package_not_found(theme));
    }
    if ComponentKind::from_package_path(theme)? != ComponentKind::FullTheme {
        return Err(ThemeError::UnknownPackageKind {
            path: theme.display().to_string(),
        });
    }

    let source = manifest::regenerate(theme, ComponentKind::FullTheme, ctx.layout)?;
    let stem = package_name(theme);
    let preview = theme.join(PREVIEW_FILE);

    let mut packages = Vec::new();
    let mut skipped = Vec::new();
    for kind in ComponentKind::COMPONENTS {
        let entries = source.mappings(kind);
        let has_content = match kind {
            ComponentKind::Accent => source.accent_colors.is_some(),
            ComponentKind::Led => source.led_settings.is_some(),
            _ => !entries.is_empty(),
        };
        if !has_content {
            debug!(kind = %kind, "No content; skipping component");
            skipped.push(kind);
            continue;
        }

        let dest = package_dir(&request.output_dir, &stem, kind.extension());
        remove_dir_if_exists(&dest)?;
        fs::create_dir_all(&dest).at_path(&dest)?;
        for entry in entries {
            let target = package_target(kind, &entry.package_path);
            copy_file(
                &join_package_relative(theme, &entry.package_path),
                &join_package_relative(&dest, target),
            )?;
        }
        if kind.requires_preview() && preview.is_file() {
            copy_file(&preview, &dest.join(PREVIEW_FILE))?;
        }

        let info = PackageInfo {
            name: stem.clone(),
            version: source.info.version.clone(),
            author: source.info.author.clone(),
            creation_date: Utc::now(),
            exported_by: exported_by(),
        };
        let component = manifest::build(
            &dest,
            kind,
            ctx.layout,
            info,
            source.accent_colors.clone(),
            source.led_settings.clone(),
        )?;
        manifest::write(&dest, &component)?;

        debug!(kind = %kind, path = %dest.display(), files = entries.len(), "Wrote component package");
        packages.push(ComponentPackage {
            kind,
            path: dest,
            files: entries.len(),
        });
    }

    info!(packages = packages.len(), "Deconstruction complete");
    Ok(DeconstructReport {
        theme: theme.to_path_buf(),
        packages,
        skipped,
    })
}
