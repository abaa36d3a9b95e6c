//! Comparing a package against what is currently on the device.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{EngineContext, plan_files};
use crate::error::{Result, ThemeError};
use crate::fsutil::sha256_file;
use crate::kind::ComponentKind;
use crate::manifest;
use crate::resolver::PathResolver;

/// Per-file comparison of a package with the device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub package: PathBuf,
    pub kind: Option<ComponentKind>,
    /// Device file has the same SHA-256 as the package file.
    pub matching: Vec<String>,
    pub differing: Vec<String>,
    /// Resolved, but nothing at the device path.
    pub missing: Vec<String>,
    pub unresolved: Vec<String>,
    /// `None` when the package carries no accent colors.
    pub accents_match: Option<bool>,
    pub leds_match: Option<bool>,
}

impl VerifyReport {
    /// True when every resolvable file and setting is already applied.
    pub fn is_applied(&self) -> bool {
        self.differing.is_empty()
            && self.missing.is_empty()
            && self.accents_match != Some(false)
            && self.leds_match != Some(false)
    }
}

/// Check whether a package's content is what the device currently holds.
///
/// Read-only; uses the same resolution as import.
#[instrument(skip(ctx), fields(package = %package.display()))]
pub fn verify(
    ctx: &EngineContext<'_>,
    package: &Path,
    context_tag: Option<&str>,
) -> Result<VerifyReport> {
    if !package.is_dir() {
        return Err(ThemeError::package_not_found(package));
    }
    let kind = ComponentKind::from_package_path(package)?;
    let manifest = manifest::read(package)?;
    let kinds = kind.expand_selection(None);

    let mut report = VerifyReport {
        package: package.to_path_buf(),
        kind: Some(kind),
        ..VerifyReport::default()
    };

    if let Some(inventory) = ctx.inventory_for(&kinds)? {
        let resolver = PathResolver::live(ctx.layout, &inventory);
        let (planned, unresolved) =
            plan_files(&resolver, package, kind, &kinds, &manifest, context_tag)?;
        report.unresolved = unresolved;

        for file in planned {
            let device = &file.copy.device_path;
            let bucket = if !device.is_file() {
                &mut report.missing
            } else if sha256_file(&file.source)? == sha256_file(device)? {
                &mut report.matching
            } else {
                &mut report.differing
            };
            bucket.push(file.copy.package_path);
        }
    }

    if let Some(colors) = manifest
        .accent_colors
        .as_ref()
        .filter(|_| kinds.contains(&ComponentKind::Accent))
    {
        report.accents_match = Some(ctx.accents.read_accents()?.as_ref() == Some(colors));
    }
    if let Some(leds) = manifest
        .led_settings
        .as_ref()
        .filter(|leds| !leds.is_empty() && kinds.contains(&ComponentKind::Led))
    {
        let current = ctx.leds.read_leds()?.unwrap_or_default();
        report.leds_match = Some(leds.iter().all(|(name, light)| current.get(name) == Some(light)));
    }

    debug!(
        accents_match = ?report.accents_match,
        leds_match = ?report.leds_match,
        "Compared leaf settings"
    );
    info!(
        matching = report.matching.len(),
        differing = report.differing.len(),
        missing = report.missing.len(),
        unresolved = report.unresolved.len(),
        "Verification complete"
    );
    Ok(report)
}
