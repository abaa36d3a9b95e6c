//! Applying a package to the device.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{EngineContext, FileCopy, PlannedFile, plan_files};
use crate::config::{FontSlot, segments};
use crate::error::{Result, ThemeError};
use crate::fsutil::{copy_file, same_contents};
use crate::kind::ComponentKind;
use crate::manifest::{self, PREVIEW_FILE};
use crate::resolver::PathResolver;

/// What to import and how.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub package: PathBuf,
    pub kind: ComponentKind,
    /// Component kinds to apply from a full theme; `None` means all.
    pub selection: Option<Vec<ComponentKind>>,
    /// Fallback system tag for files whose name carries none.
    pub context_tag: Option<String>,
    /// Leave device files that already hold identical bytes alone.
    pub skip_unchanged: bool,
    /// Resolve and report without touching the device.
    pub dry_run: bool,
}

impl ImportRequest {
    pub fn new(package: impl Into<PathBuf>, kind: ComponentKind) -> Self {
        Self {
            package: package.into(),
            kind,
            selection: None,
            context_tag: None,
            skip_unchanged: false,
            dry_run: false,
        }
    }

    /// Request for a package whose kind follows from its extension.
    pub fn for_package(package: impl Into<PathBuf>) -> Result<Self> {
        let package = package.into();
        let kind = ComponentKind::from_package_path(&package)?;
        Ok(Self::new(package, kind))
    }

    pub fn with_selection(mut self, selection: Vec<ComponentKind>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_context_tag(mut self, tag: impl Into<String>) -> Self {
        self.context_tag = Some(tag.into());
        self
    }

    pub fn skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub package: PathBuf,
    pub kind: ComponentKind,
    pub kinds: Vec<ComponentKind>,
    pub dry_run: bool,
    /// Files copied (or that would be, in a dry run).
    pub copied: Vec<FileCopy>,
    /// Files skipped because the device already matched.
    pub unchanged: Vec<FileCopy>,
    /// Backup slots filled from the live font before it was replaced.
    pub font_backups: Vec<PathBuf>,
    /// Package paths that matched no rule.
    pub unresolved: Vec<String>,
    pub accents_applied: bool,
    pub leds_applied: bool,
    pub has_preview: bool,
}

impl ImportReport {
    fn new(request: &ImportRequest, kinds: Vec<ComponentKind>) -> Self {
        Self {
            package: request.package.clone(),
            kind: request.kind,
            kinds,
            dry_run: request.dry_run,
            copied: Vec::new(),
            unchanged: Vec::new(),
            font_backups: Vec::new(),
            unresolved: Vec::new(),
            accents_applied: false,
            leds_applied: false,
            has_preview: request.package.join(PREVIEW_FILE).is_file(),
        }
    }
}

/// Copy a package's files onto the device and apply its leaf settings.
///
/// The manifest must exist and parse before anything is written. Device
/// paths always come from live resolution; the manifest only contributes
/// per-file system tags, so stale or emptied mapping lists are harmless.
#[instrument(skip_all, fields(package = %request.package.display(), kind = %request.kind))]
pub fn import(ctx: &EngineContext<'_>, request: &ImportRequest) -> Result<ImportReport> {
    let package = request.package.as_path();
    if !package.is_dir() {
        return Err(ThemeError::package_not_found(package));
    }
    let manifest = manifest::read(package)?;
    let kinds = request.kind.expand_selection(request.selection.as_deref());
    let mut report = ImportReport::new(request, kinds.clone());
    if !report.has_preview {
        debug!("Package has no preview");
    }

    if let Some(inventory) = ctx.inventory_for(&kinds)? {
        let resolver = PathResolver::live(ctx.layout, &inventory);
        let (planned, unresolved) = plan_files(
            &resolver,
            package,
            request.kind,
            &kinds,
            &manifest,
            request.context_tag.as_deref(),
        )?;
        report.unresolved = unresolved;

        for file in planned {
            apply_file(ctx, request, &file, &mut report)?;
        }
    }

    if kinds.contains(&ComponentKind::Accent) {
        match &manifest.accent_colors {
            Some(colors) => {
                if !request.dry_run {
                    ctx.accents.write_accents(colors)?;
                }
                report.accents_applied = true;
            }
            None => debug!("Manifest has no accent colors"),
        }
    }
    if kinds.contains(&ComponentKind::Led) {
        match manifest.led_settings.as_ref().filter(|leds| !leds.is_empty()) {
            Some(leds) => {
                if !request.dry_run {
                    ctx.leds.write_leds(leds)?;
                }
                report.leds_applied = true;
            }
            None => debug!("Manifest has no LED settings"),
        }
    }

    info!(
        copied = report.copied.len(),
        unchanged = report.unchanged.len(),
        unresolved = report.unresolved.len(),
        dry_run = request.dry_run,
        "Import complete"
    );
    Ok(report)
}

fn apply_file(
    ctx: &EngineContext<'_>,
    request: &ImportRequest,
    file: &PlannedFile,
    report: &mut ImportReport,
) -> Result<()> {
    let target = &file.copy.device_path;
    if request.skip_unchanged && same_contents(&file.source, target)? {
        debug!(path = %file.copy.package_path, "Device file unchanged; skipping");
        report.unchanged.push(file.copy.clone());
        return Ok(());
    }

    if file.owner == ComponentKind::Font {
        if let Some(backup) = backup_live_font(ctx, request, &file.copy.package_path)? {
            report.font_backups.push(backup);
        }
    }

    if !request.dry_run {
        copy_file(&file.source, target)?;
    }
    debug!(
        from = %file.copy.package_path,
        to = %target.display(),
        dry_run = request.dry_run,
        "Imported file"
    );
    report.copied.push(file.copy.clone());
    Ok(())
}

/// Save the current live font into its backup slot if that slot is empty.
fn backup_live_font(
    ctx: &EngineContext<'_>,
    request: &ImportRequest,
    package_path: &str,
) -> Result<Option<PathBuf>> {
    let Some(slot) = segments(package_path)
        .last()
        .and_then(|name| FontSlot::from_package_file(name))
    else {
        return Ok(None);
    };
    let Some(backup) = slot.backup() else {
        return Ok(None);
    };
    let live = ctx.layout.font_path(slot);
    let backup_path = ctx.layout.font_path(backup);
    if !live.is_file() || backup_path.exists() {
        return Ok(None);
    }

    if !request.dry_run {
        copy_file(&live, &backup_path)?;
    }
    info!(slot = slot.name(), backup = %backup_path.display(), "Backed up live font");
    Ok(Some(backup_path))
}
