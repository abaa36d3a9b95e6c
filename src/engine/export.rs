//! Building a package from the live device.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{EngineContext, FileCopy, package_target};
use crate::config::join_package_relative;
use crate::error::{IoResultExt, Result, ThemeError};
use crate::fsutil::{copy_file, package_dir, remove_dir_if_exists};
use crate::kind::ComponentKind;
use crate::manifest::{self, Manifest, PREVIEW_FILE, PackageInfo};
use crate::resolver::device_slots;

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Package name; the directory becomes `<name>.<ext>`.
    pub name: String,
    pub kind: ComponentKind,
    pub selection: Option<Vec<ComponentKind>>,
    pub output_dir: PathBuf,
    /// Image copied in as the package preview.
    pub preview: Option<PathBuf>,
    pub author: Option<String>,
}

impl ExportRequest {
    pub fn new(name: impl Into<String>, kind: ComponentKind, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            selection: None,
            output_dir: output_dir.into(),
            preview: None,
            author: None,
        }
    }

    pub fn with_selection(mut self, selection: Vec<ComponentKind>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_preview(mut self, preview: impl Into<PathBuf>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub package: PathBuf,
    pub kind: ComponentKind,
    pub kinds: Vec<ComponentKind>,
    /// Device files copied into the package.
    pub copied: Vec<FileCopy>,
    /// Slots the kind covers that had no file on the device.
    pub empty_slots: usize,
    pub accents_exported: bool,
    pub leds_exported: bool,
    pub has_preview: bool,
    pub manifest: Manifest,
}

/// Copy the device's current files and settings into a new package.
///
/// The package directory is not deduplicated: an existing package of the
/// same name is replaced, so the manifest only lists files from this export.
#[instrument(skip_all, fields(name = %request.name, kind = %request.kind))]
pub fn export(ctx: &EngineContext<'_>, request: &ExportRequest) -> Result<ExportReport> {
    if let Some(preview) = &request.preview {
        if !preview.is_file() {
            return Err(ThemeError::SourceNotFound {
                path: preview.display().to_string(),
            });
        }
    }

    // Read before the old package goes; the preview may live inside it.
    let preview = match &request.preview {
        Some(path) => Some(fs::read(path).at_path(path)?),
        None => None,
    };

    let kinds = request.kind.expand_selection(request.selection.as_deref());
    let package = package_dir(&request.output_dir, &request.name, request.kind.extension());
    if remove_dir_if_exists(&package)? {
        debug!(package = %package.display(), "Replaced existing package");
    }
    fs::create_dir_all(&package).at_path(&package)?;

    let mut copied = Vec::new();
    let mut empty_slots = 0;
    if let Some(inventory) = ctx.inventory_for(&kinds)? {
        for kind in kinds.iter().copied().filter(|k| k.carries_files()) {
            for slot in device_slots(ctx.layout, &inventory, kind)? {
                if !slot.device_path.is_file() {
                    empty_slots += 1;
                    continue;
                }
                let target = package_target(request.kind, &slot.package_path);
                copy_file(&slot.device_path, &join_package_relative(&package, target))?;
                debug!(from = %slot.device_path.display(), to = target, "Exported file");
                copied.push(FileCopy {
                    package_path: target.to_string(),
                    device_path: slot.device_path,
                });
            }
        }
    }

    let accents = if kinds.contains(&ComponentKind::Accent) {
        ctx.accents.read_accents()?
    } else {
        None
    };
    let leds = if kinds.contains(&ComponentKind::Led) {
        ctx.leds.read_leds()?
    } else {
        None
    };

    let has_preview = match &preview {
        Some(bytes) => {
            let target = package.join(PREVIEW_FILE);
            fs::write(&target, bytes).at_path(&target)?;
            true
        }
        None => false,
    };

    let info = PackageInfo::new(request.name.clone(), request.author.as_deref());
    let manifest = manifest::build(&package, request.kind, ctx.layout, info, accents, leds)?;
    manifest::write(&package, &manifest)?;

    info!(
        package = %package.display(),
        files = copied.len(),
        empty_slots,
        "Export complete"
    );
    Ok(ExportReport {
        package,
        kind: request.kind,
        kinds,
        copied,
        empty_slots,
        accents_exported: manifest.accent_colors.is_some(),
        leds_exported: manifest.led_settings.is_some(),
        has_preview,
        manifest,
    })
}
