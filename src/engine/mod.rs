//! Package operations against a device: import, export, deconstruct, verify.
//!
//! Every operation takes an [`EngineContext`] carrying the device layout and
//! the leaf settings stores, plus a request struct built by the caller. The
//! engine keeps no state between calls.
//!
//! Failure policy is fail-fast: the first copy error aborts the operation and
//! files already written stay where they are.

mod deconstruct;
mod export;
mod import;
mod verify;

pub use deconstruct::{ComponentPackage, DeconstructReport, DeconstructRequest, deconstruct};
pub use export::{ExportReport, ExportRequest, export};
pub use import::{ImportReport, ImportRequest, import};
pub use verify::{VerifyReport, verify};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{trace, warn};

use crate::config::{DeviceLayout, join_package_relative};
use crate::error::Result;
use crate::fsutil::package_files;
use crate::inventory::{self, SystemInventory};
use crate::kind::ComponentKind;
use crate::manifest::{MANIFEST_FILE, Manifest, PREVIEW_FILE};
use crate::resolver::{META_SYSTEM_TAG, PathResolver};
use crate::settings::{AccentStore, LedStore};

/// Explicit context for one engine operation.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub layout: &'a DeviceLayout,
    pub accents: &'a dyn AccentStore,
    pub leds: &'a dyn LedStore,
}

impl<'a> EngineContext<'a> {
    pub const fn new(
        layout: &'a DeviceLayout,
        accents: &'a dyn AccentStore,
        leds: &'a dyn LedStore,
    ) -> Self {
        Self {
            layout,
            accents,
            leds,
        }
    }

    /// Discover the device, but only when one of `kinds` copies files.
    ///
    /// Accent and LED operations work without a ROM directory, and so do
    /// fonts, which get an empty inventory.
    fn inventory_for(&self, kinds: &[ComponentKind]) -> Result<Option<SystemInventory>> {
        if kinds.iter().any(|k| k.needs_inventory()) {
            inventory::discover(self.layout).map(Some)
        } else if kinds.iter().any(|k| k.carries_files()) {
            trace!("No system-dependent kinds; skipping discovery");
            Ok(Some(SystemInventory::empty(self.layout)))
        } else {
            Ok(None)
        }
    }
}

/// A package file and the device path it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCopy {
    pub package_path: String,
    pub device_path: PathBuf,
}

/// A resolved file ready to be copied.
#[derive(Debug, Clone)]
struct PlannedFile {
    owner: ComponentKind,
    source: PathBuf,
    copy: FileCopy,
}

/// Resolve every file of `package` that belongs to `kinds`.
///
/// Returns the planned copies and the package paths that matched no rule.
/// Files owned by kinds outside the selection are neither.
fn plan_files(
    resolver: &PathResolver<'_>,
    package: &Path,
    kind: ComponentKind,
    kinds: &[ComponentKind],
    manifest: &Manifest,
    context_tag: Option<&str>,
) -> Result<(Vec<PlannedFile>, Vec<String>)> {
    let mut planned = Vec::new();
    let mut unresolved = Vec::new();

    for file in package_files(package)? {
        if file == MANIFEST_FILE || file == PREVIEW_FILE {
            continue;
        }
        let owner = PathResolver::classify(kind, &file)
            .or_else(|| PathResolver::classify(ComponentKind::FullTheme, &file));
        let Some(owner) = owner else {
            warn!(path = %file, "Unresolved package file; skipping");
            unresolved.push(file);
            continue;
        };
        if !kinds.contains(&owner) {
            trace!(path = %file, owner = %owner, "Kind not selected; skipping");
            continue;
        }

        let tag = manifest
            .find_mapping(&file)
            .and_then(|m| m.meta(META_SYSTEM_TAG))
            .or(context_tag);
        let Some(resolution) = resolver.resolve(kind, &file, tag) else {
            warn!(path = %file, "Unresolved package file; skipping");
            unresolved.push(file);
            continue;
        };

        planned.push(PlannedFile {
            owner,
            source: join_package_relative(package, &file),
            copy: FileCopy {
                package_path: file,
                device_path: resolution.device_path,
            },
        });
    }
    Ok((planned, unresolved))
}

/// Where a device slot's file goes inside a package of `kind`.
///
/// Font component packages keep their fonts bare at the root.
fn package_target(kind: ComponentKind, package_path: &str) -> &str {
    if kind == ComponentKind::Font {
        package_path.rsplit('/').next().unwrap_or(package_path)
    } else {
        package_path
    }
}
