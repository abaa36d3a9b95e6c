//! Output mode abstraction for robot and human output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::CatalogEntry;
use crate::cli::Cli;
use crate::config::ThemerConfig;
use crate::engine::{DeconstructReport, ExportReport, ImportReport, VerifyReport};
use crate::error::ThemeError;
use crate::inventory::SystemInventory;
use crate::kind::ComponentKind;
use crate::manifest::Manifest;
use crate::resolver::Resolution;

pub mod human;
mod palette;
pub mod progress;
pub mod robot;

pub use human::HumanOutput;
pub use progress::Spinner;
pub use robot::RobotOutput;

/// Where one package path lands, or that it lands nowhere.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveResult {
    pub kind: ComponentKind,
    pub package_path: String,
    /// Kind of the rule that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<ComponentKind>,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub metadata: std::collections::BTreeMap<String, String>,
}

impl ResolveResult {
    pub fn new(
        kind: ComponentKind,
        package_path: impl Into<String>,
        owner: Option<ComponentKind>,
        resolution: Option<Resolution>,
    ) -> Self {
        let (device_path, metadata) = match resolution {
            Some(r) => (Some(r.device_path), r.metadata),
            None => (None, std::collections::BTreeMap::new()),
        };
        Self {
            kind,
            package_path: package_path.into(),
            owner,
            resolved: device_path.is_some(),
            device_path,
            metadata,
        }
    }
}

/// Build metadata shown by `themer version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool, quiet: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color && console::colors_enabled(),
                quiet: cli.quiet,
            }
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color, quiet } => Box::new(HumanOutput::new(color, quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &ThemeError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Device
    fn systems(&self, inventory: &SystemInventory);
    fn media_initialized(&self, created: &[PathBuf]);
    fn resolution(&self, result: &ResolveResult);

    // Package operations
    fn import_report(&self, report: &ImportReport);
    fn export_report(&self, report: &ExportReport);
    fn deconstruct_report(&self, report: &DeconstructReport);
    fn verify_report(&self, report: &VerifyReport);
    fn manifest(&self, package: &Path, manifest: &Manifest, regenerated: bool);
    fn catalog(&self, dir: &Path, entries: &[CatalogEntry]);

    // Metadata
    fn config(&self, config: &ThemerConfig);
    fn config_path(&self, path: Option<&Path>);
    fn version_info(&self, info: &VersionInfo);
}
