//! Robot mode JSON output implementation.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::catalog::CatalogEntry;
use crate::config::ThemerConfig;
use crate::engine::{DeconstructReport, ExportReport, ImportReport, VerifyReport};
use crate::error::ThemeError;
use crate::inventory::SystemInventory;
use crate::manifest::Manifest;

use super::{Output, ResolveResult, RobotFormat, VersionInfo};

/// JSON output implementation for AI agents and scripting.
///
/// Results go to stdout; errors go to stderr as a single JSON object.
pub struct RobotOutput {
    format: RobotFormat,
}

/// Serialize `data` in the requested shape.
pub fn render_json<T: Serialize + ?Sized>(
    data: &T,
    format: RobotFormat,
) -> serde_json::Result<String> {
    match format {
        RobotFormat::Json => serde_json::to_string_pretty(data),
        RobotFormat::JsonCompact => serde_json::to_string(data),
    }
}

/// The JSON object printed for a failed command.
pub fn error_json(error: &ThemeError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "kind": error.kind(),
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        match render_json(data, self.format) {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(e) => warn!(error = %e, "Failed to serialize output"),
        }
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &ThemeError) {
        debug!(error = %error, "Robot: error");
        match serde_json::to_string_pretty(&error_json(error)) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{error}"),
        }
    }

    fn warning(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    fn info(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip_all, fields(systems = inventory.system_count()))]
    fn systems(&self, inventory: &SystemInventory) {
        debug!("Robot: systems");
        self.output_json(inventory);
    }

    fn media_initialized(&self, created: &[PathBuf]) {
        self.output_json(&serde_json::json!({
            "ok": true,
            "created": created,
        }));
    }

    fn resolution(&self, result: &ResolveResult) {
        self.output_json(result);
    }

    #[instrument(skip_all, fields(copied = report.copied.len()))]
    fn import_report(&self, report: &ImportReport) {
        debug!("Robot: import_report");
        self.output_json(report);
    }

    #[instrument(skip_all, fields(copied = report.copied.len()))]
    fn export_report(&self, report: &ExportReport) {
        debug!("Robot: export_report");
        self.output_json(report);
    }

    fn deconstruct_report(&self, report: &DeconstructReport) {
        self.output_json(report);
    }

    fn verify_report(&self, report: &VerifyReport) {
        self.output_json(&serde_json::json!({
            "applied": report.is_applied(),
            "report": report,
        }));
    }

    /// The manifest is printed in its on-disk wire format.
    fn manifest(&self, _package: &Path, manifest: &Manifest, _regenerated: bool) {
        self.output_json(manifest);
    }

    fn catalog(&self, _dir: &Path, entries: &[CatalogEntry]) {
        self.output_json(entries);
    }

    fn config(&self, config: &ThemerConfig) {
        self.output_json(config);
    }

    fn config_path(&self, path: Option<&Path>) {
        self.output_json(&serde_json::json!({ "path": path }));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
