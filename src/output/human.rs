//! Human-friendly output implementation using console styles.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use crate::catalog::CatalogEntry;
use crate::config::ThemerConfig;
use crate::engine::{DeconstructReport, ExportReport, FileCopy, ImportReport, VerifyReport};
use crate::error::ThemeError;
use crate::inventory::SystemInventory;
use crate::kind::ComponentKind;
use crate::manifest::Manifest;

use super::palette::Palette;
use super::{Output, ResolveResult, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    palette: Palette,
    quiet: bool,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            palette: Palette::new(color),
            quiet,
        }
    }

    fn header(&self, title: &str) {
        println!("{}", self.palette.header.apply_to(title));
    }

    fn field(&self, name: &str, value: impl std::fmt::Display) {
        println!(
            "  {}{}",
            self.palette.label.apply_to(format!("{name:<12}")),
            self.palette.value.apply_to(value)
        );
    }

    fn kinds(&self, kinds: &[ComponentKind]) -> String {
        kinds
            .iter()
            .map(|k| self.palette.kind.apply_to(k.label()).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Per-file lines are detail; `--quiet` drops them.
    fn copies(&self, verb: &str, copies: &[FileCopy]) {
        if self.quiet {
            return;
        }
        for copy in copies {
            println!(
                "  {} {} {} {}",
                self.palette.muted.apply_to(verb),
                copy.package_path,
                self.palette.muted.apply_to("->"),
                self.palette.path.apply_to(copy.device_path.display())
            );
        }
    }

    fn unresolved(&self, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        self.warning(&format!("{} file(s) matched no device location", paths.len()));
        if !self.quiet {
            for path in paths {
                println!("    {}", self.palette.muted.apply_to(path));
            }
        }
    }

    fn path_list(&self, label: &str, paths: &[String]) {
        if paths.is_empty() {
            return;
        }
        println!("  {} ({})", self.palette.label.apply_to(label), paths.len());
        if !self.quiet {
            for path in paths {
                println!("    {path}");
            }
        }
    }

    fn yes_no(&self, value: bool) -> String {
        if value {
            self.palette.success.apply_to("yes").to_string()
        } else {
            self.palette.muted.apply_to("no").to_string()
        }
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        println!("{} {message}", self.palette.success.apply_to("[OK]"));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &ThemeError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {}", self.palette.error.apply_to("[ERR]"), error);
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!(
                "  {} {}",
                self.palette.label.apply_to("Suggestion:"),
                self.palette.muted.apply_to(suggestion)
            );
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        eprintln!("{} {message}", self.palette.warning.apply_to("[WARN]"));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {message}", self.palette.accent.apply_to("[INFO]"));
        }
    }

    #[instrument(skip_all, fields(systems = inventory.system_count()))]
    fn systems(&self, inventory: &SystemInventory) {
        if inventory.is_empty() {
            self.warning(&format!(
                "No systems found under {}",
                inventory.root.display()
            ));
            return;
        }
        self.header(&format!("Systems ({})", inventory.system_count()));
        let width = inventory
            .systems
            .iter()
            .map(|s| s.tag.len())
            .max()
            .unwrap_or(0);
        for system in &inventory.systems {
            println!(
                "  {}  {}",
                self.palette.kind.apply_to(format!("{:<width$}", system.tag)),
                system.name
            );
        }
        if !inventory.collections.is_empty() {
            self.header(&format!("Collections ({})", inventory.collections.len()));
            for collection in &inventory.collections {
                println!("  {collection}");
            }
        }
    }

    #[instrument(skip_all, fields(created = created.len()))]
    fn media_initialized(&self, created: &[PathBuf]) {
        if created.is_empty() {
            self.success("All media folders already exist");
            return;
        }
        if !self.quiet {
            for dir in created {
                println!("  {}", self.palette.path.apply_to(dir.display()));
            }
        }
        self.success(&format!("Created {} media folder(s)", created.len()));
    }

    #[instrument(skip_all, fields(path = %result.package_path))]
    fn resolution(&self, result: &ResolveResult) {
        match &result.device_path {
            Some(device) => {
                println!(
                    "{} {} {}",
                    result.package_path,
                    self.palette.muted.apply_to("->"),
                    self.palette.path.apply_to(device.display())
                );
                if let Some(owner) = result.owner {
                    self.field("Kind", owner.label());
                }
                for (key, value) in &result.metadata {
                    self.field(key, value);
                }
            }
            None => self.warning(&format!(
                "{} does not map to any device location",
                result.package_path
            )),
        }
    }

    #[instrument(skip_all, fields(package = %report.package.display()))]
    fn import_report(&self, report: &ImportReport) {
        let verb = if report.dry_run { "would copy" } else { "copied" };
        self.copies(verb, &report.copied);
        if !self.quiet {
            for backup in &report.font_backups {
                println!(
                    "  {} {}",
                    self.palette.muted.apply_to("backed up font to"),
                    self.palette.path.apply_to(backup.display())
                );
            }
        }
        self.unresolved(&report.unresolved);

        let mut parts = vec![format!("{} file(s)", report.copied.len())];
        if !report.unchanged.is_empty() {
            parts.push(format!("{} unchanged", report.unchanged.len()));
        }
        if report.accents_applied {
            parts.push("accent colors".to_string());
        }
        if report.leds_applied {
            parts.push("LED settings".to_string());
        }
        let summary = format!(
            "{} {} ({})",
            if report.dry_run { "Dry run:" } else { "Applied" },
            parts.join(", "),
            self.kinds(&report.kinds)
        );
        if report.dry_run {
            self.info(&summary);
        } else {
            self.success(&summary);
        }
    }

    #[instrument(skip_all, fields(package = %report.package.display()))]
    fn export_report(&self, report: &ExportReport) {
        self.copies("exported", &report.copied);
        self.success(&format!(
            "Exported {} file(s) to {}",
            report.copied.len(),
            self.palette.path.apply_to(report.package.display())
        ));
        if report.empty_slots > 0 && !self.quiet {
            println!(
                "  {}",
                self.palette.muted.apply_to(format!(
                    "{} slot(s) had no file on the device",
                    report.empty_slots
                ))
            );
        }
        if report.kinds.contains(&ComponentKind::Accent) {
            self.field("Accents", self.yes_no(report.accents_exported));
        }
        if report.kinds.contains(&ComponentKind::Led) {
            self.field("LEDs", self.yes_no(report.leds_exported));
        }
        self.field("Preview", self.yes_no(report.has_preview));
    }

    #[instrument(skip_all, fields(theme = %report.theme.display()))]
    fn deconstruct_report(&self, report: &DeconstructReport) {
        if report.packages.is_empty() {
            self.warning("Theme has no component content to split out");
            return;
        }
        for package in &report.packages {
            println!(
                "  {} {} ({} file(s))",
                self.palette.kind.apply_to(format!("{:<10}", package.kind.label())),
                self.palette.path.apply_to(package.path.display()),
                package.files
            );
        }
        if !report.skipped.is_empty() && !self.quiet {
            println!(
                "  {} {}",
                self.palette.label.apply_to("No content:"),
                self.kinds(&report.skipped)
            );
        }
        self.success(&format!("Created {} component package(s)", report.packages.len()));
    }

    #[instrument(skip_all, fields(package = %report.package.display()))]
    fn verify_report(&self, report: &VerifyReport) {
        self.field("Matching", report.matching.len());
        self.path_list("Differing", &report.differing);
        self.path_list("Missing on device", &report.missing);
        self.unresolved(&report.unresolved);
        if let Some(matches) = report.accents_match {
            self.field("Accents", self.yes_no(matches));
        }
        if let Some(matches) = report.leds_match {
            self.field("LEDs", self.yes_no(matches));
        }
        if report.is_applied() {
            self.success("Package is applied on the device");
        } else {
            self.warning("Device differs from the package");
        }
    }

    #[instrument(skip_all, fields(package = %package.display()))]
    fn manifest(&self, package: &Path, manifest: &Manifest, regenerated: bool) {
        self.header(&manifest.info.name);
        self.field("Kind", manifest.kind.label());
        self.field("Version", &manifest.info.version);
        self.field("Author", &manifest.info.author);
        self.field("Created", manifest.info.creation_date.format("%Y-%m-%d %H:%M UTC"));
        self.field("Exported by", &manifest.info.exported_by);
        for (kind, entries) in &manifest.path_mappings {
            self.field(&format!("{} files", kind.label()), entries.len());
        }
        if let Some(colors) = &manifest.accent_colors {
            self.field("Accents", colors.color1.as_str());
        }
        if let Some(leds) = &manifest.led_settings {
            self.field("LED zones", leds.len());
        }
        if regenerated {
            self.success(&format!("Manifest rebuilt in {}", package.display()));
        }
    }

    #[instrument(skip_all, fields(count = entries.len()))]
    fn catalog(&self, dir: &Path, entries: &[CatalogEntry]) {
        if entries.is_empty() {
            self.warning(&format!("No packages found in {}", dir.display()));
            return;
        }
        self.header(&format!("Packages in {} ({})", dir.display(), entries.len()));
        for entry in entries {
            let detail = match &entry.error {
                Some(err) => self.palette.error.apply_to(err.clone()).to_string(),
                None => format!(
                    "{} file(s), by {}",
                    entry.mappings,
                    entry.author.as_deref().unwrap_or("unknown")
                ),
            };
            println!(
                "  {} {}  {}",
                self.palette.kind.apply_to(format!("{:<10}", entry.kind.label())),
                self.palette.value.apply_to(&entry.name),
                self.palette.muted.apply_to(detail)
            );
        }
    }

    #[instrument(skip_all)]
    fn config(&self, config: &ThemerConfig) {
        self.header("Configuration");
        match &config.source {
            Some(path) => self.field("File", path.display()),
            None => self.field("File", "(defaults)"),
        }
        self.field("Device root", config.device_root.display());
        self.field("Platform", &config.platform);
        self.field("Packages", config.packages_dir.display());
        self.field("Author", config.author.as_deref().unwrap_or("-"));
        let layout = config.layout();
        self.field("Accent file", layout.accent_settings_file().display());
        self.field("LED file", layout.led_settings_file().display());
    }

    fn config_path(&self, path: Option<&Path>) {
        match path {
            Some(path) => println!("{}", path.display()),
            None => self.warning("No configuration directory on this platform"),
        }
    }

    #[instrument(skip(self))]
    fn version_info(&self, info: &VersionInfo) {
        println!("{} {}", self.palette.header.apply_to("themer"), info.version);
        let dirty = if info.git_dirty {
            self.palette.warning.apply_to(" (dirty)").to_string()
        } else {
            String::new()
        };
        self.field("Git SHA", format!("{}{dirty}", info.git_sha));
        self.field("Built", info.build_timestamp);
        self.field("Rust", info.rustc_version);
        self.field("Target", info.target);
    }
}
