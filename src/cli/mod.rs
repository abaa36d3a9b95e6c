//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::kind::ComponentKind;

/// Handheld Themer - apply, export and recombine device theme packages.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "themer", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "THEMER_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (default: <config dir>/themer/config.toml)
    #[arg(long, global = true, env = "THEMER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SD card root of the device
    #[arg(long, global = true, env = "THEMER_DEVICE_ROOT", value_name = "DIR")]
    pub device_root: Option<PathBuf>,

    /// Platform folder name used under Tools/ and .system/
    #[arg(long, global = true, env = "THEMER_PLATFORM")]
    pub platform: Option<String>,

    /// Directory packages are exported to and listed from
    #[arg(long, global = true, env = "THEMER_PACKAGES_DIR", value_name = "DIR")]
    pub packages_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }

    /// Configuration values given on the command line or environment.
    pub fn overrides(&self) -> ConfigOverrides {
        let (packages_dir, author) = match &self.command {
            Some(Commands::List(args)) => (args.dir.clone(), None),
            Some(Commands::Export(args)) => (None, args.author.clone()),
            _ => (None, None),
        };
        ConfigOverrides {
            device_root: self.device_root.clone(),
            platform: self.platform.clone(),
            packages_dir: packages_dir.or_else(|| self.packages_dir.clone()),
            author,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Device Discovery ===
    /// List the systems installed on the device
    Systems,

    /// Create missing .media folders for every menu and system
    InitMedia,

    /// Show where a package file would land on the device
    Resolve(ResolveArgs),

    // === Package Operations ===
    /// Apply a package to the device
    #[command(visible_alias = "apply")]
    Import(ImportArgs),

    /// Build a package from the device's current look
    Export(ExportArgs),

    /// Split a full theme into component packages
    Deconstruct(DeconstructArgs),

    /// Compare a package against the device
    Verify(VerifyArgs),

    /// Inspect or rebuild a package manifest
    #[command(subcommand)]
    Manifest(ManifestCommand),

    /// List packages in a directory
    #[command(visible_alias = "ls")]
    List(ListArgs),

    // === Configuration ===
    /// Show current configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Package kind the path is read under (theme, wallpaper, icon, font, overlay, ...)
    #[arg(value_parser = parse_kind)]
    pub kind: ComponentKind,

    /// Package-relative path, e.g. "SystemWallpapers/Game Boy (GB).png"
    pub package_path: String,

    /// Fallback system tag for names without one
    #[arg(long, short = 't')]
    pub tag: Option<String>,
}

/// Arguments for applying a package.
///
/// # Examples
///
/// ```bash
/// # Apply everything in a theme
/// themer import ~/Themes/Retro.theme
///
/// # Only wallpapers and icons
/// themer import ~/Themes/Retro.theme --only wallpaper,icon
///
/// # Preview changes first
/// themer import ~/Themes/Retro.theme --dry-run
/// ```
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Package directory (.theme, .bg, .icon, .acc, .led, .font, .over)
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// Component kinds to apply from a full theme (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_kind)]
    pub only: Vec<ComponentKind>,

    /// Fallback system tag for files whose name carries none
    #[arg(long, short = 't')]
    pub tag: Option<String>,

    /// Skip device files that already hold identical bytes (compare by hash)
    #[arg(long)]
    pub skip_unchanged: bool,

    /// Dry run - show what would happen without applying
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Package name; the directory is created as <NAME>.<ext>
    pub name: String,

    /// Kind of package to build
    #[arg(long, short = 'k', default_value = "theme", value_parser = parse_kind)]
    pub kind: ComponentKind,

    /// Component kinds to include in a full theme (comma separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_kind)]
    pub only: Vec<ComponentKind>,

    /// Image to copy in as the package preview
    #[arg(long, value_name = "PNG")]
    pub preview: Option<PathBuf>,

    /// Author recorded in the manifest
    #[arg(long, env = "THEMER_AUTHOR")]
    pub author: Option<String>,

    /// Output directory (default: configured packages directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DeconstructArgs {
    /// Full theme package (.theme)
    pub theme: PathBuf,

    /// Output directory (default: the theme's parent directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    pub package: PathBuf,

    /// Fallback system tag for files whose name carries none
    #[arg(long, short = 't')]
    pub tag: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ManifestCommand {
    /// Print a package's manifest
    Show(ManifestArgs),

    /// Rebuild a package's manifest from the files it contains
    Regenerate(ManifestArgs),
}

#[derive(Parser, Debug)]
pub struct ManifestArgs {
    pub package: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Directory to scan (default: configured packages directory)
    pub dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_kind(s: &str) -> Result<ComponentKind, String> {
    s.parse::<ComponentKind>().map_err(|e| e.to_string())
}
