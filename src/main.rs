//! Handheld Themer CLI - apply, export and recombine device theme packages.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use serde::Serialize;
use tracing::debug;

use themer::catalog;
use themer::cli::{self, Cli, Commands, ManifestCommand};
use themer::config::{ThemerConfig, default_config_path};
use themer::engine::{
    self, DeconstructRequest, EngineContext, ExportRequest, ImportRequest,
};
use themer::error::{Result, ThemeError};
use themer::inventory;
use themer::kind::ComponentKind;
use themer::logging::init_logging;
use themer::manifest;
use themer::output::{Output, OutputMode, ResolveResult, Spinner, VersionInfo};
use themer::resolver::PathResolver;
use themer::settings::file_stores;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let output = OutputMode::from_cli(&cli).into_output();
    if let Err(e) = run(&cli, output.as_ref()) {
        output.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Version) => cmd_version(out),
        Some(Commands::Completions(args)) => cmd_completions(args),
        Some(Commands::Config(args)) if args.path => {
            out.config_path(cli.config.clone().or_else(default_config_path).as_deref());
            Ok(())
        }
        Some(command) => {
            let config = ThemerConfig::load(cli.config.as_deref(), &cli.overrides())?;
            run_with_config(cli, command, &config, out)
        }
    }
}

/// Commands that need the resolved configuration and device layout.
fn run_with_config(
    cli: &Cli,
    command: &Commands,
    config: &ThemerConfig,
    out: &dyn Output,
) -> Result<()> {
    let layout = config.layout();
    let (accents, leds) = file_stores(&layout);
    let ctx = EngineContext::new(&layout, &accents, &leds);
    let show_progress = !cli.use_json() && !cli.quiet;

    match command {
        Commands::Systems => {
            let inventory = inventory::discover(&layout)?;
            out.systems(&inventory);
        }
        Commands::InitMedia => {
            let inventory = inventory::discover(&layout)?;
            let created = inventory::ensure_media_directories(&inventory)?;
            out.media_initialized(&created);
        }
        Commands::Resolve(args) => cmd_resolve(&ctx, args, out)?,
        Commands::Import(args) => {
            let mut request = ImportRequest::for_package(&args.package)?
                .skip_unchanged(args.skip_unchanged)
                .dry_run(args.dry_run);
            if !args.only.is_empty() {
                request = request.with_selection(args.only.clone());
            }
            if let Some(tag) = &args.tag {
                request = request.with_context_tag(tag.clone());
            }
            let spinner = Spinner::start(
                show_progress && !args.dry_run,
                format!("Applying {}", args.package.display()),
            );
            let report = engine::import(&ctx, &request);
            spinner.finish();
            out.import_report(&report?);
        }
        Commands::Export(args) => {
            let output_dir = args.out.clone().unwrap_or_else(|| config.packages_dir.clone());
            let mut request = ExportRequest::new(&args.name, args.kind, output_dir);
            if !args.only.is_empty() {
                request = request.with_selection(args.only.clone());
            }
            if let Some(preview) = &args.preview {
                request = request.with_preview(preview);
            }
            if let Some(author) = args.author.as_ref().or(config.author.as_ref()) {
                request = request.with_author(author.clone());
            }
            let spinner = Spinner::start(show_progress, format!("Exporting {}", args.name));
            let report = engine::export(&ctx, &request);
            spinner.finish();
            out.export_report(&report?);
        }
        Commands::Deconstruct(args) => {
            let output_dir = args
                .out
                .clone()
                .or_else(|| args.theme.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            let spinner = Spinner::start(
                show_progress,
                format!("Splitting {}", args.theme.display()),
            );
            let report = engine::deconstruct(&ctx, &DeconstructRequest::new(&args.theme, output_dir));
            spinner.finish();
            out.deconstruct_report(&report?);
        }
        Commands::Verify(args) => {
            let report = engine::verify(&ctx, &args.package, args.tag.as_deref())?;
            out.verify_report(&report);
        }
        Commands::Manifest(ManifestCommand::Show(args)) => {
            let manifest = manifest::read(&args.package)?;
            out.manifest(&args.package, &manifest, false);
        }
        Commands::Manifest(ManifestCommand::Regenerate(args)) => {
            if !args.package.is_dir() {
                return Err(ThemeError::package_not_found(&args.package));
            }
            let kind = ComponentKind::from_package_path(&args.package)?;
            let manifest = manifest::regenerate(&args.package, kind, &layout)?;
            manifest::write(&args.package, &manifest)?;
            out.manifest(&args.package, &manifest, true);
        }
        Commands::List(_) => {
            let entries = catalog::list_packages(&config.packages_dir)?;
            out.catalog(&config.packages_dir, &entries);
        }
        Commands::Config(_) => out.config(config),
        Commands::Version | Commands::Completions(_) => {
            debug!("Handled before configuration was loaded");
        }
    }
    Ok(())
}

/// Resolve against the live device when its ROM directory exists, else by
/// naming convention alone.
fn cmd_resolve(ctx: &EngineContext<'_>, args: &cli::ResolveArgs, out: &dyn Output) -> Result<()> {
    let owner = PathResolver::classify(args.kind, &args.package_path);
    let resolution = if ctx.layout.roms_dir().is_dir() {
        let inventory = inventory::discover(ctx.layout)?;
        PathResolver::live(ctx.layout, &inventory).resolve(
            args.kind,
            &args.package_path,
            args.tag.as_deref(),
        )
    } else {
        debug!("No ROM directory; resolving by convention");
        PathResolver::conventional(ctx.layout).resolve(
            args.kind,
            &args.package_path,
            args.tag.as_deref(),
        )
    };
    out.resolution(&ResolveResult::new(
        args.kind,
        &args.package_path,
        owner,
        resolution,
    ));
    Ok(())
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "themer",
            version: build_info::VERSION,
            description: "Apply, export and recombine handheld theme packages",
            package_kinds: ComponentKind::ALL
                .iter()
                .map(|k| PackageKindHelp {
                    kind: k.label(),
                    extension: k.extension(),
                })
                .collect(),
            commands: RobotCommands {
                list_systems: "themer systems --robot",
                list_packages: "themer list [DIR] --robot",
                apply: "themer import <PACKAGE> [--only wallpaper,icon] [--dry-run]",
                export: "themer export <NAME> --kind <KIND> [--out DIR]",
                deconstruct: "themer deconstruct <THEME> [--out DIR]",
                verify: "themer verify <PACKAGE>",
                resolve: "themer resolve <KIND> <PACKAGE_PATH>",
            },
            output_modes: OutputModes {
                human: "--format=text (default)",
                robot: "--robot or --format=json",
                compact: "--format=json-compact",
            },
        };
        match serde_json::to_string_pretty(&help) {
            Ok(json) => println!("{json}"),
            Err(e) => return Err(ThemeError::Other(e.to_string())),
        }
    } else {
        print_human_quick_start();
    }
    Ok(())
}

fn print_human_quick_start() {
    println!(
        "{} {} - handheld theme packages\n",
        style("themer").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  Installed systems", style("themer systems").green());
    println!("  {}  Packages on the card", style("themer list").green());
    println!("  {}  Apply a theme", style("themer import Retro.theme").green());
    println!(
        "  {}  Only some components",
        style("themer import Retro.theme --only wallpaper,icon").green()
    );
    println!("  {}  Save the current look", style("themer export Mine").green());
    println!("  {}  Split into components", style("themer deconstruct Retro.theme").green());
    println!();

    println!("{}", style("PACKAGE KINDS").bold().underlined());
    println!();
    for kind in ComponentKind::ALL {
        println!("  .{:<6} {}", kind.extension(), kind.label());
    }
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("themer --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("themer --robot").cyan());
    println!();

    println!("Run {} for full help", style("themer --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    package_kinds: Vec<PackageKindHelp>,
    commands: RobotCommands,
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct PackageKindHelp {
    kind: &'static str,
    extension: &'static str,
}

#[derive(Serialize)]
struct RobotCommands {
    list_systems: &'static str,
    list_packages: &'static str,
    apply: &'static str,
    export: &'static str,
    deconstruct: &'static str,
    verify: &'static str,
    resolve: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Utilities ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(out: &dyn Output) -> Result<()> {
    out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "themer", &mut io::stdout());
    Ok(())
}
