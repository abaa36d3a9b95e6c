//! Structured logging initialization for the themer CLI.
//!
//! Logs always go to stderr so stdout stays clean for package listings and
//! robot-mode JSON.

use std::io::{self, IsTerminal};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// JSON lines, one event per line.
    Json,
    /// Colored multi-field output for an interactive terminal.
    Pretty,
    /// Plain single-line output for pipes and files.
    Compact,
}

impl LogStyle {
    pub const fn select(robot_mode: bool, stderr_is_tty: bool) -> Self {
        if robot_mode {
            Self::Json
        } else if stderr_is_tty {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
///
/// `quiet` wins over any verbosity count.
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "themer=error";
    }
    match verbose {
        0 => "themer=info",
        1 => "themer=debug",
        _ => "themer=trace",
    }
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// # Arguments
///
/// * `robot_mode` - If true, output structured JSON logs for machine consumption
/// * `verbose` - Verbosity level: 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - If true, only errors are logged
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override default filter (e.g., "themer::engine=trace")
///
/// # Output Behavior
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Pretty colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let registry = tracing_subscriber::registry().with(filter);
    let base = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr);

    // try_init: tests and embedders may already have a global subscriber.
    let _ = match LogStyle::select(robot_mode, io::stderr().is_terminal()) {
        LogStyle::Json => registry.with(base.json().with_target(true)).try_init(),
        LogStyle::Pretty => registry.with(base.with_target(false)).try_init(),
        LogStyle::Compact => registry
            .with(base.with_ansi(false).with_target(false).compact())
            .try_init(),
    };
}
