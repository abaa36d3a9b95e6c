//! Error types for theme package operations.

use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Coarse error classes reported to the user.
///
/// Unresolved package paths are not errors at all: the resolver returns
/// `None` for them and callers skip the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing package, manifest, source file or device directory.
    NotFound,
    /// Malformed manifest, config or settings file.
    Parse,
    /// Permission, disk-full or copy failure part way through an operation.
    Io,
}

/// Primary error type for theme operations.
#[derive(Error, Debug)]
pub enum ThemeError {
    // Package errors
    #[error("Package not found: {path}")]
    PackageNotFound { path: String },

    #[error("Manifest not found in package: {path}")]
    ManifestNotFound { path: String },

    #[error("Malformed manifest {path}: {reason}")]
    ManifestParse { path: String, reason: String },

    #[error("Unrecognized package type: {path}")]
    UnknownPackageKind { path: String },

    #[error("Unknown component kind '{0}'")]
    InvalidKind(String),

    // Device errors
    #[error("ROM directory not found: {path}")]
    RomRootNotFound { path: String },

    #[error("Source file not found: {path}")]
    SourceNotFound { path: String },

    #[error("Failed to copy {from} -> {to}: {source}")]
    CopyFailed {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    // Leaf settings errors
    #[error("Settings file error: {0}")]
    Settings(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("{0}")]
    Other(String),
}

impl ThemeError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Wrap a failed copy, keeping both endpoints for the report.
    pub fn copy_failed(from: &Path, to: &Path, source: io::Error) -> Self {
        Self::CopyFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            source,
        }
    }

    pub fn package_not_found(path: &Path) -> Self {
        Self::PackageNotFound {
            path: path.display().to_string(),
        }
    }

    /// Classify the error for reporting.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PackageNotFound { .. }
            | Self::ManifestNotFound { .. }
            | Self::RomRootNotFound { .. }
            | Self::SourceNotFound { .. }
            | Self::ConfigNotFound { .. } => ErrorKind::NotFound,
            Self::ManifestParse { .. }
            | Self::UnknownPackageKind { .. }
            | Self::InvalidKind(_)
            | Self::Settings(_)
            | Self::ConfigParse(_) => ErrorKind::Parse,
            Self::CopyFailed { .. } | Self::Io { .. } | Self::Other(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PackageNotFound { .. }
                | Self::ManifestNotFound { .. }
                | Self::UnknownPackageKind { .. }
                | Self::InvalidKind(_)
                | Self::RomRootNotFound { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::PackageNotFound { .. } => Some("Run: themer list <DIR> to see available packages"),
            Self::ManifestNotFound { .. } => {
                Some("Run: themer manifest regenerate <PACKAGE> to rebuild it")
            }
            Self::UnknownPackageKind { .. } => {
                Some("Package directories end in .theme, .bg, .icon, .acc, .led, .font or .over")
            }
            Self::InvalidKind(_) => {
                Some("Use one of: theme, wallpaper, icon, accent, led, font, overlay")
            }
            Self::RomRootNotFound { .. } => Some("Check --device-root points at the SD card"),
            Self::ConfigNotFound { .. } => Some("Run: themer config --path"),
            Self::CopyFailed { .. } => {
                Some("Files copied before the failure remain on the device; re-run after fixing")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using ThemeError.
pub type Result<T> = std::result::Result<T, ThemeError>;

/// Extension trait for attaching a path to I/O failures.
pub trait IoResultExt<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| ThemeError::io(path, e))
    }
}
