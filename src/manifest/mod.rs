//! Package manifests: model, storage and regeneration.
//!
//! A manifest is treated as an immutable value. It is produced wholesale by
//! [`regenerate`] or [`build`] and replaced on disk with [`write`]; nothing
//! patches individual fields in place.

mod regenerate;
mod schema;
mod store;

pub use regenerate::{build, package_name, regenerate, summarize};
pub use schema::{
    AccentColors, ComponentInfo, Content, FlagContent, FontContent, IconContent, LedLight,
    LedSettings, Manifest, ManifestDocument, OverlayContent, PACKAGE_VERSION, PackageInfo,
    PathMapping, UNKNOWN_AUTHOR, WallpaperContent, WireMappings, exported_by,
};
pub use store::{manifest_path, read, write};

/// Manifest file name inside every package.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Optional preview image inside a package.
pub const PREVIEW_FILE: &str = "preview.png";
