//! Leaf settings collaborators for accent colors and LEDs.
//!
//! Accent and LED packages carry no files; their values live in the manifest
//! and are applied through these stores. The engines only see the traits.

mod accent;
mod led;
pub mod mock;

pub use accent::FileAccentStore;
pub use led::FileLedStore;

use crate::config::DeviceLayout;
use crate::error::Result;
use crate::manifest::{AccentColors, LedSettings};

/// Reads and writes the device's accent colors.
pub trait AccentStore {
    /// Current colors, or `None` when the device has no accent settings yet.
    fn read_accents(&self) -> Result<Option<AccentColors>>;

    fn write_accents(&self, colors: &AccentColors) -> Result<()>;
}

/// Reads and writes the device's LED configuration.
pub trait LedStore {
    /// Current settings, or `None` when the device has no LED settings yet.
    fn read_leds(&self) -> Result<Option<LedSettings>>;

    fn write_leds(&self, settings: &LedSettings) -> Result<()>;
}

/// File-backed stores at the layout's settings locations.
pub fn file_stores(layout: &DeviceLayout) -> (FileAccentStore, FileLedStore) {
    (
        FileAccentStore::new(layout.accent_settings_file()),
        FileLedStore::new(layout.led_settings_file()),
    )
}

/// Split a `key=value` line, trimming both sides. Comments and blanks yield `None`.
pub(crate) fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), value.trim()))
}
