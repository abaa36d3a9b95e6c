//! Accent colors stored as `key=value` lines in the shared settings file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{AccentStore, split_key_value};
use crate::error::{IoResultExt, Result};
use crate::fsutil::write_atomic;
use crate::manifest::AccentColors;

/// Accent store over the device's settings text file.
///
/// Only `color1`..`color6` are touched; every other line is preserved in
/// place.
#[derive(Debug, Clone)]
pub struct FileAccentStore {
    path: PathBuf,
}

impl FileAccentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).at_path(&self.path)?;
        Ok(raw.lines().map(str::to_string).collect())
    }
}

impl AccentStore for FileAccentStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn read_accents(&self) -> Result<Option<AccentColors>> {
        let mut colors = AccentColors::default();
        let mut found = 0;
        for line in self.read_lines()? {
            if let Some((key, value)) = split_key_value(&line) {
                if colors.set(key, value) {
                    found += 1;
                }
            }
        }
        debug!(found, "Read accent colors");
        Ok((found > 0).then_some(colors))
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write_accents(&self, colors: &AccentColors) -> Result<()> {
        let mut lines = self.read_lines()?;
        let mut written = [false; AccentColors::KEYS.len()];

        for line in &mut lines {
            let Some((key, _)) = split_key_value(line) else {
                continue;
            };
            if let Some(idx) = AccentColors::KEYS.iter().position(|k| *k == key) {
                let value = colors.get(key).unwrap_or_default();
                *line = format!("{key}={value}");
                written[idx] = true;
            }
        }
        for (idx, key) in AccentColors::KEYS.iter().enumerate() {
            if !written[idx] {
                lines.push(format!("{key}={}", colors.get(key).unwrap_or_default()));
            }
        }

        let mut body = lines.join("\n");
        body.push('\n');
        write_atomic(&self.path, body.as_bytes())?;
        debug!("Wrote accent colors");
        Ok(())
    }
}
