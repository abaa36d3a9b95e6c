//! LED settings stored as `[Light Name]` sections of `key=value` lines.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use super::{LedStore, split_key_value};
use crate::error::{IoResultExt, Result, ThemeError};
use crate::fsutil::write_atomic;
use crate::manifest::{LedLight, LedSettings};

/// One `[name]` block and its raw body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    lines: Vec<String>,
}

/// LED store over the device's LED settings file.
///
/// Writing replaces the sections named in the new settings and keeps any
/// other section untouched.
#[derive(Debug, Clone)]
pub struct FileLedStore {
    path: PathBuf,
}

impl FileLedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_sections(&self) -> Result<Option<Vec<Section>>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).at_path(&self.path)?;
        Ok(Some(parse_sections(&raw)))
    }
}

impl LedStore for FileLedStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn read_leds(&self) -> Result<Option<LedSettings>> {
        let Some(sections) = self.read_sections()? else {
            return Ok(None);
        };
        let mut settings = LedSettings::new();
        for section in sections {
            let light = parse_light(&section).map_err(|reason| {
                ThemeError::Settings(format!("{}: [{}] {reason}", self.path.display(), section.name))
            })?;
            settings.insert(section.name, light);
        }
        debug!(lights = settings.len(), "Read LED settings");
        Ok(Some(settings))
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn write_leds(&self, settings: &LedSettings) -> Result<()> {
        let mut sections = self.read_sections()?.unwrap_or_default();
        for (name, light) in settings {
            let lines = render_light(light);
            match sections.iter_mut().find(|s| &s.name == name) {
                Some(section) => section.lines = lines,
                None => sections.push(Section {
                    name: name.clone(),
                    lines,
                }),
            }
        }

        let body = sections
            .iter()
            .map(|s| format!("[{}]\n{}\n", s.name, s.lines.join("\n")))
            .collect::<Vec<_>>()
            .join("\n");
        write_atomic(&self.path, body.as_bytes())?;
        debug!(lights = settings.len(), "Wrote LED settings");
        Ok(())
    }
}

fn parse_sections(raw: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            sections.push(Section {
                name: name.trim().to_string(),
                lines: Vec::new(),
            });
        } else if trimmed.is_empty() {
            continue;
        } else if let Some(section) = sections.last_mut() {
            section.lines.push(trimmed.to_string());
        } else {
            trace!(line = trimmed, "Ignoring line outside any section");
        }
    }
    sections
}

fn parse_light(section: &Section) -> std::result::Result<LedLight, String> {
    let mut light = LedLight::default();
    for line in &section.lines {
        let Some((key, value)) = split_key_value(line) else {
            continue;
        };
        let number = || {
            value
                .parse::<u32>()
                .map_err(|_| format!("invalid number for {key}: '{value}'"))
        };
        match key {
            "effect" => light.effect = number()?,
            "color1" => light.color1 = value.to_string(),
            "color2" => light.color2 = value.to_string(),
            "speed" => light.speed = number()?,
            "brightness" => light.brightness = number()?,
            "trigger" => light.trigger = number()?,
            "inbrightness" => light.in_brightness = number()?,
            _ => trace!(key, "Ignoring unknown LED key"),
        }
    }
    Ok(light)
}

fn render_light(light: &LedLight) -> Vec<String> {
    vec![
        format!("effect={}", light.effect),
        format!("color1={}", light.color1),
        format!("color2={}", light.color2),
        format!("speed={}", light.speed),
        format!("brightness={}", light.brightness),
        format!("trigger={}", light.trigger),
        format!("inbrightness={}", light.in_brightness),
    ]
}
