//! Layered tool configuration.
//!
//! Precedence, lowest first: built-in defaults, the TOML config file,
//! environment variables and command-line flags (the latter two arrive
//! together through clap as [`ConfigOverrides`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::layout::{DEFAULT_DEVICE_ROOT, DEFAULT_PLATFORM, DeviceLayout};
use super::path::resolve_path;
use crate::error::{IoResultExt, Result, ThemeError};

const CONFIG_DIR_NAME: &str = "themer";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PACKAGES_DIR: &str = "Themes";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub device_root: Option<PathBuf>,
    pub platform: Option<String>,
    pub packages_dir: Option<PathBuf>,
    pub author: Option<String>,
    pub accent_file: Option<PathBuf>,
    pub led_file: Option<PathBuf>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub device_root: Option<PathBuf>,
    pub platform: Option<String>,
    pub packages_dir: Option<PathBuf>,
    pub author: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ThemerConfig {
    pub device_root: PathBuf,
    pub platform: String,
    pub packages_dir: PathBuf,
    pub author: Option<String>,
    pub accent_file: Option<PathBuf>,
    pub led_file: Option<PathBuf>,
    /// Config file that was loaded, if any.
    pub source: Option<PathBuf>,
}

impl Default for ThemerConfig {
    fn default() -> Self {
        let device_root = PathBuf::from(DEFAULT_DEVICE_ROOT);
        Self {
            packages_dir: device_root.join(DEFAULT_PACKAGES_DIR),
            device_root,
            platform: DEFAULT_PLATFORM.to_string(),
            author: None,
            accent_file: None,
            led_file: None,
            source: None,
        }
    }
}

impl ThemerConfig {
    /// Load configuration from `explicit` (which must exist) or the default
    /// location (which may be absent), then apply overrides.
    #[instrument(skip(overrides))]
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let (file, source) = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ThemeError::ConfigNotFound {
                        path: path.display().to_string(),
                    });
                }
                (read_file_config(path)?, Some(path.to_path_buf()))
            }
            None => match default_config_path() {
                Some(path) if path.is_file() => {
                    (read_file_config(&path)?, Some(path))
                }
                _ => {
                    debug!("No config file found, using defaults");
                    (FileConfig::default(), None)
                }
            },
        };

        let working_dir = std::env::current_dir().at_path(".")?;
        let base_dir = source
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| working_dir.clone(), |dir| working_dir.join(dir));

        Self::merge(file, overrides, &base_dir, &working_dir, source)
    }

    /// Combine a parsed file with overrides.
    ///
    /// Relative file paths resolve against `base_dir` (the config file's
    /// directory); relative override paths against `working_dir`. Both must be
    /// absolute so every derived device path is absolute.
    pub fn merge(
        file: FileConfig,
        overrides: &ConfigOverrides,
        base_dir: &Path,
        working_dir: &Path,
        source: Option<PathBuf>,
    ) -> Result<Self> {
        let device_root = match (&overrides.device_root, file.device_root) {
            (Some(root), _) => resolve_path(root, working_dir)?,
            (None, Some(root)) => resolve_path(&root, base_dir)?,
            (None, None) => PathBuf::from(DEFAULT_DEVICE_ROOT),
        };

        let packages_dir = match (&overrides.packages_dir, file.packages_dir) {
            (Some(dir), _) => resolve_path(dir, working_dir)?,
            (None, Some(dir)) => resolve_path(&dir, base_dir)?,
            (None, None) => device_root.join(DEFAULT_PACKAGES_DIR),
        };

        let accent_file = file
            .accent_file
            .map(|p| resolve_path(&p, base_dir))
            .transpose()?;
        let led_file = file.led_file.map(|p| resolve_path(&p, base_dir)).transpose()?;

        let config = Self {
            device_root,
            platform: overrides
                .platform
                .clone()
                .or(file.platform)
                .unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
            packages_dir,
            author: overrides.author.clone().or(file.author),
            accent_file,
            led_file,
            source,
        };
        debug!(
            device_root = %config.device_root.display(),
            platform = %config.platform,
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Device layout described by this configuration.
    pub fn layout(&self) -> DeviceLayout {
        let mut layout = DeviceLayout::new(&self.device_root, &self.platform);
        if let Some(path) = &self.accent_file {
            layout = layout.with_accent_file(path.clone());
        }
        if let Some(path) = &self.led_file {
            layout = layout.with_led_file(path.clone());
        }
        layout
    }
}

/// Default config file location (`~/.config/themer/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    debug!(path = %path.display(), "Reading config file");
    let text = std::fs::read_to_string(path).at_path(path)?;
    toml::from_str(&text)
        .map_err(|e| ThemeError::ConfigParse(format!("{}: {e}", path.display())))
}
