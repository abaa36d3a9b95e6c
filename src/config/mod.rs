//! Configuration: tool settings and the device layout derived from them.
//!
//! The device root is always an explicit value threaded into every engine
//! operation; nothing reads paths relative to the working directory.

pub mod layout;
mod path;
mod settings;

pub use layout::{DeviceLayout, FontSlot};
pub use path::{
    file_stem, home_dir, join_package_relative, resolve_path, segments, to_package_relative,
};
pub use settings::{ConfigOverrides, FileConfig, ThemerConfig, default_config_path};
