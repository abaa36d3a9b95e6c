//! Handheld Themer library - theme packages for handheld SD card layouts.
//!
//! This library exposes the core functionality of the `themer` CLI for use in
//! tests and other front ends.
//!
//! # Modules
//!
//! - `kind`: Package kinds and their extensions
//! - `inventory`: Discovery of installed systems on the SD card
//! - `resolver`: Mapping between package paths and device paths
//! - `manifest`: Package manifest schema, storage and regeneration
//! - `engine`: Import, export, deconstruct and verify operations
//! - `settings`: Accent color and LED settings stores
//! - `catalog`: Listing packages in a directory
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
//! - `config`: Configuration file handling and the device layout
#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsutil;
pub mod inventory;
pub mod kind;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod resolver;
pub mod settings;
