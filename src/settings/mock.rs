//! In-memory settings store for tests.
//!
//! Records every write so tests can assert what the engine applied.
//!
//! ```rust,ignore
//! use themer::settings::mock::{MemorySettings, SettingsWrite};
//!
//! let settings = MemorySettings::new();
//! // ... run an import with `&settings` as both stores ...
//! assert_eq!(settings.writes().len(), 1);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::{AccentStore, LedStore};
use crate::error::Result;
use crate::manifest::{AccentColors, LedSettings};

/// Recorded write for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsWrite {
    Accents(AccentColors),
    Leds(LedSettings),
}

/// Accent and LED store held in memory.
#[derive(Debug, Default)]
pub struct MemorySettings {
    accents: Mutex<Option<AccentColors>>,
    leds: Mutex<Option<LedSettings>>,
    writes: Mutex<Vec<SettingsWrite>>,
}

impl MemorySettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_accents(self, colors: AccentColors) -> Self {
        *lock(&self.accents) = Some(colors);
        self
    }

    #[must_use]
    pub fn with_leds(self, settings: LedSettings) -> Self {
        *lock(&self.leds) = Some(settings);
        self
    }

    pub fn accents(&self) -> Option<AccentColors> {
        lock(&self.accents).clone()
    }

    pub fn leds(&self) -> Option<LedSettings> {
        lock(&self.leds).clone()
    }

    /// Every write in call order.
    pub fn writes(&self) -> Vec<SettingsWrite> {
        lock(&self.writes).clone()
    }
}

impl AccentStore for MemorySettings {
    fn read_accents(&self) -> Result<Option<AccentColors>> {
        Ok(self.accents())
    }

    fn write_accents(&self, colors: &AccentColors) -> Result<()> {
        trace!("Mock accent write");
        *lock(&self.accents) = Some(colors.clone());
        lock(&self.writes).push(SettingsWrite::Accents(colors.clone()));
        Ok(())
    }
}

impl LedStore for MemorySettings {
    fn read_leds(&self) -> Result<Option<LedSettings>> {
        Ok(self.leds())
    }

    fn write_leds(&self, settings: &LedSettings) -> Result<()> {
        trace!(lights = settings.len(), "Mock LED write");
        *lock(&self.leds) = Some(settings.clone());
        lock(&self.writes).push(SettingsWrite::Leds(settings.clone()));
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
