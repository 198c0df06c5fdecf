//! Process-wide emulator settings.
//!
//! This crate holds the configuration shared by the emulated input services:
//! - The vibration-enabled flag, toggled by the guest through `PermitVibration`
//! - The device-reload-pending flag, raised whenever host input bindings change
//! - Per-player controller configuration and per-device enable switches ([`Values`])
//!
//! A [`Settings`] object is created once and injected into every consumer. The two flags
//! are atomics so they can be raised from any thread (e.g. a hot-plug handler) without
//! taking the values lock.

use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::{RwLock, RwLockReadGuard};

mod values;

pub use self::values::{
    ControllerType, HANDHELD_INDEX, JOYCON_BODY_NEON_BLUE, JOYCON_BODY_NEON_RED,
    JOYCON_BUTTONS_NEON_BLUE, JOYCON_BUTTONS_NEON_RED, NUM_PLAYERS, PlayerInput, Players,
    TooManyPlayersError, TouchscreenConfig, Values,
};

/// Process-wide settings object.
pub struct Settings {
    vibration_enabled: AtomicBool,
    is_device_reload_pending: AtomicBool,
    values: RwLock<Values>,
}

impl Settings {
    /// Creates a settings object from the given values.
    ///
    /// The vibration flag starts at [`Values::vibration_enabled`]; no reload is pending.
    pub fn new(values: Values) -> Self {
        Self {
            vibration_enabled: AtomicBool::new(values.vibration_enabled),
            is_device_reload_pending: AtomicBool::new(false),
            values: RwLock::new(values),
        }
    }

    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs_err::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let values = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "loaded input settings");
        Ok(Self::new(values))
    }

    /// Parses configuration values from TOML text.
    pub fn parse(text: &str) -> Result<Values, LoadError> {
        toml::from_str(text).map_err(LoadError::Parse)
    }

    /// Returns a read guard over the current configuration values.
    #[inline]
    pub fn values(&self) -> RwLockReadGuard<'_, Values> {
        self.values.read()
    }

    /// Mutates the configuration values in place.
    ///
    /// Consumers only observe the change after [`Settings::reload_input_devices`].
    pub fn update(&self, f: impl FnOnce(&mut Values)) {
        f(&mut *self.values.write());
    }

    /// Returns the process-wide vibration flag.
    #[inline]
    pub fn vibration_enabled(&self) -> bool {
        self.vibration_enabled.load(Ordering::Acquire)
    }

    /// Sets the process-wide vibration flag.
    #[inline]
    pub fn set_vibration_enabled(&self, enabled: bool) {
        self.vibration_enabled.store(enabled, Ordering::Release);
    }

    /// Requests that every input consumer reload its bindings on its next update.
    pub fn reload_input_devices(&self) {
        self.is_device_reload_pending.store(true, Ordering::Release);
    }

    /// Returns `true` if a reload has been requested and not yet consumed.
    #[inline]
    pub fn is_device_reload_pending(&self) -> bool {
        self.is_device_reload_pending.load(Ordering::Acquire)
    }

    /// Consumes a pending reload request.
    ///
    /// Returns `true` exactly once per [`Settings::reload_input_devices`] call sequence.
    #[inline]
    pub fn take_device_reload_pending(&self) -> bool {
        self.is_device_reload_pending.swap(false, Ordering::AcqRel)
    }

    /// Restores default values and clears any pending reload.
    pub fn reset(&self) {
        let values = Values::default();
        self.vibration_enabled
            .store(values.vibration_enabled, Ordering::Release);
        self.is_device_reload_pending.store(false, Ordering::Release);
        *self.values.write() = values;
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Values::default())
    }
}

/// Error returned by [`Settings::load`] and [`Settings::parse`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The settings file could not be read
    #[error("failed to read settings file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or has invalid values
    #[error("invalid settings")]
    Parse(#[source] toml::de::Error),
}
