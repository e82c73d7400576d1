//! Runtime configuration for focus detection and the distraction reminder.
//!
//! Values are accepted as supplied and only clamped where they are used, so
//! a malformed configuration degrades to the nearest sensible value rather
//! than failing the behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

/// Default reach of the gaze ray in world units.
pub const DEFAULT_FOCUS_CHECK_DISTANCE: f32 = 10.0;
/// Default unfocused time, in seconds, before the reminder appears.
pub const DEFAULT_DISTRACTION_DELAY: f32 = 3.0;
/// Default length, in seconds, of each fade.
pub const DEFAULT_FADE_DURATION: f32 = 1.0;
/// Default fog alpha reached when fully distracted.
pub const DEFAULT_FOG_MAX_ALPHA: f32 = 0.8;

/// Errors raised while loading [`FocusSettings`] from disk.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings document was not valid JSON for [`FocusSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the focus tracker.
///
/// # Examples
///
/// ```
/// use focus_tracker::settings::FocusSettings;
///
/// let settings = FocusSettings::from_json_str(r#"{ "fade_duration": 0.5 }"#)
///     .unwrap_or_default();
/// assert!((settings.fade_duration() - 0.5).abs() < f32::EPSILON);
/// assert!((settings.distraction_delay() - 3.0).abs() < f32::EPSILON);
/// ```
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FocusSettings {
    /// Maximum distance at which the target still counts as looked at.
    pub focus_check_distance: f32,
    /// Seconds of continuous distraction before the reminder fades in.
    pub distraction_delay: f32,
    /// Seconds taken by each fade in either direction.
    pub fade_duration: f32,
    /// Fog alpha matching a fully opaque overlay.
    pub fog_max_alpha: f32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            focus_check_distance: DEFAULT_FOCUS_CHECK_DISTANCE,
            distraction_delay: DEFAULT_DISTRACTION_DELAY,
            fade_duration: DEFAULT_FADE_DURATION,
            fog_max_alpha: DEFAULT_FOG_MAX_ALPHA,
        }
    }
}

impl FocusSettings {
    /// Parses settings from a JSON document. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] when the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    ///
    /// # Errors
    /// Returns [`SettingsError::Read`] if the file cannot be read and
    /// [`SettingsError::Parse`] if its contents are malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Gaze ray reach, never negative.
    #[must_use]
    pub fn focus_check_distance(&self) -> f32 {
        non_negative(self.focus_check_distance)
    }

    /// Distraction delay in seconds, never negative.
    #[must_use]
    pub fn distraction_delay(&self) -> f32 {
        non_negative(self.distraction_delay)
    }

    /// Fade duration in seconds, never negative.
    #[must_use]
    pub fn fade_duration(&self) -> f32 {
        non_negative(self.fade_duration)
    }

    /// Fog ceiling clamped to `[0, 1]`.
    #[must_use]
    pub fn fog_max_alpha(&self) -> f32 {
        unit_interval(self.fog_max_alpha)
    }
}

/// Clamps to `>= 0`, mapping NaN to zero.
pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Clamps to `[0, 1]`, mapping NaN to zero.
pub(crate) fn unit_interval(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
