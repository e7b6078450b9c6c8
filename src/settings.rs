//! Runtime game configuration.
//!
//! `GameSettings` carries every tunable the session reads: round length,
//! reward, lifecycle timings, spawn layout and pick volumes. Values default to
//! the arcade tuning and may be loaded from a JSON file where any key can be
//! omitted.

use std::fs;
use std::path::Path;

use bevy::prelude::Resource;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ANIMATION_MS, DYING_MS, HIT_CENTRE_HEIGHT, HIT_RADIUS, HIT_REWARD, RESPAWN_DELAY_MS,
    ROUND_MS, SPAWN_DELAY_MAX_MS, SPAWN_DELAY_MIN_MS, SPAWN_LAYOUT,
};

/// Animation units in one idle bob loop.
const IDLE_LOOP_UNITS: u64 = 3;

/// Errors raised while loading or validating [`GameSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file was not valid JSON for [`GameSettings`].
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the game cannot run with.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Half-open range `[min_ms, max_ms)` for the initial spawn delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDelay {
    /// Inclusive lower bound in milliseconds.
    pub min_ms: u64,
    /// Exclusive upper bound in milliseconds. Equal bounds mean a fixed delay.
    pub max_ms: u64,
}

impl SpawnDelay {
    /// A delay that is the same for every robot.
    #[must_use]
    pub const fn fixed(ms: u64) -> Self {
        Self {
            min_ms: ms,
            max_ms: ms,
        }
    }

    /// Returns `true` when every robot receives the same delay.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.min_ms >= self.max_ms
    }
}

impl Default for SpawnDelay {
    fn default() -> Self {
        Self {
            min_ms: SPAWN_DELAY_MIN_MS,
            max_ms: SPAWN_DELAY_MAX_MS,
        }
    }
}

/// Tunables for a game session.
///
/// # Examples
///
/// ```
/// use whackabot::settings::GameSettings;
///
/// let settings = GameSettings::from_json(r#"{ "round_ms": 10000, "reward": 1 }"#)
///     .expect("valid settings");
/// assert_eq!(settings.round_ms, 10_000);
/// assert_eq!(settings.dying_ms, 1_500);
/// ```
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    /// Round length in milliseconds.
    pub round_ms: u64,
    /// Points per honoured hit.
    pub reward: u32,
    /// Base animation unit; the idle loop spans three units.
    pub animation_ms: u64,
    /// Time from a hit until the robot is removed from the scene.
    pub dying_ms: u64,
    /// Time from removal until the robot reappears.
    pub respawn_delay_ms: u64,
    /// Range of the randomised delay before each robot first appears.
    pub spawn_delay_ms: SpawnDelay,
    /// Home positions, one robot per entry.
    pub layout: Vec<[f32; 3]>,
    /// Radius of each robot's pick sphere.
    pub hit_radius: f32,
    /// Height of the pick sphere centre above the robot origin.
    pub hit_height: f32,
    /// Seed for spawn jitter. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_ms: ROUND_MS,
            reward: HIT_REWARD,
            animation_ms: ANIMATION_MS,
            dying_ms: DYING_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            spawn_delay_ms: SpawnDelay::default(),
            layout: SPAWN_LAYOUT.to_vec(),
            hit_radius: HIT_RADIUS,
            hit_height: HIT_CENTRE_HEIGHT,
            seed: None,
        }
    }
}

impl GameSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::Invalid`] when validation fails.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read, otherwise
    /// the errors of [`GameSettings::from_json`].
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks that the settings describe a playable game.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });
        if self.round_ms == 0 {
            return invalid("round_ms", "must be greater than zero");
        }
        if self.reward == 0 {
            return invalid("reward", "must be greater than zero");
        }
        if self.animation_ms == 0 {
            return invalid("animation_ms", "must be greater than zero");
        }
        if self.animation_ms.checked_mul(IDLE_LOOP_UNITS).is_none() {
            return invalid("animation_ms", "idle loop length overflows");
        }
        if self.dying_ms == 0 {
            return invalid("dying_ms", "must be greater than zero");
        }
        if self.spawn_delay_ms.min_ms > self.spawn_delay_ms.max_ms {
            return invalid("spawn_delay_ms", "min_ms must not exceed max_ms");
        }
        if self.layout.is_empty() {
            return invalid("layout", "must contain at least one position");
        }
        if self.layout.iter().flatten().any(|c| !c.is_finite()) {
            return invalid("layout", "positions must be finite");
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return invalid("hit_radius", "must be a positive finite number");
        }
        if !self.hit_height.is_finite() {
            return invalid("hit_height", "must be finite");
        }
        Ok(())
    }

    /// Home positions as vectors.
    pub fn home_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.layout.iter().copied().map(Vec3::from_array)
    }

    /// Length of one idle bob loop.
    #[must_use]
    pub const fn idle_period_ms(&self) -> u64 {
        self.animation_ms.saturating_mul(IDLE_LOOP_UNITS)
    }
}
