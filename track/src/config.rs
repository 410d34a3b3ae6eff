//! Track generation settings (track.toml)
//!
//! All fields are optional in the file; missing ones fall back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::section::ContentRate;

/// Length budget, content rate and closing margins for one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Total track length budget (default: 100.0, must be > 0)
    #[serde(default = "default_max_length")]
    pub max_length: f32,
    /// Chance of a coin on each block of an interior section (default: 0.5)
    #[serde(default = "default_coin_rate")]
    pub coin_rate: f32,
    /// Sections placed by `pre_spawn_default` (default: 2)
    #[serde(default = "default_pre_spawn_count")]
    pub pre_spawn_count: usize,
    /// Remaining budget at which stepwise generation closes the track (default: 10.0)
    #[serde(default = "default_lookahead_margin")]
    pub lookahead_margin: f32,
    /// Remaining budget at which bulk generation closes the track (default: 20.0)
    #[serde(default = "default_closing_margin")]
    pub closing_margin: f32,
    /// Seed for the section picker; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_length() -> f32 {
    100.0
}
fn default_coin_rate() -> f32 {
    0.5
}
fn default_pre_spawn_count() -> usize {
    2
}
fn default_lookahead_margin() -> f32 {
    10.0
}
fn default_closing_margin() -> f32 {
    20.0
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            coin_rate: default_coin_rate(),
            pre_spawn_count: default_pre_spawn_count(),
            lookahead_margin: default_lookahead_margin(),
            closing_margin: default_closing_margin(),
            seed: None,
        }
    }
}

impl TrackConfig {
    /// Default settings with a different length budget
    pub fn with_max_length(max_length: f32) -> Self {
        Self {
            max_length,
            ..Self::default()
        }
    }

    /// Parse from TOML text. The result is not validated.
    pub fn from_toml_str(source: &str) -> Result<Self, TrackError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file. The result is not validated.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let source = std::fs::read_to_string(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the values that do not depend on a catalog.
    pub fn validate(&self) -> Result<(), TrackError> {
        if !(self.max_length.is_finite() && self.max_length > 0.0) {
            return Err(TrackError::InvalidMaxLength(self.max_length));
        }
        check_margin("lookahead_margin", self.lookahead_margin)?;
        check_margin("closing_margin", self.closing_margin)?;
        self.coin_rate()?;
        Ok(())
    }

    pub fn coin_rate(&self) -> Result<ContentRate, TrackError> {
        ContentRate::new(self.coin_rate)
    }
}

fn check_margin(name: &'static str, value: f32) -> Result<(), TrackError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TrackError::InvalidMargin { name, value })
    }
}
