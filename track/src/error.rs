//! Track configuration error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading catalogs or building a generator.
///
/// Every variant is a configuration problem detected before the first
/// placement. Stepping a generator never fails.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("max_length must be positive and finite, got {0}")]
    InvalidMaxLength(f32),

    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidMargin { name: &'static str, value: f32 },

    #[error("{name} ({margin}) is shorter than interior section '{id}' ({length})")]
    MarginTooSmall {
        name: &'static str,
        margin: f32,
        id: String,
        length: f32,
    },

    #[error("start section '{id}' ({length}) does not fit in max_length {max_length}")]
    StartExceedsBudget {
        id: String,
        length: f32,
        max_length: f32,
    },

    #[error("content rate must be within [0, 1], got {0}")]
    InvalidContentRate(f32),

    #[error("section catalog has no interior sections")]
    EmptyPool,

    #[error("section '{id}' has invalid length {length}")]
    InvalidSectionLength { id: String, length: f32 },

    #[error("section '{id}' has invalid weight {weight}")]
    InvalidSectionWeight { id: String, weight: f32 },

    #[error("section '{0}' must have at least one block")]
    InvalidBlockCount(String),

    #[error("section '{0}' has a non-finite exit transform")]
    InvalidExit(String),

    #[error("duplicate section id '{0}'")]
    DuplicateSection(String),

    #[error("unknown section id '{0}'")]
    UnknownSection(String),

    #[error("invalid interior weights: {0}")]
    InvalidWeights(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
