//! RunRun track generation
//!
//! Assembles an endless-runner track from discrete sections. Each section
//! attaches at the exit frame of the previous one, the total length is bounded
//! by a budget, and collectibles are scattered along each section at a
//! configurable rate.
//!
//! # Architecture
//!
//! - [`SectionDescriptor`] / [`SectionCatalog`] - Immutable section variants and the interior pool
//! - [`Section`] / [`SectionFactory`] - Contract for the host-side realization of a placed section
//! - [`TrackGenerator`] - Owns the section chain, the transform cursor and the length budget
//! - [`RoadSection`] - Reference section implementation with per-block coin placement
//!
//! # Example
//! ```no_run
//! use runrun_track::{RoadSectionFactory, SectionCatalog, TrackConfig, TrackGenerator};
//!
//! let catalog = SectionCatalog::load("sections.toml".as_ref())?;
//! let config = TrackConfig::load("track.toml".as_ref())?;
//! let mut track = TrackGenerator::seeded(catalog, config, RoadSectionFactory)?;
//!
//! // Fill a small buffer, then step once per tick as the runner advances
//! track.pre_spawn_default();
//! while track.spawn_next() {}
//! # Ok::<(), runrun_track::TrackError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod math;
pub mod road;
pub mod section;
#[cfg(test)]
pub(crate) mod test_utils;

pub use catalog::{SectionCatalog, SectionDef, SectionDescriptor};
pub use config::TrackConfig;
pub use error::TrackError;
pub use generator::{PlacedSection, SectionInstance, TrackGenerator, TrackLayout, TrackPhase};
pub use math::Transform;
pub use road::{Coin, RoadSection, RoadSectionFactory};
pub use section::{ContentRate, Section, SectionFactory};
