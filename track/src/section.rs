//! Section collaborator contract
//!
//! The generator never renders anything itself. Hosts plug in a
//! [`SectionFactory`] that creates their own realization of a placed section
//! (a mesh, a scene node, or the reference [`RoadSection`](crate::RoadSection)).

use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::catalog::SectionDescriptor;
use crate::error::TrackError;
use crate::math::Transform;

/// Probability in `[0, 1]` that content spawns on each sub-unit of a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct ContentRate(f32);

impl ContentRate {
    /// No content (start and end sections)
    pub const ZERO: Self = Self(0.0);
    /// Content on every sub-unit
    pub const ONE: Self = Self(1.0);

    pub fn new(rate: f32) -> Result<Self, TrackError> {
        if (0.0..=1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(TrackError::InvalidContentRate(rate))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for ContentRate {
    type Error = TrackError;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

/// A placed, host-side realization of a section descriptor.
///
/// Implementations must report the exit frame and length of the descriptor
/// they were given; the generator chains sections with these values.
pub trait Section {
    /// Bind (or rebind) the descriptor this section realizes
    fn set_data(&mut self, descriptor: &Arc<SectionDescriptor>);

    /// Place the section's entry frame in track-local space
    fn place_at(&mut self, position: Vec3, rotation: Quat);

    /// Spawn collectibles, one random draw per sub-unit
    fn realize_content<R: Rng>(&mut self, rate: ContentRate, rng: &mut R);

    /// Truncate the section so it ends `remaining` units from its entry.
    ///
    /// Only called on the closing section of a track.
    fn trim_to_closing(&mut self, remaining: f32);

    /// Exit frame relative to the section's entry frame
    fn exit_offset(&self) -> Transform;

    /// Geometric length (always > 0)
    fn length(&self) -> f32;

    /// Release host resources. Called for every section on reset.
    fn dispose(self)
    where
        Self: Sized;
}

/// Creates [`Section`]s for the generator.
pub trait SectionFactory {
    type Section: Section;

    /// Create a section for `descriptor`. Must succeed for any validated descriptor.
    fn create(&mut self, descriptor: &Arc<SectionDescriptor>) -> Self::Section;
}
