//! Reference road section
//!
//! A renderer-free [`Section`] for hosts that only need the layout and the
//! coin positions. Each section is split into `blocks` equal sub-units and a
//! coin is rolled for the centre of every block.

use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::catalog::SectionDescriptor;
use crate::math::Transform;
use crate::section::{ContentRate, Section, SectionFactory};

/// A collectible placed on a road section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coin {
    /// Block index the coin sits on
    pub block: u32,
    /// Distance from the section entry along its length
    pub distance: f32,
    /// Position in the section's local frame
    pub local_position: Vec3,
}

#[derive(Debug, Clone)]
pub struct RoadSection {
    descriptor: Arc<SectionDescriptor>,
    entry: Transform,
    coins: Vec<Coin>,
    visible_length: f32,
}

impl RoadSection {
    pub fn new(descriptor: &Arc<SectionDescriptor>) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            entry: Transform::IDENTITY,
            coins: Vec::new(),
            visible_length: descriptor.length(),
        }
    }

    pub fn descriptor(&self) -> &Arc<SectionDescriptor> {
        &self.descriptor
    }

    /// Entry frame set by `place_at`
    pub fn entry(&self) -> Transform {
        self.entry
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Coin positions in track-local space
    pub fn coin_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.coins
            .iter()
            .map(|coin| self.entry.transform_point(coin.local_position))
    }

    /// Length left after a closing trim (the full length otherwise)
    pub fn visible_length(&self) -> f32 {
        self.visible_length
    }

    pub fn is_trimmed(&self) -> bool {
        self.visible_length < self.descriptor.length()
    }
}

impl Section for RoadSection {
    fn set_data(&mut self, descriptor: &Arc<SectionDescriptor>) {
        self.descriptor = Arc::clone(descriptor);
        self.visible_length = descriptor.length();
        self.coins.clear();
    }

    fn place_at(&mut self, position: Vec3, rotation: Quat) {
        self.entry = Transform::new(position, rotation);
    }

    fn realize_content<R: Rng>(&mut self, rate: ContentRate, rng: &mut R) {
        self.coins.clear();
        if rate == ContentRate::ZERO {
            return;
        }

        let blocks = self.descriptor.blocks();
        let exit = self.descriptor.exit().position;
        let length = self.descriptor.length();
        for block in 0..blocks {
            if rng.random_bool(f64::from(rate.get())) {
                // Block centre, interpolated along the entry-to-exit chord
                let t = (block as f32 + 0.5) / blocks as f32;
                self.coins.push(Coin {
                    block,
                    distance: t * length,
                    local_position: exit * t,
                });
            }
        }
    }

    fn trim_to_closing(&mut self, remaining: f32) {
        let length = self.descriptor.length();
        self.visible_length = remaining.clamp(0.0, length);
        if self.visible_length < length {
            let visible = self.visible_length;
            self.coins.retain(|coin| coin.distance <= visible);
            tracing::debug!(
                "Trimmed closing section '{}' from {} to {}",
                self.descriptor.id(),
                length,
                visible
            );
        }
    }

    fn exit_offset(&self) -> Transform {
        self.descriptor.exit()
    }

    fn length(&self) -> f32 {
        self.descriptor.length()
    }

    fn dispose(self) {
        tracing::trace!(
            "Disposing section '{}' with {} coins",
            self.descriptor.id(),
            self.coins.len()
        );
    }
}

/// Creates [`RoadSection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadSectionFactory;

impl SectionFactory for RoadSectionFactory {
    type Section = RoadSection;

    fn create(&mut self, descriptor: &Arc<SectionDescriptor>) -> RoadSection {
        RoadSection::new(descriptor)
    }
}
