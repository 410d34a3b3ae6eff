//! Serializable snapshot of a generated track

use rand::Rng;
use serde::Serialize;

use super::{SectionInstance, TrackGenerator};
use crate::section::SectionFactory;

/// One section of a [`TrackLayout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSection {
    pub id: String,
    /// Entry position in track-local space
    pub position: [f32; 3],
    /// Entry rotation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    pub length: f32,
    pub content_rate: f32,
    pub closing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<f32>,
}

impl<S> From<&SectionInstance<S>> for PlacedSection {
    fn from(instance: &SectionInstance<S>) -> Self {
        let entry = instance.entry();
        Self {
            id: instance.descriptor().id().to_string(),
            position: entry.position.to_array(),
            rotation: entry.rotation.to_array(),
            length: instance.length(),
            content_rate: instance.content_rate().get(),
            closing: instance.is_closing(),
            trim: instance.trim(),
        }
    }
}

/// Read-only view of the generator state, for tooling and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackLayout {
    pub max_length: f32,
    pub length: f32,
    pub trimmed_length: f32,
    pub terminal: bool,
    pub sections: Vec<PlacedSection>,
}

impl<F: SectionFactory, R: Rng> TrackGenerator<F, R> {
    /// Snapshot the placed sections
    pub fn layout(&self) -> TrackLayout {
        TrackLayout {
            max_length: self.max_length(),
            length: self.length(),
            trimmed_length: self.trimmed_length(),
            terminal: self.is_terminal(),
            sections: self.sections().iter().map(PlacedSection::from).collect(),
        }
    }
}
