//! Section descriptors and the catalog they are loaded from
//!
//! Catalogs are authored as TOML:
//!
//! ```toml
//! start = "gate"
//! end = "finish"
//!
//! [[sections]]
//! id = "gate"
//! length = 10.0
//!
//! [[sections]]
//! id = "bend-left"
//! length = 12.0
//! blocks = 4
//! weight = 0.5
//! exit_position = [-2.0, 0.0, 11.5]
//! exit_rotation = [20.0, 0.0, 0.0]
//! ```
//!
//! Every section that is neither `start` nor `end` goes into the interior pool.

use std::path::Path;
use std::sync::Arc;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::math::Transform;

/// Immutable template for one section variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDescriptor {
    id: String,
    length: f32,
    blocks: u32,
    weight: f32,
    exit: Transform,
}

impl SectionDescriptor {
    /// Create a descriptor with one block and unit weight.
    pub fn new(id: impl Into<String>, length: f32, exit: Transform) -> Result<Self, TrackError> {
        let id = id.into();
        if !(length.is_finite() && length > 0.0) {
            return Err(TrackError::InvalidSectionLength { id, length });
        }
        if !exit.is_finite() {
            return Err(TrackError::InvalidExit(id));
        }
        Ok(Self {
            id,
            length,
            blocks: 1,
            weight: 1.0,
            exit,
        })
    }

    /// Straight section whose exit sits `length` units along +Z
    pub fn straight(id: impl Into<String>, length: f32) -> Result<Self, TrackError> {
        Self::new(id, length, Transform::from_position(glam::Vec3::Z * length))
    }

    /// Number of equal sub-units content is rolled for
    pub fn with_blocks(mut self, blocks: u32) -> Result<Self, TrackError> {
        if blocks == 0 {
            return Err(TrackError::InvalidBlockCount(self.id));
        }
        self.blocks = blocks;
        Ok(self)
    }

    /// Relative selection weight inside the interior pool
    pub fn with_weight(mut self, weight: f32) -> Result<Self, TrackError> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(TrackError::InvalidSectionWeight {
                id: self.id,
                weight,
            });
        }
        self.weight = weight;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Exit frame relative to the section's entry frame
    pub fn exit(&self) -> Transform {
        self.exit
    }
}

/// Serialized form of a [`SectionDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDef {
    pub id: String,
    pub length: f32,
    /// Sub-units for content placement (default: 1)
    #[serde(default = "default_blocks")]
    pub blocks: u32,
    /// Interior selection weight (default: 1.0)
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Exit position in the entry frame (default: `[0, 0, length]`)
    #[serde(default)]
    pub exit_position: Option<[f32; 3]>,
    /// Exit rotation as Euler degrees: yaw, pitch, roll (default: none)
    #[serde(default)]
    pub exit_rotation: [f32; 3],
}

fn default_blocks() -> u32 {
    1
}
fn default_weight() -> f32 {
    1.0
}

impl SectionDef {
    pub fn into_descriptor(self) -> Result<SectionDescriptor, TrackError> {
        let position = self.exit_position.unwrap_or([0.0, 0.0, self.length]);
        let exit = Transform::from_pod(position, self.exit_rotation);
        SectionDescriptor::new(self.id, self.length, exit)?
            .with_blocks(self.blocks)?
            .with_weight(self.weight)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    start: String,
    end: String,
    #[serde(default)]
    sections: Vec<SectionDef>,
}

/// The start, end and interior descriptors a track is built from.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    start: Arc<SectionDescriptor>,
    end: Arc<SectionDescriptor>,
    pool: Vec<Arc<SectionDescriptor>>,
}

impl SectionCatalog {
    /// Build a catalog, rejecting an empty interior pool.
    pub fn new(
        start: SectionDescriptor,
        end: SectionDescriptor,
        pool: Vec<SectionDescriptor>,
    ) -> Result<Self, TrackError> {
        if pool.is_empty() {
            return Err(TrackError::EmptyPool);
        }
        Ok(Self {
            start: Arc::new(start),
            end: Arc::new(end),
            pool: pool.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, TrackError> {
        let file: CatalogFile = toml::from_str(source)?;

        let mut seen = HashSet::new();
        let mut start = None;
        let mut end = None;
        let mut pool = Vec::new();

        // Start and end may name the same section
        for def in file.sections {
            if !seen.insert(def.id.clone()) {
                return Err(TrackError::DuplicateSection(def.id));
            }
            let descriptor = def.into_descriptor()?;
            let is_start = descriptor.id() == file.start;
            let is_end = descriptor.id() == file.end;
            if is_end {
                end = Some(descriptor.clone());
            }
            if is_start {
                start = Some(descriptor);
            } else if !is_end {
                pool.push(descriptor);
            }
        }

        let start = start.ok_or(TrackError::UnknownSection(file.start))?;
        let end = end.ok_or(TrackError::UnknownSection(file.end))?;
        let catalog = Self::new(start, end, pool)?;

        tracing::debug!(
            "Loaded section catalog: start '{}', end '{}', {} interior sections",
            catalog.start.id(),
            catalog.end.id(),
            catalog.pool.len()
        );
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let source = std::fs::read_to_string(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn start(&self) -> &Arc<SectionDescriptor> {
        &self.start
    }

    pub fn end(&self) -> &Arc<SectionDescriptor> {
        &self.end
    }

    /// Interior descriptors, never empty
    pub fn pool(&self) -> &[Arc<SectionDescriptor>] {
        &self.pool
    }

    /// Longest interior section (used to validate closing margins)
    pub fn longest_interior(&self) -> &Arc<SectionDescriptor> {
        let mut longest = &self.pool[0];
        for descriptor in &self.pool[1..] {
            if descriptor.length() > longest.length() {
                longest = descriptor;
            }
        }
        longest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const CATALOG: &str = r#"
        start = "gate"
        end = "finish"

        [[sections]]
        id = "gate"
        length = 10.0

        [[sections]]
        id = "straight"
        length = 8.0
        blocks = 4

        [[sections]]
        id = "bend"
        length = 12.0
        weight = 0.5
        exit_position = [-2.0, 0.0, 11.5]
        exit_rotation = [20.0, 0.0, 0.0]

        [[sections]]
        id = "finish"
        length = 6.0
    "#;

    #[test]
    fn test_parse_catalog() {
        let catalog = SectionCatalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.start().id(), "gate");
        assert_eq!(catalog.end().id(), "finish");

        let ids: Vec<&str> = catalog.pool().iter().map(|d| d.id()).collect();
        assert_eq!(ids, ["straight", "bend"]);
        assert_eq!(catalog.longest_interior().id(), "bend");
    }

    #[test]
    fn test_section_defaults() {
        let catalog = SectionCatalog::from_toml_str(CATALOG).unwrap();
        let gate = catalog.start();
        assert_eq!(gate.blocks(), 1);
        assert_eq!(gate.weight(), 1.0);
        assert_eq!(gate.exit(), Transform::from_position(Vec3::new(0.0, 0.0, 10.0)));

        let straight = &catalog.pool()[0];
        assert_eq!(straight.blocks(), 4);

        let bend = &catalog.pool()[1];
        assert_eq!(bend.weight(), 0.5);
        assert_eq!(bend.exit().position, Vec3::new(-2.0, 0.0, 11.5));
    }

    #[test]
    fn test_rejects_non_positive_length() {
        let source = r#"
            start = "a"
            end = "b"
            [[sections]]
            id = "a"
            length = 0.0
        "#;
        let err = SectionCatalog::from_toml_str(source).unwrap_err();
        assert!(matches!(err, TrackError::InvalidSectionLength { ref id, .. } if id == "a"));

        assert!(SectionDescriptor::straight("neg", -3.0).is_err());
        assert!(SectionDescriptor::straight("nan", f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_empty_pool() {
        let source = r#"
            start = "a"
            end = "b"
            [[sections]]
            id = "a"
            length = 5.0
            [[sections]]
            id = "b"
            length = 5.0
        "#;
        assert!(matches!(
            SectionCatalog::from_toml_str(source),
            Err(TrackError::EmptyPool)
        ));
    }

    #[test]
    fn test_rejects_unknown_start_or_end() {
        let source = r#"
            start = "missing"
            end = "b"
            [[sections]]
            id = "b"
            length = 5.0
            [[sections]]
            id = "c"
            length = 5.0
        "#;
        assert!(matches!(
            SectionCatalog::from_toml_str(source),
            Err(TrackError::UnknownSection(ref id)) if id == "missing"
        ));
    }

    #[test]
    fn test_same_start_and_end() {
        let source = r#"
            start = "gate"
            end = "gate"
            [[sections]]
            id = "gate"
            length = 6.0
            [[sections]]
            id = "road"
            length = 8.0
        "#;
        let catalog = SectionCatalog::from_toml_str(source).unwrap();
        assert_eq!(catalog.start().id(), "gate");
        assert_eq!(catalog.end().id(), "gate");
        let pool: Vec<_> = catalog.pool().iter().map(|d| d.id()).collect();
        assert_eq!(pool, ["road"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let source = r#"
            start = "a"
            end = "b"
            [[sections]]
            id = "a"
            length = 5.0
            [[sections]]
            id = "a"
            length = 6.0
        "#;
        assert!(matches!(
            SectionCatalog::from_toml_str(source),
            Err(TrackError::DuplicateSection(ref id)) if id == "a"
        ));
    }

    #[test]
    fn test_rejects_bad_blocks_and_weight() {
        let straight = SectionDescriptor::straight("s", 4.0).unwrap();
        assert!(matches!(
            straight.clone().with_blocks(0),
            Err(TrackError::InvalidBlockCount(_))
        ));
        assert!(matches!(
            straight.clone().with_weight(0.0),
            Err(TrackError::InvalidSectionWeight { .. })
        ));
        assert!(straight.with_weight(f32::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            SectionCatalog::from_toml_str("start = "),
            Err(TrackError::Parse(_))
        ));
    }

    #[test]
    fn test_new_rejects_empty_pool() {
        let start = SectionDescriptor::straight("start", 5.0).unwrap();
        let end = SectionDescriptor::straight("end", 5.0).unwrap();
        assert!(matches!(
            SectionCatalog::new(start, end, Vec::new()),
            Err(TrackError::EmptyPool)
        ));
    }
}
