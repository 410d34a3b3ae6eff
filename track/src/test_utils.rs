//! Shared test utilities for generator and section tests

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::catalog::{SectionCatalog, SectionDescriptor};
use crate::math::Transform;
use crate::section::{ContentRate, Section, SectionFactory};

// ============================================================================
// Recording Section Implementation
// ============================================================================

/// Calls made on a [`RecordingSection`], tagged with the descriptor id
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEvent {
    Created(String),
    Placed(String, Vec3),
    Realized(String, f32),
    Trimmed(String, f32),
    Disposed(String),
}

pub type EventLog = Rc<RefCell<Vec<SectionEvent>>>;

/// Section that records every collaborator call into a shared log
pub struct RecordingSection {
    descriptor: Arc<SectionDescriptor>,
    log: EventLog,
}

impl RecordingSection {
    fn record(&self, event: SectionEvent) {
        self.log.borrow_mut().push(event);
    }

    fn id(&self) -> String {
        self.descriptor.id().to_string()
    }
}

impl Section for RecordingSection {
    fn set_data(&mut self, descriptor: &Arc<SectionDescriptor>) {
        self.descriptor = Arc::clone(descriptor);
    }

    fn place_at(&mut self, position: Vec3, _rotation: Quat) {
        self.record(SectionEvent::Placed(self.id(), position));
    }

    fn realize_content<R: Rng>(&mut self, rate: ContentRate, _rng: &mut R) {
        self.record(SectionEvent::Realized(self.id(), rate.get()));
    }

    fn trim_to_closing(&mut self, remaining: f32) {
        self.record(SectionEvent::Trimmed(self.id(), remaining));
    }

    fn exit_offset(&self) -> Transform {
        self.descriptor.exit()
    }

    fn length(&self) -> f32 {
        self.descriptor.length()
    }

    fn dispose(self) {
        self.record(SectionEvent::Disposed(self.id()));
    }
}

/// Factory for [`RecordingSection`]s sharing one log
#[derive(Default)]
pub struct RecordingFactory {
    pub log: EventLog,
}

impl RecordingFactory {
    pub fn events(&self) -> Vec<SectionEvent> {
        self.log.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&SectionEvent) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| matches(e)).count()
    }
}

impl SectionFactory for RecordingFactory {
    type Section = RecordingSection;

    fn create(&mut self, descriptor: &Arc<SectionDescriptor>) -> RecordingSection {
        self.log
            .borrow_mut()
            .push(SectionEvent::Created(descriptor.id().to_string()));
        RecordingSection {
            descriptor: Arc::clone(descriptor),
            log: Rc::clone(&self.log),
        }
    }
}

// ============================================================================
// Catalogs
// ============================================================================

/// Start, end and three interior variants, all straight with the same length
pub fn uniform_catalog(segment: f32) -> SectionCatalog {
    let straight = |id: &str| SectionDescriptor::straight(id, segment).unwrap();
    SectionCatalog::new(
        straight("start"),
        straight("end"),
        vec![straight("a"), straight("b"), straight("c")],
    )
    .unwrap()
}

/// Interior sections of different lengths, including turns and a ramp
pub fn winding_catalog() -> SectionCatalog {
    let turn = |id: &str, yaw: f32| {
        SectionDescriptor::new(id, 6.0, Transform::from_pod([0.0, 0.0, 6.0], [yaw, 0.0, 0.0]))
            .unwrap()
            .with_blocks(3)
            .unwrap()
    };
    let ramp_exit = Transform::from_pod([0.0, 2.0, 8.5], [0.0, -10.0, 0.0]);
    let ramp = SectionDescriptor::new("ramp", 9.0, ramp_exit)
        .unwrap()
        .with_weight(0.5)
        .unwrap();
    let short = SectionDescriptor::straight("short", 4.0)
        .unwrap()
        .with_blocks(2)
        .unwrap()
        .with_weight(2.0)
        .unwrap();

    SectionCatalog::new(
        SectionDescriptor::straight("start", 5.0).unwrap(),
        SectionDescriptor::straight("end", 8.0).unwrap(),
        vec![short, turn("left", 30.0), turn("right", -30.0), ramp],
    )
    .unwrap()
}
