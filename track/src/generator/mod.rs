//! Track generator
//!
//! Owns the chain of placed sections, the transform cursor where the next
//! section attaches, and the accumulated length. Two entry points share one
//! placement routine:
//!
//! - [`TrackGenerator::spawn_next`] places a single section per call and is
//!   meant to be driven from the host's tick.
//! - [`TrackGenerator::spawn_all`] runs to completion in one call.
//!
//! Both start with the catalog's start section, fill with interior sections
//! picked at random and finish with the end section, trimmed to the
//! remaining length budget.

mod layout;

use std::sync::Arc;

use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::{SectionCatalog, SectionDescriptor};
use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::math::Transform;
use crate::section::{ContentRate, Section, SectionFactory};

pub use layout::{PlacedSection, TrackLayout};

/// Generation progress.
///
/// `Empty -> Growing -> Terminal`. The closing placement moves `Growing`
/// straight to `Terminal`; only [`TrackGenerator::reset`] goes back to `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrackPhase {
    /// Nothing placed yet; the next placement is the start section
    #[default]
    Empty,
    /// Start section placed, interior sections being added
    Growing,
    /// End section placed; further spawns are no-ops
    Terminal,
}

/// One placed section. Its frame, descriptor and length never change.
#[derive(Debug)]
pub struct SectionInstance<S> {
    descriptor: Arc<SectionDescriptor>,
    entry: Transform,
    exit: Transform,
    length: f32,
    content_rate: ContentRate,
    trim: Option<f32>,
    section: S,
}

impl<S> SectionInstance<S> {
    pub fn descriptor(&self) -> &Arc<SectionDescriptor> {
        &self.descriptor
    }

    /// Entry frame in track-local space
    pub fn entry(&self) -> Transform {
        self.entry
    }

    /// Exit frame relative to `entry`
    pub fn exit(&self) -> Transform {
        self.exit
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn content_rate(&self) -> ContentRate {
        self.content_rate
    }

    /// Whether this is the closing section of the track
    pub fn is_closing(&self) -> bool {
        self.trim.is_some()
    }

    /// Remaining budget handed to the section when it closed the track
    pub fn trim(&self) -> Option<f32> {
        self.trim
    }

    /// Length that counts towards the budget after trimming
    pub fn trimmed_length(&self) -> f32 {
        self.trim.map_or(self.length, |trim| trim.min(self.length))
    }

    /// The host-side section
    pub fn section(&self) -> &S {
        &self.section
    }
}

/// Incremental track builder.
///
/// Every mutating operation takes `&mut self`; hosts that share a generator
/// across threads must wrap it themselves.
pub struct TrackGenerator<F: SectionFactory, R: Rng = Pcg32> {
    catalog: SectionCatalog,
    config: TrackConfig,
    coin_rate: ContentRate,
    factory: F,
    rng: R,
    picker: WeightedIndex<f32>,
    sections: Vec<SectionInstance<F::Section>>,
    cursor: Transform,
    length: f32,
    phase: TrackPhase,
}

impl<F: SectionFactory> TrackGenerator<F, Pcg32> {
    /// Create a generator with a PCG source seeded from `config.seed`,
    /// or from OS entropy when no seed is configured.
    pub fn seeded(
        catalog: SectionCatalog,
        config: TrackConfig,
        factory: F,
    ) -> Result<Self, TrackError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::debug!("Seeding track generator with {}", seed);
        Self::new(catalog, config, factory, Pcg32::seed_from_u64(seed))
    }
}

impl<F: SectionFactory, R: Rng> TrackGenerator<F, R> {
    /// Create a generator, validating the configuration against the catalog.
    ///
    /// Fails when `max_length` is not positive, a margin is shorter than the
    /// longest interior section (the track could overshoot its budget), or
    /// the start section alone does not fit in the budget.
    pub fn new(
        catalog: SectionCatalog,
        config: TrackConfig,
        factory: F,
        rng: R,
    ) -> Result<Self, TrackError> {
        config.validate()?;
        let coin_rate = config.coin_rate()?;

        if catalog.pool().is_empty() {
            return Err(TrackError::EmptyPool);
        }
        let longest = catalog.longest_interior();
        for (name, margin) in [
            ("lookahead_margin", config.lookahead_margin),
            ("closing_margin", config.closing_margin),
        ] {
            if margin < longest.length() {
                return Err(TrackError::MarginTooSmall {
                    name,
                    margin,
                    id: longest.id().to_string(),
                    length: longest.length(),
                });
            }
        }

        let start = catalog.start();
        if start.length() >= config.max_length {
            return Err(TrackError::StartExceedsBudget {
                id: start.id().to_string(),
                length: start.length(),
                max_length: config.max_length,
            });
        }

        let picker = WeightedIndex::new(catalog.pool().iter().map(|d| d.weight()))
            .map_err(|e| TrackError::InvalidWeights(e.to_string()))?;

        Ok(Self {
            catalog,
            config,
            coin_rate,
            factory,
            rng,
            picker,
            sections: Vec::new(),
            cursor: Transform::IDENTITY,
            length: 0.0,
            phase: TrackPhase::Empty,
        })
    }

    /// Dispose every placed section and return to the freshly-constructed state.
    pub fn reset(&mut self) {
        let disposed = self.sections.len();
        for instance in self.sections.drain(..) {
            instance.section.dispose();
        }
        self.cursor = Transform::IDENTITY;
        self.length = 0.0;
        self.phase = TrackPhase::Empty;

        if disposed > 0 {
            tracing::info!("Track reset, disposed {} sections", disposed);
        }
    }

    /// Start a new track and place up to `count` sections ahead of the consumer.
    ///
    /// This always calls [`reset`](Self::reset) first: a track in progress is
    /// disposed and its sections are lost. Use [`spawn_next`](Self::spawn_next)
    /// to extend the current track instead.
    pub fn pre_spawn(&mut self, count: usize) {
        self.reset();
        for _ in 0..count {
            if !self.spawn_next() {
                break;
            }
        }
    }

    /// [`pre_spawn`](Self::pre_spawn) with `config.pre_spawn_count`
    pub fn pre_spawn_default(&mut self) {
        self.pre_spawn(self.config.pre_spawn_count);
    }

    /// Place the next section. Returns `false` once the track is terminal.
    pub fn spawn_next(&mut self) -> bool {
        match self.phase {
            TrackPhase::Terminal => false,
            TrackPhase::Empty => {
                self.place_start();
                true
            }
            TrackPhase::Growing => {
                if self.length < self.budget(self.config.lookahead_margin) {
                    let descriptor = self.pick_interior();
                    self.place(descriptor, self.coin_rate, false);
                } else {
                    self.close();
                }
                true
            }
        }
    }

    /// Generate the rest of the track in one call, using `rate` as the
    /// content rate for interior sections. No-op when already terminal.
    pub fn spawn_all(&mut self, rate: ContentRate) {
        if self.phase == TrackPhase::Terminal {
            return;
        }
        if self.phase == TrackPhase::Empty {
            self.place_start();
        }

        let budget = self.budget(self.config.closing_margin);
        while self.length < budget {
            let descriptor = self.pick_interior();
            self.place(descriptor, rate, false);
        }
        self.close();
    }

    fn budget(&self, margin: f32) -> f32 {
        self.config.max_length - margin
    }

    fn pick_interior(&mut self) -> Arc<SectionDescriptor> {
        let index = self.picker.sample(&mut self.rng);
        Arc::clone(&self.catalog.pool()[index])
    }

    fn place_start(&mut self) {
        let start = Arc::clone(self.catalog.start());
        self.place(start, ContentRate::ZERO, false);
        self.phase = TrackPhase::Growing;
    }

    fn close(&mut self) {
        let end = Arc::clone(self.catalog.end());
        self.place(end, ContentRate::ZERO, true);
        self.phase = TrackPhase::Terminal;
        tracing::info!(
            "Track closed: {} sections, length {} of {}",
            self.sections.len(),
            self.length,
            self.config.max_length
        );
    }

    fn place(&mut self, descriptor: Arc<SectionDescriptor>, rate: ContentRate, closing: bool) {
        debug_assert_ne!(self.phase, TrackPhase::Terminal, "placement after track closed");

        let entry = self.cursor;
        let mut section = self.factory.create(&descriptor);
        section.set_data(&descriptor);
        section.place_at(entry.position, entry.rotation);
        section.realize_content(rate, &mut self.rng);

        let trim = closing.then(|| (self.config.max_length - self.length).max(0.0));
        if let Some(remaining) = trim {
            section.trim_to_closing(remaining);
        }

        let exit = section.exit_offset();
        let length = section.length();
        debug_assert!(length > 0.0, "section '{}' has non-positive length", descriptor.id());

        self.cursor = entry.then(&exit);
        self.length += length;

        tracing::debug!(
            "Placed section #{} '{}' at {:?}, length {}",
            self.sections.len(),
            descriptor.id(),
            entry.position,
            self.length
        );

        self.sections.push(SectionInstance {
            descriptor,
            entry,
            exit,
            length,
            content_rate: rate,
            trim,
            section,
        });
    }

    /// Placed sections in spawn order (which is also track order)
    pub fn sections(&self) -> &[SectionInstance<F::Section>] {
        &self.sections
    }

    /// Frame where the next section will attach
    pub fn cursor(&self) -> Transform {
        self.cursor
    }

    /// Sum of the lengths of all placed sections
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Length with the closing section clamped to its trim
    pub fn trimmed_length(&self) -> f32 {
        self.sections.iter().map(SectionInstance::trimmed_length).sum()
    }

    pub fn max_length(&self) -> f32 {
        self.config.max_length
    }

    pub fn phase(&self) -> TrackPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == TrackPhase::Terminal
    }

    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}
