//! Particle trails for thrust, damage and debris smoke.
//!
//! A [`Trail`] is a bounded, ordered buffer of [`TrailParticle`]s. The owning
//! entity moves the trail's anchor every tick, calls [`Trail::update`] to age
//! existing particles, and then [`Trail::emit`] when its emission condition
//! holds (thrusting, damaged, ...).
//!
//! Lifetimes are counted in ticks. A particle is removed on exactly the tick
//! its counter reaches zero and is never revived.
//!
//! Trails are owned by value. When an emitter dies its trails are moved into
//! an [`Explosion`](crate::effects::Explosion) so the smoke can fade out; see
//! [`Entity::take_trails`](crate::entity::Entity::take_trails).

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::TrailConfig;
use crate::error::Result;

/// What drives a trail's emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrailKind {
    /// Exhaust; emits the throttle fraction while thrusting.
    Engine,
    /// Burning hull; emits the damage fraction while below max health.
    DamageBurn,
    /// Spent casing smoke; emits at full intensity while alive.
    Debris,
}

/// One smoke puff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailParticle {
    /// World position.
    pub position: Vec2,
    /// Emitter heading at emission.
    pub heading: Vec2,
    /// Velocity inherited from the emitter; `None` for static trails.
    pub velocity: Option<Vec2>,
    /// Emission intensity in `[0, 1]`.
    pub intensity: f32,
    remaining: u32,
    lifetime: u32,
}

impl TrailParticle {
    /// Ticks left before removal. Always at least 1 for a live particle.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Lifetime the particle was emitted with.
    #[must_use]
    pub const fn lifetime(&self) -> u32 {
        self.lifetime
    }

    /// Fraction of life left, `1.0` when fresh.
    #[must_use]
    pub fn life_fraction(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.remaining as f32 / self.lifetime as f32;
        fraction
    }
}

/// Where new particles are emitted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Emission point.
    pub position: Vec2,
    /// Emitter heading.
    pub heading: Vec2,
    /// Emitter velocity.
    pub velocity: Vec2,
}

/// Bounded particle buffer attached to an emitter.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use skirmish_core::config::TrailConfig;
/// use skirmish_core::trail::{Trail, TrailKind};
///
/// let mut trail = Trail::new(TrailKind::Engine, TrailConfig {
///     lifetime: 2,
///     ..TrailConfig::engine()
/// })
/// .unwrap();
///
/// trail.set_anchor(Vec2::ZERO, Vec2::X, Vec2::new(10.0, 0.0));
/// trail.emit(1.0);
/// trail.update(1.0);
/// assert_eq!(trail.len(), 1);
/// trail.update(1.0);
/// assert!(trail.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    kind: TrailKind,
    config: TrailConfig,
    anchor: Anchor,
    particles: VecDeque<TrailParticle>,
    stopped: bool,
}

impl Trail {
    /// Creates an empty trail.
    ///
    /// # Errors
    ///
    /// Returns the [`TrailConfig::validate`] error for a zero lifetime or
    /// capacity.
    pub fn new(kind: TrailKind, config: TrailConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            kind,
            config,
            anchor: Anchor::default(),
            particles: VecDeque::with_capacity(config.capacity.min(64)),
            stopped: false,
        })
    }

    /// The trail's emission driver.
    #[must_use]
    pub const fn kind(&self) -> TrailKind {
        self.kind
    }

    /// The trail's tuning.
    #[must_use]
    pub const fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Whether particles stay fixed at their emission point.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.config.is_static
    }

    /// Current emission point.
    #[must_use]
    pub const fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Moves the emission point.
    pub fn set_anchor(&mut self, position: Vec2, heading: Vec2, velocity: Vec2) {
        self.anchor = Anchor {
            position,
            heading,
            velocity,
        };
    }

    /// Emits one particle at the anchor.
    ///
    /// `intensity` is clamped to `[0, 1]`. Returns `false` if the trail has
    /// been stopped. When the buffer is full the oldest particle is retired.
    pub fn emit(&mut self, intensity: f32) -> bool {
        if self.stopped {
            return false;
        }
        if self.particles.len() >= self.config.capacity {
            self.particles.pop_front();
            trace!(kind = ?self.kind, capacity = self.config.capacity, "trail full");
        }
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        self.particles.push_back(TrailParticle {
            position: self.anchor.position,
            heading: self.anchor.heading,
            velocity: (!self.config.is_static).then_some(self.anchor.velocity),
            intensity,
            remaining: self.config.lifetime,
            lifetime: self.config.lifetime,
        });
        true
    }

    /// Ages every particle by one tick and drops the expired ones.
    ///
    /// Non-static particles drift by their inherited velocity over `dt`.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.remaining = particle.remaining.saturating_sub(1);
            if let Some(velocity) = particle.velocity {
                particle.position += velocity * dt;
            }
        }
        self.particles.retain(|p| p.remaining > 0);
    }

    /// Halts emission; existing particles keep aging.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> impl ExactSizeIterator<Item = &TrailParticle> + '_ {
        self.particles.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
