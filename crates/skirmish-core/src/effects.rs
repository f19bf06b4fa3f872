//! Visual effects that outlive the entity that produced them.
//!
//! When an entity is disposed its trails are moved into an [`Explosion`].
//! The explosion keeps aging them so the smoke fades out naturally, and is
//! finished once every inherited particle has expired.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::trail::Trail;

/// Blast flash plus the inherited smoke of a disposed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    source: EntityId,
    position: Vec2,
    radius: f32,
    trails: Vec<Trail>,
    age: u32,
}

impl Explosion {
    /// Creates an explosion that takes ownership of `trails`.
    ///
    /// The trails are stopped: they keep aging but never emit again.
    #[must_use]
    pub fn new(source: EntityId, position: Vec2, radius: f32, mut trails: Vec<Trail>) -> Self {
        for trail in &mut trails {
            trail.stop();
        }
        Self {
            source,
            position,
            radius,
            trails,
            age: 0,
        }
    }

    /// Entity that produced this explosion.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        self.source
    }

    /// Blast centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Blast radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Inherited trails.
    #[must_use]
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Ticks since the blast.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Ages the blast and its trails by one tick.
    pub fn update(&mut self, dt: f32) {
        self.age = self.age.saturating_add(1);
        for trail in &mut self.trails {
            trail.update(dt);
        }
    }

    /// True once every inherited particle has expired.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.trails.iter().all(Trail::is_empty)
    }
}
