//! Read-only world snapshots for renderers.
//!
//! A [`WorldSnapshot`] is a plain, serializable copy of everything a renderer
//! needs: positions, headings, throttle and health fractions, trail
//! particles and live explosions. Nothing in it refers back into the
//! simulation, so there is no mutation path from the renderer into the core.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::effects::Explosion;
use crate::entity::{Entity, EntityId, EntityTags};
use crate::registry::Registry;
use crate::trail::{Trail, TrailKind, TrailParticle};

/// One trail's particles, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSnapshot {
    /// Emission driver.
    pub kind: TrailKind,
    /// Whether the particles stay where they were emitted.
    pub is_static: bool,
    /// Live particles.
    pub particles: Vec<TrailParticle>,
}

impl From<&Trail> for TrailSnapshot {
    fn from(trail: &Trail) -> Self {
        Self {
            kind: trail.kind(),
            is_static: trail.is_static(),
            particles: trail.particles().copied().collect(),
        }
    }
}

/// Render state of one live entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity ID.
    pub id: EntityId,
    /// Category tags.
    pub tags: EntityTags,
    /// World position.
    pub position: Vec2,
    /// Heading angle in radians.
    pub heading: f32,
    /// Radius.
    pub radius: f32,
    /// `throttle / max_throttle`; zero for undriven entities.
    pub throttle_fraction: f32,
    /// `health / max_health`, in `[0, 1]`.
    pub health_fraction: f32,
    /// Trails attached to the entity.
    pub trails: Vec<TrailSnapshot>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            tags: entity.tags(),
            position: entity.body().position,
            heading: entity.body().heading_angle(),
            radius: entity.body().radius(),
            throttle_fraction: entity.as_drive().map_or(0.0, |d| d.throttle_fraction()),
            health_fraction: entity.health().fraction(),
            trails: entity.trails().iter().map(TrailSnapshot::from).collect(),
        }
    }
}

/// Render state of one explosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionSnapshot {
    /// Entity that exploded.
    pub source: EntityId,
    /// Blast centre.
    pub position: Vec2,
    /// Blast radius.
    pub radius: f32,
    /// Ticks since the blast.
    pub age: u32,
    /// Inherited, fading trails.
    pub trails: Vec<TrailSnapshot>,
}

impl From<&Explosion> for ExplosionSnapshot {
    fn from(explosion: &Explosion) -> Self {
        Self {
            source: explosion.source(),
            position: explosion.position(),
            radius: explosion.radius(),
            age: explosion.age(),
            trails: explosion.trails().iter().map(TrailSnapshot::from).collect(),
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed when the snapshot was taken.
    pub tick: u64,
    /// Live entities in iteration order.
    pub entities: Vec<EntitySnapshot>,
    /// Live explosions.
    pub explosions: Vec<ExplosionSnapshot>,
}

impl WorldSnapshot {
    /// Copies the render state out of a registry and its effects.
    #[must_use]
    pub fn capture(tick: u64, registry: &Registry, effects: &[Explosion]) -> Self {
        Self {
            tick,
            entities: registry.iter().map(EntitySnapshot::from).collect(),
            explosions: effects.iter().map(ExplosionSnapshot::from).collect(),
        }
    }

    /// Snapshot of one entity, if it was live.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }
}
