//! Test helpers for setting up simulations and entities.

use glam::Vec2;

use crate::config::{BodyConfig, DriveConfig};
use crate::entity::{Entity, EntityBuilder, EntityId, EntityTags};
use crate::random::RandomSource;
use crate::simulation::Simulation;

// =============================================================================
// Logging
// =============================================================================

/// Routes `tracing` output through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Entity Factories
// =============================================================================

/// A driven body at `position` heading along +X with default tuning.
pub fn driven_body(position: Vec2, drive: DriveConfig) -> Entity {
    EntityBuilder::new(EntityTags::MISSILE, BodyConfig::default())
        .at(position)
        .drive(drive)
        .build()
        .unwrap()
}

/// Spawns a stock ship at `position`.
pub fn spawn_ship<R: RandomSource>(sim: &mut Simulation<R>, position: Vec2) -> EntityId {
    sim.spawn(EntityBuilder::ship().at(position).build().unwrap())
}

/// Spawns a stock frag missile at `position` homing on `target`, launched
/// by `owner`.
pub fn spawn_frag_missile<R: RandomSource>(
    sim: &mut Simulation<R>,
    position: Vec2,
    target: EntityId,
    owner: Option<EntityId>,
) -> EntityId {
    let builder = EntityBuilder::frag_missile().at(position).target(target);
    let builder = match owner {
        Some(owner) => builder.owner(owner),
        None => builder,
    };
    sim.spawn(builder.build().unwrap())
}

// =============================================================================
// Queries
// =============================================================================

/// Position of a live entity.
pub fn position<R: RandomSource>(sim: &Simulation<R>, id: EntityId) -> Option<Vec2> {
    sim.registry().get(id).map(|e| e.body().position)
}

/// Number of live entities carrying all of `tags`.
pub fn count_tagged<R: RandomSource>(sim: &Simulation<R>, tags: EntityTags) -> usize {
    sim.registry()
        .iter()
        .filter(|e| e.tags().contains(tags))
        .count()
}

// =============================================================================
// Scripted Randomness
// =============================================================================

/// Random source that always returns the midpoint of the requested range.
#[derive(Debug, Clone, Default)]
pub struct MidpointRandom {
    /// Number of samples drawn.
    pub draws: usize,
}

impl RandomSource for MidpointRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        self.draws += 1;
        if high <= low {
            return low;
        }
        low + (high - low) * 0.5
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.draws += 1;
        if high <= low {
            return low;
        }
        low + (high - low) / 2
    }
}
