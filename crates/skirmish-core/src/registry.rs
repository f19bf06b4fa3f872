//! Entity registry: live set, spawn queue and disposal sweep.
//!
//! The registry owns every entity. It guarantees three things:
//!
//! - **Deferred spawning.** [`Registry::add`] assigns an ID immediately but
//!   queues the entity. Queued entities become live at the next
//!   [`Registry::promote_pending`], which the simulation calls at the start
//!   of every tick. Nothing spawned mid-tick is iterated in that tick.
//! - **Stable order.** Live entities are stored in a `BTreeMap` keyed by
//!   monotonically increasing IDs, so iteration order is insertion order.
//! - **Two-phase disposal.** Entities are only flagged during the update
//!   pass; [`Registry::sweep_disposed`] removes them afterwards, running
//!   fragmentation and handing their trails to an [`Explosion`].
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::EntityBuilder;
//! use skirmish_core::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let id = registry.add(EntityBuilder::ship().build().unwrap());
//!
//! // Queued, not yet live.
//! assert!(registry.get(id).is_none());
//! registry.promote_pending();
//! assert!(registry.get(id).is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::effects::Explosion;
use crate::entity::{Entity, EntityId};
use crate::error::Result;
use crate::fragmentation;
use crate::guidance::TargetInfo;
use crate::random::RandomSource;

/// What a disposal sweep removed and spawned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entities removed, in ID order.
    pub disposed: Vec<EntityId>,
    /// Entities queued by fragmentation.
    pub spawned: usize,
}

/// Owner of all entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    pending: Vec<Entity>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Spawning =====

    /// Assigns an ID and queues the entity for the next tick.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.pending.push(entity);
        id
    }

    /// Makes every queued entity live. Returns how many were promoted.
    pub fn promote_pending(&mut self) -> usize {
        let count = self.pending.len();
        for entity in self.pending.drain(..) {
            self.entities.insert(entity.id, entity);
        }
        count
    }

    /// Entities waiting for the next tick.
    pub fn pending(&self) -> impl ExactSizeIterator<Item = &Entity> + '_ {
        self.pending.iter()
    }

    /// Number of queued entities.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // ===== Lookup =====

    /// Live entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable live entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Whether `id` is live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live IDs in iteration order, collected so the caller may mutate
    /// entities while walking them.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Live entities in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Calls `f` on every live entity in iteration order.
    ///
    /// For hosts that edit entities between ticks (damage, retargeting).
    /// The tick loop itself walks [`ids`](Self::ids) because each update
    /// also reads other entities' positions.
    pub fn for_each_live(&mut self, mut f: impl FnMut(&mut Entity)) {
        for entity in self.entities.values_mut() {
            f(entity);
        }
    }

    /// Position and velocity of a live entity that is not being disposed.
    ///
    /// Stale references resolve to `None`.
    #[must_use]
    pub fn target_info(&self, id: EntityId) -> Option<TargetInfo> {
        self.entities
            .get(&id)
            .filter(|entity| !entity.is_ready_to_dispose())
            .map(|entity| TargetInfo {
                position: entity.body().position,
                velocity: entity.body().velocity,
            })
    }

    // ===== Disposal =====

    /// Removes every flagged entity.
    ///
    /// Frag-capable entities burst into fragments (queued for the next
    /// tick). Entities with trails leave an [`Explosion`] that takes
    /// ownership of the trails.
    ///
    /// # Errors
    ///
    /// Propagates a fragmentation failure; see
    /// [`fragmentation::cascade`].
    pub fn sweep_disposed<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
        effects: &mut Vec<Explosion>,
    ) -> Result<SweepReport> {
        let flagged: Vec<EntityId> = self
            .entities
            .values()
            .filter(|entity| entity.is_ready_to_dispose())
            .map(Entity::id)
            .collect();

        let mut report = SweepReport::default();
        for id in flagged {
            let Some(mut entity) = self.entities.remove(&id) else {
                continue;
            };

            if let Some(config) = entity.fragmentation {
                let shaped = entity.fuze.as_ref().is_some_and(|fuze| fuze.is_shaped());
                let cascade = fragmentation::cascade(&entity, &config, shaped, &mut *rng, self)?;
                report.spawned += cascade.fragments.len() + 1;
            }

            let trails = entity.take_trails();
            if !trails.is_empty() {
                let radius = entity
                    .as_warhead()
                    .map_or(entity.body().radius() * 2.0, |w| w.explosion_radius);
                effects.push(Explosion::new(id, entity.body().position, radius, trails));
            }

            if let Some(fuze) = entity.fuze.as_mut() {
                fuze.mark_disposed();
            }
            trace!(entity = %id, tags = ?entity.tags(), "disposed");
            report.disposed.push(id);
        }
        Ok(report)
    }
}
