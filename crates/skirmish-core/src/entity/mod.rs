//! Entities and their capabilities.
//!
//! There is one entity record. What an entity *does* is decided by which
//! optional capabilities it carries, not by a type hierarchy:
//!
//! - every entity has a [`Body`] (kinematics) and [`Health`]
//! - a [`Drive`] makes it self-propelled and guided
//! - a [`Warhead`] makes it a projectile (damage, TTL)
//! - a [`Fuze`] adds proximity self-destruct logic
//! - a [`FragmentationConfig`] makes it burst into fragments on disposal
//!
//! [`EntityTags`] are descriptive categories (ship, missile, fragment, ...)
//! used for behaviour such as ship auto-repair and by renderers.
//!
//! Entities are built with [`EntityBuilder`], which validates every
//! capability, and are then handed to the
//! [`Registry`](crate::registry::Registry).
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::config::{BodyConfig, DriveConfig};
//! use skirmish_core::entity::{Entity, EntityTags};
//!
//! let ship = Entity::builder(EntityTags::SHIP, BodyConfig::default())
//!     .at(Vec2::new(10.0, 0.0))
//!     .drive(DriveConfig::default())
//!     .build()
//!     .unwrap();
//!
//! assert!(ship.is_driven());
//! assert!(ship.tags().contains(EntityTags::SHIP));
//! ```

mod builder;
pub mod components;

use std::fmt;
use std::mem;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::{BodyConfig, FragmentationConfig};
use crate::fuze::Fuze;
use crate::trail::Trail;

pub use builder::EntityBuilder;
pub use components::{Body, Drive, Health, Warhead};

/// Unique identifier for an entity.
///
/// Assigned by the [`Registry`](crate::registry::Registry) when an entity is
/// added. IDs increase monotonically, so ID order is insertion order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Placeholder carried by entities not yet added to a registry.
    pub const UNASSIGNED: Self = Self(u64::MAX);

    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Whether this ID was assigned by a registry.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != u64::MAX
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

bitflags! {
    /// Category tags used for behaviour selection and rendering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EntityTags: u8 {
        /// Crewed vessel; repairs itself over time.
        const SHIP = 1 << 0;
        /// Guided, self-propelled projectile.
        const MISSILE = 1 << 1;
        /// Sub-projectile produced by fragmentation.
        const FRAGMENT = 1 << 2;
        /// Missile that fragments on disposal.
        const FRAGMISSILE = 1 << 3;
        /// Spent body left behind by fragmentation.
        const CASING = 1 << 4;
    }
}

/// A simulated body plus its optional capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) tags: EntityTags,
    pub(crate) body: Body,
    pub(crate) health: Health,
    pub(crate) owner: Option<EntityId>,
    pub(crate) ready_to_dispose: bool,
    pub(crate) drive: Option<Drive>,
    pub(crate) warhead: Option<Warhead>,
    pub(crate) fuze: Option<Fuze>,
    pub(crate) fragmentation: Option<FragmentationConfig>,
    pub(crate) trails: Vec<Trail>,
}

impl Entity {
    /// Starts building an entity with the given tags and body.
    pub fn builder(tags: EntityTags, body: BodyConfig) -> EntityBuilder {
        EntityBuilder::new(tags, body)
    }

    /// Registry-assigned ID, or [`EntityId::UNASSIGNED`] before insertion.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Category tags.
    #[must_use]
    pub const fn tags(&self) -> EntityTags {
        self.tags
    }

    /// Kinematic state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable kinematic state.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Current and maximum health.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Entity credited with this one's damage, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Whether the entity is waiting for the disposal sweep.
    #[must_use]
    pub const fn is_ready_to_dispose(&self) -> bool {
        self.ready_to_dispose
    }

    /// Flags the entity for removal by the next sweep.
    pub fn mark_for_disposal(&mut self) {
        self.ready_to_dispose = true;
    }

    /// Returns `true` if the entity has a drive.
    #[must_use]
    pub const fn is_driven(&self) -> bool {
        self.drive.is_some()
    }

    /// Returns `true` if the entity fragments on disposal.
    #[must_use]
    pub const fn is_frag_capable(&self) -> bool {
        self.fragmentation.is_some()
    }

    /// Drive capability, if present.
    #[must_use]
    pub const fn as_drive(&self) -> Option<&Drive> {
        self.drive.as_ref()
    }

    /// Mutable drive capability, if present.
    #[must_use]
    pub fn as_drive_mut(&mut self) -> Option<&mut Drive> {
        self.drive.as_mut()
    }

    /// Warhead capability, if present.
    #[must_use]
    pub const fn as_warhead(&self) -> Option<&Warhead> {
        self.warhead.as_ref()
    }

    /// Fuze capability, if present.
    #[must_use]
    pub const fn as_fuze(&self) -> Option<&Fuze> {
        self.fuze.as_ref()
    }

    /// Fragmentation tuning, if frag-capable.
    #[must_use]
    pub const fn fragmentation(&self) -> Option<&FragmentationConfig> {
        self.fragmentation.as_ref()
    }

    /// The entity's trails.
    #[must_use]
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Current target of the drive, if any.
    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        self.drive.as_ref().and_then(|d| d.target)
    }

    /// Points the drive at a new target. No-op without a drive.
    pub fn set_target(&mut self, target: Option<EntityId>) {
        if let Some(drive) = self.drive.as_mut() {
            drive.target = target;
        }
    }

    /// Applies damage. Health may drop below zero; the next state
    /// evaluation marks the entity for disposal.
    pub fn apply_damage(&mut self, amount: f32) {
        self.health.current -= amount.max(0.0);
    }

    /// Moves the trails out, leaving the entity with none.
    ///
    /// Used when an explosion takes over the smoke of a dying entity; the
    /// returned trails are the only copy.
    pub fn take_trails(&mut self) -> Vec<Trail> {
        mem::take(&mut self.trails)
    }
}
