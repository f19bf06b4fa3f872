//! # Skirmish Core
//!
//! Simulation core for 2-D space combat: thrust-driven bodies, homing
//! missiles with finite fuel, proximity fuzes and fragmentation warheads.
//!
//! Rendering, input and audio live outside this crate. They consume the
//! read-only [`WorldSnapshot`] produced each tick.
//!
//! ## Architecture
//!
//! - **Entities** are one record with optional capabilities (drive, warhead,
//!   fuze, fragmentation) instead of a type hierarchy. See [`entity`].
//! - **Guidance** turns a drive toward its aim point under a per-tick
//!   rotation clamp and burns fuel. See [`guidance`].
//! - **Physics** integrates accumulated forces with a fixed timestep. See
//!   [`physics`].
//! - **Fuze** decides when a guided projectile self-destructs. See [`fuze`].
//! - **Fragmentation** bursts a disposed projectile into a momentum-
//!   conserving fragment swarm. See [`fragmentation`].
//! - **Registry** owns entities, defers spawns to the next tick and sweeps
//!   disposals. See [`registry`].
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::{EntityBuilder, Simulation};
//!
//! let mut sim = Simulation::new(7);
//! let ship = sim.spawn(EntityBuilder::ship().at(Vec2::new(800.0, 300.0)).build()?);
//! sim.spawn(EntityBuilder::frag_missile().target(ship).build()?);
//!
//! sim.run(60)?;
//! let frame = sim.snapshot();
//! assert_eq!(frame.tick, 60);
//! # Ok::<(), skirmish_core::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod effects;
pub mod entity;
pub mod error;
pub mod fragmentation;
pub mod fuze;
pub mod guidance;
pub mod physics;
pub mod random;
pub mod registry;
pub mod simulation;
pub mod snapshot;
pub mod trail;

#[cfg(test)]
mod tests;

pub use config::{SimulationConfig, FIXED_DT};
pub use entity::{Entity, EntityBuilder, EntityId, EntityTags};
pub use error::{ConfigError, Result};
pub use random::{RandomSource, SimRng};
pub use registry::Registry;
pub use simulation::Simulation;
pub use snapshot::WorldSnapshot;
