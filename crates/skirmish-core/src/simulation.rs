//! Simulation driver with the fixed-phase tick loop.
//!
//! Each call to [`Simulation::step`] runs one synchronous pass:
//!
//! 1. **PROMOTE**: entities queued since the last tick become live
//! 2. **UPDATE**: every live entity, in insertion order, is advanced:
//!    guidance → integration → trails → repair → fuze → expiry checks.
//!    Entities are only *flagged* for disposal here.
//! 3. **EFFECTS**: explosions age their inherited trails; finished ones are
//!    dropped
//! 4. **SWEEP**: flagged entities are removed; fragmentation queues new
//!    entities for the next tick
//!
//! # Determinism
//!
//! Given the same seed, the same spawns and the same sequence of calls, a
//! simulation replays identically within one process. Iteration follows
//! entity ID order and all randomness goes through the injected
//! [`RandomSource`].
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::entity::EntityBuilder;
//! use skirmish_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(42);
//!
//! let ship = sim.spawn(EntityBuilder::ship().at(Vec2::new(1000.0, 0.0)).build().unwrap());
//! sim.spawn(EntityBuilder::frag_missile().target(ship).build().unwrap());
//!
//! for _ in 0..10 {
//!     sim.step().unwrap();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! ```

use glam::Vec2;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::effects::Explosion;
use crate::entity::{Entity, EntityId, EntityTags};
use crate::error::Result;
use crate::fuze::FuzeReading;
use crate::guidance::{self, TargetInfo};
use crate::physics;
use crate::random::{RandomSource, SimRng};
use crate::registry::Registry;
use crate::snapshot::WorldSnapshot;
use crate::trail::TrailKind;

// =============================================================================
// Simulation
// =============================================================================

/// Owns the registry, the live effects and the random source.
#[derive(Debug, Clone)]
pub struct Simulation<R: RandomSource = SimRng> {
    config: SimulationConfig,
    registry: Registry,
    effects: Vec<Explosion>,
    rng: R,
    tick: u64,
}

impl Simulation<SimRng> {
    /// Creates a simulation with default settings and the given seed.
    ///
    /// ```
    /// use skirmish_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(12345);
    /// assert_eq!(sim.tick(), 0);
    /// assert_eq!(sim.seed(), 12345);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let config = SimulationConfig::with_seed(seed);
        Self::from_parts(config, SimRng::new(seed))
    }

    /// Creates a simulation from a config, seeding [`SimRng`] from it.
    ///
    /// # Errors
    ///
    /// Propagates [`SimulationConfig::validate`].
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        Self::with_random(config, SimRng::new(config.seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Creates a simulation with an injected random source.
    ///
    /// # Errors
    ///
    /// Propagates [`SimulationConfig::validate`].
    pub fn with_random(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, rng))
    }

    fn from_parts(config: SimulationConfig, rng: R) -> Self {
        info!(seed = config.seed, dt = config.dt, "simulation created");
        Self {
            config,
            registry: Registry::new(),
            effects: Vec::new(),
            rng,
            tick: 0,
        }
    }

    // ===== Accessors =====

    /// World settings.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Seed recorded in the config.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Ticks completed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The entity registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry, e.g. to retarget or damage entities
    /// between ticks.
    #[must_use]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Live explosions.
    #[must_use]
    pub fn effects(&self) -> &[Explosion] {
        &self.effects
    }

    /// Read-only view of the world for a renderer.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self.tick, &self.registry, &self.effects)
    }

    // ===== Stepping =====

    /// Queues an entity; it becomes live at the start of the next step.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.registry.add(entity)
    }

    /// Runs one tick.
    ///
    /// # Errors
    ///
    /// Only fails if fragmentation cannot build its entities, which means a
    /// body's state has gone non-finite. The tick is not rolled back.
    pub fn step(&mut self) -> Result<()> {
        // PHASE 1: PROMOTE
        let promoted = self.registry.promote_pending();

        // PHASE 2: UPDATE
        let dt = self.config.dt;
        for id in self.registry.ids() {
            let Some(entity) = self.registry.get(id) else {
                continue;
            };
            let target = entity
                .target()
                .and_then(|target| self.registry.target_info(target));
            let owner_position = entity
                .owner()
                .and_then(|owner| self.registry.target_info(owner))
                .map(|owner| owner.position);

            if let Some(entity) = self.registry.get_mut(id) {
                advance(entity, target, owner_position, &self.config, dt);
            }
        }

        // PHASE 3: EFFECTS
        for explosion in &mut self.effects {
            explosion.update(dt);
        }
        self.effects.retain(|explosion| !explosion.is_finished());

        // PHASE 4: SWEEP
        let report = self
            .registry
            .sweep_disposed(&mut self.rng, &mut self.effects)?;

        debug!(
            tick = self.tick,
            promoted,
            live = self.registry.len(),
            disposed = report.disposed.len(),
            spawned = report.spawned,
            "tick complete"
        );
        self.tick += 1;
        Ok(())
    }

    /// Runs `ticks` steps.
    ///
    /// # Errors
    ///
    /// Stops at the first failing [`step`](Self::step).
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }
}

/// Advances one entity through guidance, integration, trails, repair and
/// fuze evaluation, flagging it for disposal when it is done.
fn advance(
    entity: &mut Entity,
    target: Option<TargetInfo>,
    owner_position: Option<Vec2>,
    config: &SimulationConfig,
    dt: f32,
) {
    // Guidance
    if let Some(drive) = entity.drive.as_mut() {
        if target.is_none() {
            drive.target = None;
        }
        let band = entity.fuze.as_ref().map(|fuze| fuze.terminal_band());
        guidance::guide(&mut entity.body, drive, target, band, dt);
    }

    // Integration
    physics::integrate(&mut entity.body, dt);

    // Trails
    let throttle_fraction = entity.drive.as_ref().map_or(0.0, |d| d.throttle_fraction());
    let body = &entity.body;
    for trail in &mut entity.trails {
        let anchor = body.trail_anchor(trail.config().anchor_offset);
        trail.set_anchor(anchor, body.heading, body.velocity);
        trail.update(dt);
        match trail.kind() {
            TrailKind::Engine if throttle_fraction > 0.0 => {
                trail.emit(throttle_fraction);
            }
            TrailKind::DamageBurn if entity.health.is_damaged() => {
                trail.emit(entity.health.damage_fraction());
            }
            TrailKind::Debris => {
                trail.emit(1.0);
            }
            _ => {}
        }
    }

    // Repair
    if entity.tags.contains(EntityTags::SHIP) {
        entity.health.repair(config.repair_rate);
    }

    // Fuze
    if let Some(fuze) = entity.fuze.as_mut() {
        let position = entity.body.position;
        let reading = FuzeReading {
            target_distance: target.map(|t| position.distance(t.position)),
            owner_distance: owner_position.map(|o| position.distance(o)),
            fuel: entity.drive.as_ref().map_or(0.0, |d| d.fuel),
        };
        if let Some(cause) = fuze.evaluate(reading) {
            debug!(entity = %entity.id, ?cause, shaped = fuze.is_shaped(), "detonating");
            entity.ready_to_dispose = true;
        }
    }

    // Expiry
    if let Some(warhead) = entity.warhead.as_mut() {
        if warhead.tick_ttl() {
            entity.ready_to_dispose = true;
        }
    }
    if entity.health.is_depleted() {
        entity.ready_to_dispose = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BodyConfig, DriveConfig, FuzeConfig};
    use crate::entity::EntityBuilder;
    use crate::fuze::{DetonationCause, FuzeState};

    fn sim() -> Simulation {
        Simulation::new(7)
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_simulation_is_empty() {
            let sim = sim();
            assert_eq!(sim.tick(), 0);
            assert!(sim.registry().is_empty());
            assert!(sim.effects().is_empty());
        }

        #[test]
        fn spawned_entities_go_live_on_next_step() {
            let mut sim = sim();
            let id = sim.spawn(EntityBuilder::ship().build().unwrap());
            assert!(!sim.registry().contains(id));
            sim.step().unwrap();
            assert!(sim.registry().contains(id));
            assert_eq!(sim.tick(), 1);
        }

        #[test]
        fn invalid_config_is_rejected() {
            let result = Simulation::with_config(SimulationConfig {
                dt: -1.0,
                ..SimulationConfig::default()
            });
            assert!(result.is_err());
        }

        #[test]
        fn run_advances_ticks() {
            let mut sim = sim();
            sim.run(25).unwrap();
            assert_eq!(sim.tick(), 25);
        }
    }

    mod behaviour_tests {
        use super::*;

        #[test]
        fn ship_repairs_over_time() {
            let mut sim = sim();
            let mut ship = EntityBuilder::ship().build().unwrap();
            ship.apply_damage(0.5);
            let id = sim.spawn(ship);
            sim.run(10).unwrap();
            let health = sim.registry().get(id).unwrap().health().current;
            assert!((health - 0.51).abs() < 1e-4);
        }

        #[test]
        fn missile_losing_target_drops_reference() {
            let mut sim = sim();
            let ship = sim.spawn(EntityBuilder::ship().at(Vec2::new(5000.0, 0.0)).build().unwrap());
            let missile = sim.spawn(
                EntityBuilder::new(EntityTags::MISSILE, BodyConfig::default())
                    .drive(DriveConfig::default())
                    .target(ship)
                    .build()
                    .unwrap(),
            );
            sim.step().unwrap();
            sim.registry_mut().get_mut(ship).unwrap().mark_for_disposal();
            sim.step().unwrap();
            sim.step().unwrap();

            let m = sim.registry().get(missile).unwrap();
            assert_eq!(m.target(), None);
            assert_eq!(m.as_drive().unwrap().throttle(), 0.0);
        }

        #[test]
        fn fuze_detonates_and_frees_entity() {
            let mut sim = sim();
            let missile = sim.spawn(
                EntityBuilder::new(EntityTags::MISSILE, BodyConfig::default())
                    .drive(DriveConfig {
                        max_fuel: 0.0,
                        ..DriveConfig::default()
                    })
                    .fuze(FuzeConfig::default())
                    .build()
                    .unwrap(),
            );
            sim.step().unwrap();
            assert!(!sim.registry().contains(missile));
            assert_eq!(sim.effects().len(), 1);
        }

        #[test]
        fn fuze_cause_is_recorded_before_sweep() {
            let mut entity = EntityBuilder::new(EntityTags::MISSILE, BodyConfig::default())
                .drive(DriveConfig {
                    max_fuel: 0.0,
                    ..DriveConfig::default()
                })
                .fuze(FuzeConfig::default())
                .build()
                .unwrap();
            advance(&mut entity, None, None, &SimulationConfig::default(), 1.0 / 60.0);
            let fuze = entity.as_fuze().unwrap();
            assert_eq!(fuze.state(), FuzeState::Detonating);
            assert_eq!(fuze.cause(), Some(DetonationCause::NoFuel));
            assert!(entity.is_ready_to_dispose());
        }

        #[test]
        fn engine_trail_follows_thrust() {
            let mut sim = sim();
            let target = sim.spawn(
                EntityBuilder::ship()
                    .at(Vec2::new(5000.0, 0.0))
                    .build()
                    .unwrap(),
            );
            let missile = sim.spawn(EntityBuilder::frag_missile().target(target).build().unwrap());
            sim.run(3).unwrap();
            let m = sim.registry().get(missile).unwrap();
            let engine = &m.trails()[0];
            assert_eq!(engine.kind(), TrailKind::Engine);
            assert_eq!(engine.len(), 3);
            assert!(engine.particles().all(|p| p.intensity == 1.0));
        }
    }
}
