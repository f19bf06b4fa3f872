//! Component structs attached to an [`Entity`](super::Entity).
//!
//! [`Body`] and [`Health`] are always present. [`Drive`] and [`Warhead`] are
//! optional capabilities; their presence decides which per-tick behaviours
//! run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{BodyConfig, DriveConfig, WarheadConfig};
use crate::entity::EntityId;
use crate::error::{ensure_finite, Result};
use crate::guidance::GuidanceStrategy;

// =============================================================================
// Body
// =============================================================================

/// Kinematic state plus the per-tick force accumulator.
///
/// Mass is fixed at construction and always strictly positive. The force
/// accumulator is private: forces go in through [`Body::apply_force`] and
/// only the integrator drains it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World position.
    pub position: Vec2,
    /// World velocity.
    pub velocity: Vec2,
    /// Acceleration from the last integration.
    pub acceleration: Vec2,
    /// Unit heading vector.
    pub heading: Vec2,
    mass: f32,
    radius: f32,
    force: Vec2,
}

impl Body {
    /// Creates a body at rest at the origin, heading along +X.
    ///
    /// # Errors
    ///
    /// Propagates [`BodyConfig::validate`].
    pub fn new(config: &BodyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            heading: Vec2::X,
            mass: config.mass,
            radius: config.radius,
            force: Vec2::ZERO,
        })
    }

    /// Mass, always `> 0`.
    #[must_use]
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    /// Radius.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Force accumulated since the last integration.
    #[must_use]
    pub const fn force(&self) -> Vec2 {
        self.force
    }

    /// Adds a force to the accumulator. Calls within a tick sum linearly.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Heading as an angle in radians, `(-π, π]`.
    #[must_use]
    pub fn heading_angle(&self) -> f32 {
        self.heading.y.atan2(self.heading.x)
    }

    /// Sets the heading from an angle in radians.
    pub fn set_heading_angle(&mut self, angle: f32) {
        self.heading = Vec2::from_angle(angle);
    }

    /// Point `offset` radii behind the body centre, where trails attach.
    #[must_use]
    pub fn trail_anchor(&self, offset: f32) -> Vec2 {
        self.position - self.heading * self.radius * offset
    }

    /// Drains the accumulator, leaving it at exactly zero.
    pub(crate) fn take_force(&mut self) -> Vec2 {
        std::mem::take(&mut self.force)
    }

    /// Rejects a non-finite spawn state.
    pub(crate) fn validate_state(&self) -> Result<()> {
        ensure_finite("position.x", self.position.x)?;
        ensure_finite("position.y", self.position.y)?;
        ensure_finite("velocity.x", self.velocity.x)?;
        ensure_finite("velocity.y", self.velocity.y)
    }
}

// =============================================================================
// Health
// =============================================================================

/// Current and maximum health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    /// Current health; the entity is disposed once this reaches zero.
    pub current: f32,
    max: f32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// `current / max`, clamped to `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    /// `(max - current) / max`, clamped to `[0, 1]`. Drives damage smoke.
    #[must_use]
    pub fn damage_fraction(&self) -> f32 {
        1.0 - self.fraction()
    }

    /// True once health has dropped to zero or below.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// True while below maximum.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.current < self.max
    }

    /// Regains `amount`, never exceeding the maximum.
    pub fn repair(&mut self, amount: f32) {
        if self.is_damaged() {
            self.current = (self.current + amount).min(self.max);
        }
    }
}

// =============================================================================
// Drive
// =============================================================================

/// Thruster, gyro and fuel tank.
///
/// The tank starts full and the throttle starts at maximum. `throttle` stays
/// within `[0, max_throttle]` and is exactly zero whenever the tank is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub(crate) config: DriveConfig,
    pub(crate) fuel: f32,
    pub(crate) throttle: f32,
    pub(crate) target: Option<EntityId>,
    pub(crate) guidance: Vec2,
}

impl Drive {
    /// Full tank, full throttle, no target. An empty tank starts with the
    /// throttle closed.
    ///
    /// # Errors
    ///
    /// Propagates [`DriveConfig::validate`].
    pub fn new(config: DriveConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fuel: config.max_fuel,
            throttle: if config.max_fuel > 0.0 {
                config.max_throttle
            } else {
                0.0
            },
            target: None,
            guidance: Vec2::ZERO,
        })
    }

    /// Drive tuning.
    #[must_use]
    pub const fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Aim-point strategy.
    #[must_use]
    pub const fn strategy(&self) -> GuidanceStrategy {
        self.config.strategy
    }

    /// Remaining fuel.
    #[must_use]
    pub const fn fuel(&self) -> f32 {
        self.fuel
    }

    /// True once the tank is empty.
    #[must_use]
    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }

    /// Current thrust force magnitude.
    #[must_use]
    pub const fn throttle(&self) -> f32 {
        self.throttle
    }

    /// `throttle / max_throttle`, in `[0, 1]`.
    #[must_use]
    pub fn throttle_fraction(&self) -> f32 {
        self.throttle / self.config.max_throttle
    }

    /// Current target.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Desired heading from the last guidance pass; zero means no active
    /// guidance.
    #[must_use]
    pub const fn guidance(&self) -> Vec2 {
        self.guidance
    }
}

// =============================================================================
// Warhead
// =============================================================================

/// Damage payload and time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Warhead {
    /// Damage dealt on hit.
    pub damage: f32,
    /// Armour penetration.
    pub penetration: f32,
    /// Blast radius.
    pub explosion_radius: f32,
    pub(crate) ttl: Option<u32>,
}

impl Warhead {
    /// Builds a warhead for a body of `radius`.
    ///
    /// The blast radius defaults to twice the body radius.
    ///
    /// # Errors
    ///
    /// Propagates [`WarheadConfig::validate`].
    pub fn new(config: &WarheadConfig, radius: f32) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            damage: config.damage,
            penetration: config.penetration,
            explosion_radius: config.explosion_radius.unwrap_or(2.0 * radius),
            ttl: config.ttl,
        })
    }

    /// Ticks left before expiry; `None` never expires.
    #[must_use]
    pub const fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    /// Counts one tick down. Returns `true` when the TTL has just run out.
    pub(crate) fn tick_ttl(&mut self) -> bool {
        match self.ttl.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    mod body_tests {
        use super::*;

        #[test]
        fn new_body_is_at_rest() {
            let body = Body::new(&BodyConfig::default()).unwrap();
            assert_eq!(body.position, Vec2::ZERO);
            assert_eq!(body.velocity, Vec2::ZERO);
            assert_eq!(body.heading, Vec2::X);
            assert_eq!(body.force(), Vec2::ZERO);
        }

        #[test]
        fn zero_mass_is_rejected() {
            let result = Body::new(&BodyConfig {
                mass: 0.0,
                ..BodyConfig::default()
            });
            assert_eq!(result, Err(ConfigError::NonPositiveMass(0.0)));
        }

        #[test]
        fn forces_sum_linearly() {
            let mut body = Body::new(&BodyConfig::default()).unwrap();
            body.apply_force(Vec2::new(1.0, 2.0));
            body.apply_force(Vec2::new(-3.0, 0.5));
            assert_eq!(body.force(), Vec2::new(-2.0, 2.5));
        }

        #[test]
        fn take_force_clears_accumulator() {
            let mut body = Body::new(&BodyConfig::default()).unwrap();
            body.apply_force(Vec2::new(4.0, 0.0));
            assert_eq!(body.take_force(), Vec2::new(4.0, 0.0));
            assert_eq!(body.force(), Vec2::ZERO);
        }

        #[test]
        fn heading_angle_roundtrip() {
            let mut body = Body::new(&BodyConfig::default()).unwrap();
            body.set_heading_angle(1.0);
            assert!((body.heading_angle() - 1.0).abs() < 1e-6);
            assert!((body.heading.length() - 1.0).abs() < 1e-6);
        }
    }

    mod health_tests {
        use super::*;

        #[test]
        fn fractions() {
            let mut health = Health::new(2.0);
            assert_eq!(health.fraction(), 1.0);
            assert_eq!(health.damage_fraction(), 0.0);
            health.current = 0.5;
            assert!((health.fraction() - 0.25).abs() < 1e-6);
            assert!((health.damage_fraction() - 0.75).abs() < 1e-6);
            health.current = -1.0;
            assert_eq!(health.fraction(), 0.0);
            assert!(health.is_depleted());
        }

        #[test]
        fn repair_caps_at_max() {
            let mut health = Health::new(1.0);
            health.current = 0.9995;
            health.repair(0.001);
            assert_eq!(health.current, 1.0);
            health.repair(0.001);
            assert_eq!(health.current, 1.0);
        }
    }

    mod drive_tests {
        use super::*;

        #[test]
        fn starts_full() {
            let drive = Drive::new(DriveConfig::frag_missile()).unwrap();
            assert_eq!(drive.fuel(), 5.0);
            assert_eq!(drive.throttle(), 600.0);
            assert_eq!(drive.throttle_fraction(), 1.0);
            assert_eq!(drive.target(), None);
            assert_eq!(drive.guidance(), Vec2::ZERO);
        }

        #[test]
        fn empty_tank_starts_with_throttle_closed() {
            let drive = Drive::new(DriveConfig {
                max_fuel: 0.0,
                ..DriveConfig::frag_missile()
            })
            .unwrap();
            assert_eq!(drive.fuel(), 0.0);
            assert!(drive.is_out_of_fuel());
            assert_eq!(drive.throttle(), 0.0);
            assert_eq!(drive.throttle_fraction(), 0.0);
        }

        #[test]
        fn zero_max_throttle_is_rejected() {
            let result = Drive::new(DriveConfig {
                max_throttle: 0.0,
                ..DriveConfig::default()
            });
            assert_eq!(result, Err(ConfigError::NonPositiveMaxThrottle(0.0)));
        }
    }

    mod warhead_tests {
        use super::*;

        #[test]
        fn explosion_radius_defaults_to_twice_body_radius() {
            let warhead = Warhead::new(&WarheadConfig::default(), 5.0).unwrap();
            assert_eq!(warhead.explosion_radius, 10.0);

            let explicit = Warhead::new(
                &WarheadConfig {
                    explosion_radius: Some(1.0),
                    ..WarheadConfig::default()
                },
                5.0,
            )
            .unwrap();
            assert_eq!(explicit.explosion_radius, 1.0);
        }

        #[test]
        fn ttl_counts_down_to_expiry() {
            let mut warhead = Warhead::new(
                &WarheadConfig {
                    ttl: Some(2),
                    ..WarheadConfig::default()
                },
                1.0,
            )
            .unwrap();
            assert!(!warhead.tick_ttl());
            assert!(warhead.tick_ttl());
            assert_eq!(warhead.ttl(), Some(0));
        }

        #[test]
        fn no_ttl_never_expires() {
            let mut warhead = Warhead::new(&WarheadConfig::default(), 1.0).unwrap();
            for _ in 0..1000 {
                assert!(!warhead.tick_ttl());
            }
        }
    }
}
