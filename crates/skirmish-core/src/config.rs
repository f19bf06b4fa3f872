//! Tuning configuration for bodies, drives, warheads, fuzes and trails.
//!
//! Every struct is plain data with a [`Default`] matching the stock frag
//! missile loadout, and derives serde so a host can load it from whatever
//! document format it prefers. Missing fields fall back to their defaults.
//!
//! Values are checked by `validate()`; entity construction and
//! [`Simulation::with_config`](crate::simulation::Simulation::with_config)
//! call it for you.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, ConfigError, Result};
use crate::guidance::GuidanceStrategy;

/// Fixed simulation timestep (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

// =============================================================================
// Body
// =============================================================================

/// Physical properties shared by every simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Mass; must be strictly positive.
    pub mass: f32,
    /// Collision/visual radius.
    pub radius: f32,
    /// Maximum (and initial) health.
    pub max_health: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 10.0,
            max_health: 1.0,
        }
    }
}

impl BodyConfig {
    /// Checks mass, radius and health bounds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonPositiveMass`] for `mass <= 0`, and the generic
    /// range errors for a negative radius or non-positive health.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("mass", self.mass)?;
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        ensure_non_negative("radius", self.radius)?;
        ensure_positive("max_health", self.max_health)
    }
}

// =============================================================================
// Trails
// =============================================================================

/// Particle trail tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Lifetime of each particle in ticks.
    pub lifetime: u32,
    /// Maximum live particles; the oldest is retired when full.
    pub capacity: usize,
    /// Static particles stay where they were emitted.
    pub is_static: bool,
    /// Anchor distance behind the body centre, in body radii.
    pub anchor_offset: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            lifetime: 50,
            capacity: 256,
            is_static: false,
            anchor_offset: 0.0,
        }
    }
}

impl TrailConfig {
    /// Exhaust plume drifting behind the nozzle.
    #[must_use]
    pub fn engine() -> Self {
        Self {
            anchor_offset: 1.7,
            ..Self::default()
        }
    }

    /// Smoke left in place by a damaged hull.
    #[must_use]
    pub fn damage_burn() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    /// Smoke shed by a spent casing.
    #[must_use]
    pub fn debris() -> Self {
        Self {
            lifetime: 100,
            is_static: true,
            ..Self::default()
        }
    }

    /// Checks lifetime, capacity and offset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroCount`] for a zero lifetime or capacity.
    pub fn validate(&self) -> Result<()> {
        if self.lifetime == 0 {
            return Err(ConfigError::ZeroCount("trail lifetime"));
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCount("trail capacity"));
        }
        ensure_non_negative("anchor_offset", self.anchor_offset)
    }
}

// =============================================================================
// Drive
// =============================================================================

/// Thruster, gyro and fuel tank of a self-propelled body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Tank capacity; the tank starts full.
    pub max_fuel: f32,
    /// Fuel burned per unit time at full throttle.
    pub fuel_consumption: f32,
    /// Maximum thrust force; the throttle starts here.
    pub max_throttle: f32,
    /// Maximum heading change per tick, in radians.
    pub max_rotation_speed: f32,
    /// Distance below which thrust is cut. `None` uses the body radius.
    pub throttle_cutoff: Option<f32>,
    /// How the aim point is chosen.
    pub strategy: GuidanceStrategy,
    /// Exhaust trail tuning.
    pub engine_trail: TrailConfig,
    /// Damage smoke tuning.
    pub damage_trail: TrailConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_fuel: 100_000.0,
            fuel_consumption: 1.0,
            max_throttle: 50.0,
            max_rotation_speed: 0.05,
            throttle_cutoff: None,
            strategy: GuidanceStrategy::DirectPursuit,
            engine_trail: TrailConfig::engine(),
            damage_trail: TrailConfig::damage_burn(),
        }
    }
}

impl DriveConfig {
    /// Short-burn, high-thrust drive of a frag missile.
    #[must_use]
    pub fn frag_missile() -> Self {
        Self {
            max_fuel: 5.0,
            max_throttle: 600.0,
            ..Self::default()
        }
    }

    /// Checks thrust, fuel and rotation bounds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonPositiveMaxThrottle`] for `max_throttle <= 0`, and
    /// range errors for negative fuel, consumption, rotation or cut-off.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("max_throttle", self.max_throttle)?;
        if self.max_throttle <= 0.0 {
            return Err(ConfigError::NonPositiveMaxThrottle(self.max_throttle));
        }
        ensure_non_negative("max_fuel", self.max_fuel)?;
        ensure_non_negative("fuel_consumption", self.fuel_consumption)?;
        ensure_non_negative("max_rotation_speed", self.max_rotation_speed)?;
        if let Some(cutoff) = self.throttle_cutoff {
            ensure_non_negative("throttle_cutoff", cutoff)?;
        }
        self.engine_trail.validate()?;
        self.damage_trail.validate()
    }
}

// =============================================================================
// Warhead
// =============================================================================

/// Damage payload and lifetime of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarheadConfig {
    /// Damage dealt on hit.
    pub damage: f32,
    /// Armour penetration.
    pub penetration: f32,
    /// Blast radius. `None` uses twice the body radius.
    pub explosion_radius: Option<f32>,
    /// Ticks until automatic expiry. `None` never expires.
    pub ttl: Option<u32>,
}

impl Default for WarheadConfig {
    fn default() -> Self {
        Self {
            damage: 0.5,
            penetration: 1.0,
            explosion_radius: None,
            ttl: None,
        }
    }
}

impl WarheadConfig {
    /// Frag missile payload. Self-destructs after 20 seconds of flight so an
    /// untargeted or coasting missile still bursts.
    #[must_use]
    pub fn frag_missile() -> Self {
        Self {
            ttl: Some(1200),
            ..Self::default()
        }
    }

    /// Checks damage and radius bounds.
    ///
    /// # Errors
    ///
    /// Range errors for negative values, [`ConfigError::ZeroCount`] for a
    /// zero TTL.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("damage", self.damage)?;
        ensure_non_negative("penetration", self.penetration)?;
        if let Some(radius) = self.explosion_radius {
            ensure_non_negative("explosion_radius", radius)?;
        }
        if self.ttl == Some(0) {
            return Err(ConfigError::ZeroCount("warhead ttl"));
        }
        Ok(())
    }
}

// =============================================================================
// Fuze
// =============================================================================

/// Proximity thresholds and self-destruct gates of a guided projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzeConfig {
    /// Leaving this radius after having closed inside it counts as a miss.
    pub miss_distance: f32,
    /// Distance at which shaped detonation may arm.
    pub min_distance: f32,
    /// Minimum distance from the launcher for a shaped detonation.
    pub safe_distance: f32,
    /// Detonate when a tracked target disappears.
    pub on_target_destroyed: bool,
    /// Detonate when the tank runs dry.
    pub on_no_fuel: bool,
    /// Detonate on a proximity miss.
    pub on_proximity_miss: bool,
}

impl Default for FuzeConfig {
    fn default() -> Self {
        Self {
            miss_distance: 300.0,
            min_distance: 100.0,
            safe_distance: 150.0,
            on_target_destroyed: true,
            on_no_fuel: true,
            on_proximity_miss: true,
        }
    }
}

impl FuzeConfig {
    /// Checks that the distances describe a working fuze.
    ///
    /// # Errors
    ///
    /// Range errors for negative distances, [`ConfigError::FuzeDistances`]
    /// when `min_distance > miss_distance`.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("miss_distance", self.miss_distance)?;
        ensure_non_negative("min_distance", self.min_distance)?;
        ensure_non_negative("safe_distance", self.safe_distance)?;
        if self.min_distance > self.miss_distance {
            return Err(ConfigError::FuzeDistances {
                min: self.min_distance,
                miss: self.miss_distance,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Fragmentation
// =============================================================================

/// Half-open tick range `[min, max)` sampled for fragment lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlRange {
    /// Inclusive lower bound.
    pub min: u32,
    /// Exclusive upper bound.
    pub max: u32,
}

impl Default for TtlRange {
    fn default() -> Self {
        Self { min: 400, max: 600 }
    }
}

impl TtlRange {
    /// Checks the range is non-empty and starts above zero.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroCount`] for `min == 0`, [`ConfigError::EmptyRange`]
    /// for `min >= max`.
    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(ConfigError::ZeroCount("fragment ttl"));
        }
        if self.min >= self.max {
            return Err(ConfigError::EmptyRange {
                field: "fragment_ttl",
                low: i64::from(self.min),
                high: i64::from(self.max),
            });
        }
        Ok(())
    }
}

/// Body and warhead of a single fragment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Fragment body; its mass is also the casing's per-fragment unit mass.
    pub body: BodyConfig,
    /// Fragment payload.
    pub warhead: WarheadConfig,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            body: BodyConfig {
                mass: 0.001,
                radius: 1.0,
                max_health: 0.002,
            },
            warhead: WarheadConfig {
                damage: 0.015,
                penetration: 0.1,
                explosion_radius: Some(1.0),
                ttl: None,
            },
        }
    }
}

/// The spent body left behind after fragmentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasingConfig {
    /// Casing radius.
    pub radius: f32,
    /// Damage dealt by the casing on impact.
    pub damage: f32,
    /// Ticks until the casing expires.
    pub ttl: u32,
    /// Debris smoke tuning.
    pub trail: TrailConfig,
}

impl Default for CasingConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            damage: 1.0,
            ttl: 600,
            trail: TrailConfig::debris(),
        }
    }
}

/// Fragment swarm produced when a frag-capable projectile is disposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentationConfig {
    /// Number of fragments spawned.
    pub fragment_count: u32,
    /// Upper bound of the per-fragment impulse magnitude.
    pub power: f32,
    /// Lower bound of the impulse magnitude as a fraction of `power`.
    pub power_floor: f32,
    /// Half angle of the forward cone used by shaped detonations, radians.
    pub shaped_half_angle: f32,
    /// Fragment lifetime range in ticks.
    pub fragment_ttl: TtlRange,
    /// Per-fragment body and payload.
    pub fragment: FragmentConfig,
    /// Residual casing.
    pub casing: CasingConfig,
}

impl Default for FragmentationConfig {
    fn default() -> Self {
        Self {
            fragment_count: 500,
            power: 20.0,
            power_floor: 0.9,
            shaped_half_angle: FRAC_PI_4,
            fragment_ttl: TtlRange::default(),
            fragment: FragmentConfig::default(),
            casing: CasingConfig::default(),
        }
    }
}

impl FragmentationConfig {
    /// Checks power, spread and the fragment/casing blueprints.
    ///
    /// # Errors
    ///
    /// Any error from the nested configs, or range errors for a negative
    /// power, a floor outside `[0, 1]` or a negative cone angle.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("power", self.power)?;
        ensure_non_negative("power_floor", self.power_floor)?;
        if self.power_floor > 1.0 {
            return Err(ConfigError::ExceedsMaximum {
                field: "power_floor",
                value: self.power_floor,
                max: 1.0,
            });
        }
        ensure_non_negative("shaped_half_angle", self.shaped_half_angle)?;
        self.fragment_ttl.validate()?;
        self.fragment.body.validate()?;
        self.fragment.warhead.validate()?;
        ensure_non_negative("casing radius", self.casing.radius)?;
        ensure_non_negative("casing damage", self.casing.damage)?;
        if self.casing.ttl == 0 {
            return Err(ConfigError::ZeroCount("casing ttl"));
        }
        self.casing.trail.validate()
    }

    /// Mass of the residual casing: one fragment unit mass per fragment.
    ///
    /// Falls back to a single unit for a zero fragment count so the casing
    /// keeps a positive mass.
    #[must_use]
    pub fn casing_mass(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let count = self.fragment_count.max(1) as f32;
        count * self.fragment.body.mass
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// World-level settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Timestep passed to every integrator and guidance call.
    pub dt: f32,
    /// Seed of the default random source.
    pub seed: u64,
    /// Health regained per tick by damaged ships.
    pub repair_rate: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: FIXED_DT,
            seed: 0,
            repair_rate: 0.001,
        }
    }
}

impl SimulationConfig {
    /// Config with the given seed and defaults elsewhere.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Checks the timestep and repair rate.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonPositive`] for `dt <= 0`.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("dt", self.dt)?;
        ensure_non_negative("repair_rate", self.repair_rate)
    }
}
