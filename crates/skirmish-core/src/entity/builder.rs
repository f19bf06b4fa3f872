//! Validating constructor for [`Entity`].

use glam::Vec2;

use crate::config::{
    BodyConfig, DriveConfig, FragmentConfig, FragmentationConfig, FuzeConfig, TrailConfig,
    WarheadConfig,
};
use crate::entity::{Body, Drive, Entity, EntityId, EntityTags, Health, Warhead};
use crate::error::{ConfigError, Result};
use crate::fuze::Fuze;
use crate::trail::{Trail, TrailKind};

/// Builder for [`Entity`].
///
/// Nothing is validated until [`build`](Self::build), which checks every
/// attached capability and fails with the first [`ConfigError`].
///
/// A drive automatically brings an engine trail and a damage-smoke trail.
#[derive(Debug, Clone)]
#[must_use]
pub struct EntityBuilder {
    tags: EntityTags,
    body: BodyConfig,
    position: Vec2,
    velocity: Vec2,
    heading: Vec2,
    owner: Option<EntityId>,
    target: Option<EntityId>,
    drive: Option<DriveConfig>,
    warhead: Option<WarheadConfig>,
    fuze: Option<FuzeConfig>,
    fragmentation: Option<FragmentationConfig>,
    trails: Vec<(TrailKind, TrailConfig)>,
}

impl EntityBuilder {
    /// Starts a bare entity at rest at the origin, heading along +X.
    pub fn new(tags: EntityTags, body: BodyConfig) -> Self {
        Self {
            tags,
            body,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            heading: Vec2::X,
            owner: None,
            target: None,
            drive: None,
            warhead: None,
            fuze: None,
            fragmentation: None,
            trails: Vec::new(),
        }
    }

    // ===== Presets =====

    /// Crewed ship: default drive, repairs itself over time.
    pub fn ship() -> Self {
        Self::new(EntityTags::SHIP, BodyConfig::default()).drive(DriveConfig::default())
    }

    /// Guided missile that bursts into a fragment swarm when disposed.
    pub fn frag_missile() -> Self {
        Self::new(
            EntityTags::MISSILE | EntityTags::FRAGMISSILE,
            BodyConfig {
                mass: 1.0,
                radius: 5.0,
                max_health: 0.05,
            },
        )
        .drive(DriveConfig::frag_missile())
        .warhead(WarheadConfig::frag_missile())
        .fuze(FuzeConfig::default())
        .fragmentation(FragmentationConfig::default())
    }

    /// A single fragment that expires after `ttl` ticks.
    pub fn fragment(config: &FragmentConfig, ttl: u32) -> Self {
        Self::new(EntityTags::FRAGMENT, config.body).warhead(WarheadConfig {
            ttl: Some(ttl),
            ..config.warhead
        })
    }

    /// The spent body left after fragmentation, trailing debris smoke.
    pub fn casing(config: &FragmentationConfig) -> Self {
        Self::new(
            EntityTags::FRAGMENT | EntityTags::CASING,
            BodyConfig {
                mass: config.casing_mass(),
                radius: config.casing.radius,
                max_health: config.fragment.body.max_health,
            },
        )
        .warhead(WarheadConfig {
            damage: config.casing.damage,
            penetration: config.fragment.warhead.penetration,
            explosion_radius: None,
            ttl: Some(config.casing.ttl),
        })
        .trail(TrailKind::Debris, config.casing.trail)
    }

    // ===== Kinematics =====

    /// Initial position.
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Initial velocity.
    pub fn velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Initial heading; normalized on build, zero falls back to +X.
    pub fn heading(mut self, heading: Vec2) -> Self {
        self.heading = heading;
        self
    }

    /// Initial heading as an angle in radians.
    pub fn heading_angle(self, angle: f32) -> Self {
        self.heading(Vec2::from_angle(angle))
    }

    // ===== Relations =====

    /// Entity credited with this one's damage.
    pub fn owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Initial guidance target. Requires a drive.
    pub fn target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    // ===== Capabilities =====

    /// Attaches a drive.
    pub fn drive(mut self, config: DriveConfig) -> Self {
        self.drive = Some(config);
        self
    }

    /// Attaches a warhead.
    pub fn warhead(mut self, config: WarheadConfig) -> Self {
        self.warhead = Some(config);
        self
    }

    /// Attaches a proximity fuze. Requires a drive.
    pub fn fuze(mut self, config: FuzeConfig) -> Self {
        self.fuze = Some(config);
        self
    }

    /// Makes the entity burst into fragments on disposal.
    pub fn fragmentation(mut self, config: FragmentationConfig) -> Self {
        self.fragmentation = Some(config);
        self
    }

    /// Adds a trail beyond the ones a drive brings.
    pub fn trail(mut self, kind: TrailKind, config: TrailConfig) -> Self {
        self.trails.push((kind, config));
        self
    }

    /// Validates everything and produces the entity.
    ///
    /// # Errors
    ///
    /// Any config validation error, a non-finite position or velocity, or
    /// [`ConfigError::MissingCapability`] for a fuze or target without a
    /// drive.
    pub fn build(self) -> Result<Entity> {
        let mut body = Body::new(&self.body)?;
        body.position = self.position;
        body.velocity = self.velocity;
        body.heading = self.heading.try_normalize().unwrap_or(Vec2::X);
        body.validate_state()?;

        if self.drive.is_none() {
            if self.fuze.is_some() {
                return Err(ConfigError::MissingCapability {
                    capability: "fuze",
                    requires: "drive",
                });
            }
            if self.target.is_some() {
                return Err(ConfigError::MissingCapability {
                    capability: "target",
                    requires: "drive",
                });
            }
        }

        let mut trails = Vec::new();
        let drive = match self.drive {
            Some(config) => {
                let mut drive = Drive::new(config)?;
                drive.target = self.target;
                trails.push(Trail::new(TrailKind::Engine, config.engine_trail)?);
                trails.push(Trail::new(TrailKind::DamageBurn, config.damage_trail)?);
                Some(drive)
            }
            None => None,
        };
        for (kind, config) in self.trails {
            trails.push(Trail::new(kind, config)?);
        }

        let warhead = self
            .warhead
            .map(|config| Warhead::new(&config, self.body.radius))
            .transpose()?;
        let fuze = self.fuze.map(Fuze::new).transpose()?;
        if let Some(config) = &self.fragmentation {
            config.validate()?;
        }

        Ok(Entity {
            id: EntityId::UNASSIGNED,
            tags: self.tags,
            body,
            health: Health::new(self.body.max_health),
            owner: self.owner,
            ready_to_dispose: false,
            drive,
            warhead,
            fuze,
            fragmentation: self.fragmentation,
            trails,
        })
    }
}
