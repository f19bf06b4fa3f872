//! Fragmentation cascade.
//!
//! When a frag-capable entity is disposed it bursts into `fragment_count`
//! fragments plus one residual casing. Each fragment receives a sampled
//! impulse and the casing receives its negation, so the cascade adds no net
//! momentum to the world.
//!
//! Emission angles are drawn from the forward cone
//! `[heading - half_angle, heading + half_angle]` for shaped detonations and
//! from `[0, 2π)` otherwise. Magnitudes are drawn from
//! `[power_floor * power, power]`.
//!
//! The impulses are loaded into each new body's force accumulator and take
//! effect on that body's first integration. New entities are queued in the
//! registry and only become live on the next tick.

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use crate::config::FragmentationConfig;
use crate::entity::{Entity, EntityBuilder, EntityId};
use crate::error::Result;
use crate::random::RandomSource;
use crate::registry::Registry;

/// Entities queued by one cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    /// The residual casing.
    pub casing: EntityId,
    /// The fragments, in spawn order.
    pub fragments: Vec<EntityId>,
}

/// Samples one fragment impulse.
pub fn sample_impulse<R: RandomSource + ?Sized>(
    heading_angle: f32,
    config: &FragmentationConfig,
    shaped: bool,
    rng: &mut R,
) -> Vec2 {
    let angle = if shaped {
        rng.uniform(
            heading_angle - config.shaped_half_angle,
            heading_angle + config.shaped_half_angle,
        )
    } else {
        rng.uniform(0.0, TAU)
    };
    let magnitude = rng.uniform(config.power * config.power_floor, config.power);
    Vec2::from_angle(angle) * magnitude
}

/// Samples a fragment lifetime from the configured tick range.
fn sample_ttl<R: RandomSource + ?Sized>(config: &FragmentationConfig, rng: &mut R) -> u32 {
    let range = config.fragment_ttl;
    let ttl = rng.uniform_int(i64::from(range.min), i64::from(range.max));
    u32::try_from(ttl).unwrap_or(range.min)
}

/// Bursts `parent` into fragments and a casing, queueing them in `registry`.
///
/// Every new entity inherits the parent's position, velocity, heading and
/// owner.
///
/// # Errors
///
/// Fails if a fragment or the casing cannot be built, which only happens
/// when the parent's kinematic state has gone non-finite.
pub fn cascade<R: RandomSource + ?Sized>(
    parent: &Entity,
    config: &FragmentationConfig,
    shaped: bool,
    rng: &mut R,
    registry: &mut Registry,
) -> Result<Cascade> {
    let body = parent.body();
    let inherit = |builder: EntityBuilder| {
        let builder = builder
            .at(body.position)
            .velocity(body.velocity)
            .heading(body.heading);
        match parent.owner() {
            Some(owner) => builder.owner(owner),
            None => builder,
        }
    };

    let mut casing = inherit(EntityBuilder::casing(config)).build()?;
    let heading_angle = body.heading_angle();

    let mut fragments = Vec::with_capacity(config.fragment_count as usize);
    for _ in 0..config.fragment_count {
        let impulse = sample_impulse(heading_angle, config, shaped, rng);
        let ttl = sample_ttl(config, rng);
        let mut fragment = inherit(EntityBuilder::fragment(&config.fragment, ttl)).build()?;
        fragment.body_mut().apply_force(impulse);
        casing.body_mut().apply_force(-impulse);
        fragments.push(fragment);
    }

    debug!(
        parent = %parent.id(),
        fragments = fragments.len(),
        shaped,
        "fragmentation cascade"
    );

    let casing = registry.add(casing);
    let fragments = fragments
        .into_iter()
        .map(|fragment| registry.add(fragment))
        .collect();
    Ok(Cascade { casing, fragments })
}
