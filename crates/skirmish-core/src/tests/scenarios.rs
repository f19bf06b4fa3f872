//! Worked scenarios for guidance, fuel and fragmentation.

use glam::Vec2;

use crate::config::DriveConfig;
use crate::entity::EntityTags;
use crate::guidance::{guide, TargetInfo};
use crate::simulation::Simulation;

use super::helpers::{driven_body, init_tracing, spawn_frag_missile, spawn_ship};

// =============================================================================
// Guidance
// =============================================================================

#[test]
fn aligned_target_needs_no_turn_and_gets_full_throttle() {
    let mut entity = driven_body(Vec2::ZERO, DriveConfig::default());
    let (body, drive) = (&mut entity.body, entity.drive.as_mut().unwrap());

    let outcome = guide(body, drive, Some(TargetInfo::at(Vec2::new(100.0, 0.0))), None, 1.0);

    assert_eq!(outcome.rotation, 0.0);
    assert_eq!(body.heading, Vec2::X);
    assert_eq!(drive.throttle(), drive.config().max_throttle);
    assert_eq!(body.force(), Vec2::X * drive.config().max_throttle);
}

#[test]
fn target_at_ninety_degrees_turns_by_exactly_max_rotation() {
    let mut entity = driven_body(Vec2::ZERO, DriveConfig::default());
    let (body, drive) = (&mut entity.body, entity.drive.as_mut().unwrap());

    let outcome = guide(body, drive, Some(TargetInfo::at(Vec2::new(0.0, 100.0))), None, 1.0);

    assert!((outcome.rotation - 0.05).abs() < 1e-6);
    assert!((body.heading_angle() - 0.05).abs() < 1e-6);
}

#[test]
fn empty_tank_produces_no_thrust() {
    let mut entity = driven_body(
        Vec2::ZERO,
        DriveConfig {
            max_fuel: 0.0,
            ..DriveConfig::default()
        },
    );
    let (body, drive) = (&mut entity.body, entity.drive.as_mut().unwrap());

    let outcome = guide(body, drive, Some(TargetInfo::at(Vec2::new(100.0, 0.0))), None, 1.0);

    assert_eq!(outcome.throttle, 0.0);
    assert_eq!(drive.throttle(), 0.0);
    assert_eq!(body.force(), Vec2::ZERO);
}

// =============================================================================
// Fragmentation
// =============================================================================

#[test]
fn fragments_appear_on_the_tick_after_disposal() {
    init_tracing();
    let mut sim = Simulation::new(11);
    let ship = spawn_ship(&mut sim, Vec2::new(10_000.0, 0.0));
    let missile = spawn_frag_missile(&mut sim, Vec2::ZERO, ship, None);
    sim.step().unwrap();
    assert_eq!(sim.registry().len(), 2);

    // Disposal tick: the missile is swept, its children only queued.
    sim.registry_mut().get_mut(missile).unwrap().mark_for_disposal();
    sim.step().unwrap();
    assert!(!sim.registry().contains(missile));
    assert_eq!(sim.registry().len(), 1);
    assert_eq!(sim.registry().pending_len(), 501);
    assert_eq!(sim.snapshot().entities.len(), 1);

    // Next tick: 500 fragments plus the casing are live.
    sim.step().unwrap();
    assert_eq!(sim.registry().len(), 1 + 501);
    assert_eq!(sim.registry().pending_len(), 0);
    let casings = sim
        .registry()
        .iter()
        .filter(|e| e.tags().contains(EntityTags::CASING))
        .count();
    assert_eq!(casings, 1);
}
