//! Homing guidance: heading control, throttle policy and fuel burn.
//!
//! [`guide`] runs once per tick for every driven entity, before
//! integration. Only the aim point depends on the [`GuidanceStrategy`]; the
//! rotation clamp, throttle policy and fuel accounting are shared.
//!
//! Per tick:
//!
//! 1. With no live target the guidance vector is cleared and the drive idles
//!    (no rotation, zero throttle, no fuel burned).
//! 2. The strategy picks an aim point; the guidance vector points at it.
//! 3. The heading turns toward the guidance vector by at most
//!    `max_rotation_speed` radians. The clamp is per tick, not per second.
//! 4. Throttle is full while the target is at least the cut-off distance away.
//! 5. Fuel burns in proportion to the throttle fraction. An empty tank forces
//!    the throttle to zero.
//! 6. Thrust `heading * throttle` goes into the body's force accumulator.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::config::{BodyConfig, DriveConfig};
//! use skirmish_core::entity::{Body, Drive};
//! use skirmish_core::guidance::{guide, TargetInfo};
//!
//! let mut body = Body::new(&BodyConfig::default()).unwrap();
//! let mut drive = Drive::new(DriveConfig::default()).unwrap();
//!
//! // Target straight ahead: no turn, full throttle.
//! let target = TargetInfo::at(Vec2::new(100.0, 0.0));
//! let outcome = guide(&mut body, &mut drive, Some(target), None, 1.0);
//!
//! assert_eq!(outcome.rotation, 0.0);
//! assert_eq!(drive.throttle(), 50.0);
//! assert_eq!(body.force(), Vec2::new(50.0, 0.0));
//! ```

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, Drive};

/// Speeds below this fall back from lead intercept to pure pursuit.
const MIN_INTERCEPT_SPEED: f32 = 1e-3;

/// Closed set of aim-point strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuidanceStrategy {
    /// Aim at the target's current position.
    #[default]
    DirectPursuit,
    /// Aim at the predicted intercept point using own speed.
    LeadIntercept,
    /// No aim point; the drive idles and the body coasts.
    Passive,
}

impl GuidanceStrategy {
    /// Point to steer toward, or `None` for passive bodies.
    #[must_use]
    pub fn aim_point(
        self,
        own_position: Vec2,
        own_speed: f32,
        target: &TargetInfo,
    ) -> Option<Vec2> {
        match self {
            Self::DirectPursuit => Some(target.position),
            Self::LeadIntercept => Some(lead_point(own_position, own_speed, target)),
            Self::Passive => None,
        }
    }
}

/// What the guidance controller may know about a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetInfo {
    /// Target position.
    pub position: Vec2,
    /// Target velocity.
    pub velocity: Vec2,
}

impl TargetInfo {
    /// A stationary target at `position`.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }
}

/// Result of one guidance pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidanceOutcome {
    /// Heading change applied this tick, radians.
    pub rotation: f32,
    /// Throttle after fuel accounting.
    pub throttle: f32,
    /// Distance to the live target, if any.
    pub distance: Option<f32>,
}

impl GuidanceOutcome {
    const IDLE: Self = Self {
        rotation: 0.0,
        throttle: 0.0,
        distance: None,
    };
}

/// Predicted intercept point, refined twice from the current range.
fn lead_point(own_position: Vec2, own_speed: f32, target: &TargetInfo) -> Vec2 {
    if own_speed < MIN_INTERCEPT_SPEED {
        return target.position;
    }
    let mut time_to_intercept = own_position.distance(target.position) / own_speed;
    for _ in 0..2 {
        let predicted = target.position + target.velocity * time_to_intercept;
        time_to_intercept = own_position.distance(predicted) / own_speed;
    }
    target.position + target.velocity * time_to_intercept
}

/// Signed minimal angle from `from` to `to`, in `(-π, π]`.
///
/// Positive is counter-clockwise. Returns `0.0` if either vector is zero.
#[must_use]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    if from == Vec2::ZERO || to == Vec2::ZERO {
        return 0.0;
    }
    let angle = from.perp_dot(to).atan2(from.dot(to));
    if angle <= -PI {
        PI
    } else {
        angle
    }
}

/// `sign(angle) * min(|angle|, max_rotation)`.
#[must_use]
pub fn clamp_rotation(angle: f32, max_rotation: f32) -> f32 {
    angle.abs().min(max_rotation).copysign(angle)
}

/// Runs one guidance pass.
///
/// `target` is `None` when there is no target or it is being disposed.
/// Inside `terminal_band` (exclusive `(low, high)` distances) the aim point
/// switches to the target's current position regardless of strategy.
pub fn guide(
    body: &mut Body,
    drive: &mut Drive,
    target: Option<TargetInfo>,
    terminal_band: Option<(f32, f32)>,
    dt: f32,
) -> GuidanceOutcome {
    let Some(target) = target else {
        drive.guidance = Vec2::ZERO;
        drive.throttle = 0.0;
        return GuidanceOutcome::IDLE;
    };

    let distance = body.position.distance(target.position);
    let in_terminal_band =
        terminal_band.is_some_and(|(low, high)| distance > low && distance < high);
    let aim = if in_terminal_band {
        Some(target.position)
    } else {
        drive
            .strategy()
            .aim_point(body.position, body.velocity.length(), &target)
    };
    drive.guidance = aim
        .map(|point| point - body.position)
        .and_then(Vec2::try_normalize)
        .unwrap_or(Vec2::ZERO);

    if drive.guidance == Vec2::ZERO {
        drive.throttle = 0.0;
        return GuidanceOutcome {
            distance: Some(distance),
            ..GuidanceOutcome::IDLE
        };
    }

    let rotation = clamp_rotation(
        signed_angle(body.heading, drive.guidance),
        drive.config.max_rotation_speed,
    );
    if rotation != 0.0 {
        body.heading = Vec2::from_angle(rotation)
            .rotate(body.heading)
            .try_normalize()
            .unwrap_or(body.heading);
    }

    let cutoff = drive.config.throttle_cutoff.unwrap_or(body.radius());
    drive.throttle = if distance >= cutoff {
        drive.config.max_throttle
    } else {
        0.0
    };

    burn_fuel(drive, dt);

    if drive.throttle > 0.0 {
        body.apply_force(body.heading * drive.throttle);
    }

    GuidanceOutcome {
        rotation,
        throttle: drive.throttle,
        distance: Some(distance),
    }
}

/// Burns fuel for the current throttle and cuts the throttle on an empty tank.
fn burn_fuel(drive: &mut Drive, dt: f32) {
    if drive.fuel <= 0.0 {
        drive.fuel = 0.0;
        drive.throttle = 0.0;
        return;
    }
    let burn = drive.throttle_fraction() * drive.config.fuel_consumption * dt;
    drive.fuel = (drive.fuel - burn).max(0.0);
    if drive.fuel <= 0.0 {
        drive.throttle = 0.0;
    }
}
