//! Kinematic integration.
//!
//! One step per tick with a fixed `dt`:
//!
//! ```text
//! acceleration = force / mass
//! velocity    += acceleration * dt
//! position    += velocity * dt + acceleration * dt² / 2
//! force        = 0
//! ```
//!
//! The position update uses the *already updated* velocity plus a separate
//! half-step acceleration term. This is not textbook semi-implicit Euler and
//! trajectories depend on it, so keep the order.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use skirmish_core::config::BodyConfig;
//! use skirmish_core::entity::Body;
//! use skirmish_core::physics::integrate;
//!
//! let mut body = Body::new(&BodyConfig { mass: 2.0, ..BodyConfig::default() }).unwrap();
//! body.apply_force(Vec2::new(4.0, 0.0));
//! integrate(&mut body, 1.0);
//!
//! assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
//! assert_eq!(body.position, Vec2::new(3.0, 0.0));
//! assert_eq!(body.force(), Vec2::ZERO);
//! ```

use crate::entity::Body;

/// Advances `body` by `dt` under its accumulated force, then clears the
/// accumulator.
pub fn integrate(body: &mut Body, dt: f32) {
    let force = body.take_force();
    let acceleration = force / body.mass();
    body.acceleration = acceleration;
    body.velocity += acceleration * dt;
    body.position += body.velocity * dt + acceleration * (dt * dt * 0.5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyConfig;
    use glam::Vec2;

    fn body(mass: f32) -> Body {
        Body::new(&BodyConfig {
            mass,
            ..BodyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn zero_force_keeps_velocity() {
        let mut b = body(1.0);
        b.velocity = Vec2::new(3.0, -2.0);
        integrate(&mut b, 0.5);
        assert_eq!(b.velocity, Vec2::new(3.0, -2.0));
        assert_eq!(b.position, Vec2::new(1.5, -1.0));
        assert_eq!(b.acceleration, Vec2::ZERO);
    }

    #[test]
    fn body_at_rest_stays_put() {
        let mut b = body(1.0);
        b.position = Vec2::new(7.0, 7.0);
        for _ in 0..10 {
            integrate(&mut b, 1.0 / 60.0);
        }
        assert_eq!(b.position, Vec2::new(7.0, 7.0));
    }

    #[test]
    fn position_uses_updated_velocity_plus_half_step() {
        let mut b = body(1.0);
        b.velocity = Vec2::new(1.0, 0.0);
        b.apply_force(Vec2::new(2.0, 0.0));
        integrate(&mut b, 1.0);
        // v = 1 + 2 = 3; x = 3 + 2 / 2 = 4
        assert_eq!(b.velocity, Vec2::new(3.0, 0.0));
        assert_eq!(b.position, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn force_is_consumed_once() {
        let mut b = body(1.0);
        b.apply_force(Vec2::new(0.0, 6.0));
        integrate(&mut b, 1.0);
        assert_eq!(b.force(), Vec2::ZERO);
        integrate(&mut b, 1.0);
        assert_eq!(b.velocity, Vec2::new(0.0, 6.0));
        assert_eq!(b.acceleration, Vec2::ZERO);
    }

    #[test]
    fn heavier_bodies_accelerate_less() {
        let mut light = body(1.0);
        let mut heavy = body(10.0);
        light.apply_force(Vec2::X * 10.0);
        heavy.apply_force(Vec2::X * 10.0);
        integrate(&mut light, 1.0);
        integrate(&mut heavy, 1.0);
        assert_eq!(light.velocity.x, 10.0);
        assert_eq!(heavy.velocity.x, 1.0);
    }
}
