//! Spring-damped pointer smoothing.
//!
//! Each frame the velocity gains a fraction of the remaining offset to the
//! target, is damped, and is added to the position:
//!
//! ```text
//! delta    = (target - position) * 0.15
//! velocity = (velocity + delta) * 0.8
//! position = position + velocity
//! ```
//!
//! The error dynamics have a complex eigenvalue pair of modulus `sqrt(0.8)`,
//! so the follower overshoots a fixed target slightly and rings down
//! geometrically instead of approaching it monotonically.

use glam::{DVec2, DVec3};
use tracing::trace;

/// Fraction of the offset to the target added to the velocity each frame.
pub const ATTRACTION: f64 = 0.15;
/// Velocity multiplier applied each frame.
pub const DAMPING: f64 = 0.8;

/// A 2-D position that elastically follows a target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElasticPointer {
    target: DVec2,
    position: DVec2,
    velocity: DVec2,
}

impl ElasticPointer {
    /// A follower at rest at the origin, targeting the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A follower at rest at `position`, already targeting it.
    pub fn at(position: DVec2) -> Self {
        Self {
            target: position,
            position,
            velocity: DVec2::ZERO,
        }
    }

    /// Replaces the raw target. Called for every pointer event.
    pub fn set_target(&mut self, target: DVec2) {
        self.target = target;
    }

    /// Runs one spring update and returns the new smoothed position.
    pub fn advance(&mut self) -> DVec2 {
        let delta = (self.target - self.position) * ATTRACTION;
        self.velocity = (self.velocity + delta) * DAMPING;
        self.position += self.velocity;
        trace!(
            target_x = self.target.x,
            target_y = self.target.y,
            x = self.position.x,
            y = self.position.y,
            "elastic pointer advanced"
        );
        self.position
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// The smoothed position lifted onto the z = 0 plane, as used for the light.
    pub fn position3(&self) -> DVec3 {
        self.position.extend(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_advance_matches_the_update_rule_exactly() {
        let mut p = ElasticPointer::new();
        p.set_target(DVec2::new(1.0, 0.0));
        let pos = p.advance();

        let delta = (1.0 - 0.0) * 0.15;
        let vel = (0.0 + delta) * 0.8;
        assert_eq!(pos, DVec2::new(0.0 + vel, 0.0));
        assert_eq!(p.velocity(), DVec2::new(vel, 0.0));
        assert!((pos.x - 0.12).abs() < 1e-15, "expected 0.12, got {}", pos.x);
    }

    #[test]
    fn second_advance_accumulates_velocity() {
        let mut p = ElasticPointer::new();
        p.set_target(DVec2::new(1.0, 0.0));
        p.advance();
        let pos = p.advance();
        // v = (0.12 + 0.88 * 0.15) * 0.8 = 0.2016, x = 0.12 + 0.2016
        assert!((p.velocity().x - 0.2016).abs() < 1e-12);
        assert!((pos.x - 0.3216).abs() < 1e-12);
    }

    #[test]
    fn resting_at_target_stays_put() {
        let mut p = ElasticPointer::at(DVec2::new(0.3, -0.4));
        for _ in 0..10 {
            assert_eq!(p.advance(), DVec2::new(0.3, -0.4));
        }
        assert_eq!(p.velocity(), DVec2::ZERO);
    }

    #[test]
    fn set_target_only_changes_the_target() {
        let mut p = ElasticPointer::new();
        p.set_target(DVec2::new(2.0, 3.0));
        assert_eq!(p.target(), DVec2::new(2.0, 3.0));
        assert_eq!(p.position(), DVec2::ZERO);
        assert_eq!(p.velocity(), DVec2::ZERO);
    }

    #[test]
    fn converges_to_a_fixed_target() {
        let target = DVec2::new(1.0, -0.5);
        let mut p = ElasticPointer::new();
        p.set_target(target);
        for _ in 0..400 {
            p.advance();
        }
        assert!(p.position().distance(target) < 1e-12);
        assert!(p.velocity().length() < 1e-12);
    }

    #[test]
    fn distance_envelope_decays_geometrically() {
        // Maximum distance over consecutive 20-frame windows must shrink
        // window to window, at least as fast as the eigenvalue modulus allows.
        let target = DVec2::new(1.0, 0.0);
        let mut p = ElasticPointer::new();
        p.set_target(target);
        let distances: Vec<f64> = (0..240).map(|_| p.advance().distance(target)).collect();
        let envelope: Vec<f64> = distances
            .chunks(20)
            .map(|w| w.iter().copied().fold(0.0, f64::max))
            .collect();
        for pair in envelope.windows(2) {
            assert!(
                pair[1] < pair[0],
                "envelope did not shrink: {} -> {}",
                pair[0],
                pair[1]
            );
            // sqrt(0.8)^20 = 0.8^10 ~ 0.107; allow slack for the phase of the ringing.
            assert!(
                pair[1] < pair[0] * 0.5,
                "envelope shrank too slowly: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn position3_lifts_onto_z_zero() {
        let mut p = ElasticPointer::new();
        p.set_target(DVec2::new(0.5, 0.5));
        let pos = p.advance();
        assert_eq!(p.position3(), DVec3::new(pos.x, pos.y, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Sum of |impulse response| from target to position is about 2.17,
        /// so a follower starting at rest at the origin never exceeds ~2.17 M.
        const GAIN_BOUND: f64 = 2.5;

        proptest! {
            #[test]
            fn bounded_targets_give_bounded_positions(
                targets in prop::collection::vec((-1.0_f64..=1.0, -1.0_f64..=1.0), 1..300),
                m in 0.01_f64..100.0,
            ) {
                let mut p = ElasticPointer::new();
                for (tx, ty) in targets {
                    p.set_target(DVec2::new(tx * m, ty * m));
                    let pos = p.advance();
                    prop_assert!(pos.is_finite());
                    prop_assert!(
                        pos.x.abs() <= GAIN_BOUND * m && pos.y.abs() <= GAIN_BOUND * m,
                        "position {pos:?} escaped bound for M = {m}"
                    );
                }
            }

            #[test]
            fn any_start_converges_to_constant_target(
                sx in -10.0_f64..10.0,
                sy in -10.0_f64..10.0,
                tx in -10.0_f64..10.0,
                ty in -10.0_f64..10.0,
            ) {
                let target = DVec2::new(tx, ty);
                let mut p = ElasticPointer::at(DVec2::new(sx, sy));
                p.set_target(target);
                let start = p.position().distance(target);
                for _ in 0..300 {
                    p.advance();
                }
                prop_assert!(p.position().distance(target) <= start * 1e-9 + 1e-12);
            }
        }
    }
}
