//! Ball state and the pending aim gesture

use glam::DVec2;
use serde::Serialize;

use crate::tuning::Tuning;

/// The ball: the only moving body in an episode.
///
/// Acceleration is recomputed from the contact regime every sub-step,
/// never carried as integrated state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Body {
    pub pos: DVec2,
    pub vel: DVec2,
    pub accel: DVec2,
    pub radius: f64,
}

impl Body {
    /// A motionless ball at `pos`
    pub fn at_rest(pos: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            accel: DVec2::ZERO,
            radius,
        }
    }

    /// Advance along the constant-acceleration arc for `dt`.
    ///
    /// Position integrates before velocity so the motion matches the
    /// collision-time predictions made from the same state.
    pub fn advance(&mut self, dt: f64) {
        self.pos += self.vel * dt + self.accel * (0.5 * dt * dt);
        self.vel += self.accel * dt;
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// In-progress drag gesture, fed by the input collaborator.
///
/// Transient: created on press, updated on move, consumed on release.
#[derive(Debug, Clone, Copy)]
pub struct Aim {
    pub start: DVec2,
    pub current: DVec2,
}

impl Aim {
    /// Impulse for releasing this drag: opposite the drag direction,
    /// with the drag distance capped at `max_hit` before scaling by
    /// `hit_sensitivity`. Zero-length drags produce no impulse.
    pub fn impulse(&self, tuning: &Tuning) -> DVec2 {
        let drag = self.current - self.start;
        let dist = drag.length();
        if dist <= f64::EPSILON {
            return DVec2::ZERO;
        }
        -(drag / dist) * (dist.min(tuning.max_hit) * tuning.hit_sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_integrates_position_then_velocity() {
        let mut body = Body::at_rest(DVec2::ZERO, 0.1);
        body.accel = DVec2::new(0.0, 2.0);
        body.advance(3.0);
        // x = ½·a·t², v = a·t
        assert!((body.pos.y - 9.0).abs() < 1e-12);
        assert!((body.vel.y - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_aim_reverses_drag_direction() {
        let tuning = Tuning::default();
        let aim = Aim {
            start: DVec2::ZERO,
            current: DVec2::new(1.0, 0.0),
        };
        let impulse = aim.impulse(&tuning);
        assert!(impulse.x < 0.0);
        assert!(impulse.y.abs() < 1e-12);
    }

    #[test]
    fn test_aim_clamps_drag_distance() {
        let tuning = Tuning::default();
        let short = Aim {
            start: DVec2::ZERO,
            current: DVec2::new(0.0, tuning.max_hit),
        };
        let long = Aim {
            start: DVec2::ZERO,
            current: DVec2::new(0.0, tuning.max_hit * 50.0),
        };
        let full_power = tuning.max_hit * tuning.hit_sensitivity;
        assert!((short.impulse(&tuning).length() - full_power).abs() < 1e-12);
        assert!((long.impulse(&tuning).length() - full_power).abs() < 1e-12);
    }

    #[test]
    fn test_empty_drag_is_no_impulse() {
        let tuning = Tuning::default();
        let aim = Aim {
            start: DVec2::new(2.0, 2.0),
            current: DVec2::new(2.0, 2.0),
        };
        assert_eq!(aim.impulse(&tuning), DVec2::ZERO);
    }
}
