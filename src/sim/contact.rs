//! Contact regimes: free flight, rolling, and the one-shot bounce
//!
//! Each sub-step classifies the ball against its contact segment and
//! produces the acceleration (and, for rolls, the stop condition) that
//! shapes the rest of the step. Transitions are data-driven: a speed
//! threshold and an angle tolerance decide roll versus bounce.

use glam::DVec2;
use serde::Serialize;
use std::f64::consts::PI;

use crate::normalize_angle;
use crate::tuning::Tuning;

use super::segment::Segment;

/// Motion regime for one sub-step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regime {
    /// Airborne, gravity only
    Free,
    /// Constrained to the contact segment's tangent
    Rolling,
    /// Instantaneous velocity reflection; never persists past its
    /// sub-step
    Bouncing,
}

/// Tangential dynamics for one rolling sub-step
#[derive(Debug, Clone, Copy)]
pub struct Roll {
    /// Acceleration along the slope tangent
    pub accel: DVec2,
    /// Time until the tangential velocity reaches zero; +infinity when
    /// the ball never decelerates to a stop
    pub stop_time: f64,
    /// Whether friction can hold the ball at rest on this slope
    pub will_full_stop: bool,
}

/// Decide whether a contact rolls or bounces.
///
/// Slow contacts roll, as do contacts whose velocity runs nearly along
/// the slope (in either direction). Everything else bounces.
pub fn classify(vel: DVec2, seg: &Segment, tuning: &Tuning) -> Regime {
    if vel.length() < tuning.min_bounce_speed {
        return Regime::Rolling;
    }
    let diff = normalize_angle(vel.y.atan2(vel.x) - seg.slope_angle()).abs();
    if diff < tuning.roll_angle || PI - diff < tuning.roll_angle {
        Regime::Rolling
    } else {
        Regime::Bouncing
    }
}

/// Tangential dynamics for a ball rolling on `seg`.
///
/// With slope angle θ and rolling direction `dir`, the tangential
/// acceleration is g·(sinθ - dir·μ·cosθ); the stop condition
/// |sinθ| < |μ·cosθ| means static friction can hold the ball once its
/// tangential velocity runs out.
pub fn roll_dynamics(vel: DVec2, seg: &Segment, tuning: &Tuning) -> Roll {
    let tangent = seg.tangent();
    let vt = vel.dot(tangent);

    let (sin, cos) = seg.slope_angle().sin_cos();
    let will_full_stop = sin.abs() < (tuning.roll_friction * cos).abs();

    if vt == 0.0 {
        // Already at tangential rest: friction either holds the ball or
        // the bare slope component starts it sliding
        let accel = tangent * (tuning.gravity * sin);
        let stop_time = if will_full_stop { 0.0 } else { f64::INFINITY };
        return Roll {
            accel,
            stop_time,
            will_full_stop,
        };
    }

    let dir = vt.signum();
    let a = tuning.gravity * (sin - dir * tuning.roll_friction * cos);

    let stop_time = if a.abs() < f64::EPSILON {
        f64::INFINITY
    } else {
        let t = -vt / a;
        // A negative stop time means the slope speeds the ball up
        // instead; treat it as unreachable
        if t < 0.0 { f64::INFINITY } else { t }
    };

    Roll {
        accel: tangent * a,
        stop_time,
        will_full_stop,
    }
}

/// Reflect a bouncing ball's velocity off `normal`:
/// `V' = V - 2·damping·(V·N)·N - friction·(V·T)·T`
pub fn bounce_velocity(vel: DVec2, normal: DVec2, tuning: &Tuning) -> DVec2 {
    let tangent = DVec2::new(-normal.y, normal.x);
    let vn = vel.dot(normal);
    let vt = vel.dot(tangent);
    vel - normal * (2.0 * tuning.bounce_damping * vn) - tangent * (tuning.bounce_friction * vt)
}
