//! Time-of-impact queries against terrain segments
//!
//! The tricky part of the simulator: within a sub-step the ball's center
//! moves along P(t) = P₀ + V·t + ½·A·t², so crossing a segment's
//! (radius-widened) line is a quadratic in t and reaching an endpoint cap
//! is a quartic (the squared magnitude of a quadratic vector). Solving
//! those exactly is what keeps a fast ball from tunneling through a thin
//! wall.

use glam::DVec2;

use super::roots::{earliest_positive, solve_quadratic, solve_quartic};
use super::segment::Segment;

/// Squared accelerations below this count as straight-line motion
const LINEAR_MOTION_EPS: f64 = 1e-12;

/// A predicted contact with a segment
#[derive(Debug, Clone, Copy)]
pub struct Impact {
    /// Time until contact; +infinity when the ball never arrives
    pub time: f64,
    /// Contact point on the terrain
    pub point: DVec2,
    /// Effective surface normal at the contact, pointing toward the ball:
    /// the segment normal for line hits, the radial direction for
    /// endpoint-cap hits
    pub normal: DVec2,
}

impl Impact {
    pub fn none() -> Self {
        Self {
            time: f64::INFINITY,
            point: DVec2::ZERO,
            normal: DVec2::ZERO,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.time.is_finite()
    }
}

/// Ball center position after `t` under constant acceleration
#[inline]
fn position_at(pos: DVec2, vel: DVec2, accel: DVec2, t: f64) -> DVec2 {
    pos + vel * t + accel * (0.5 * t * t)
}

/// Earliest time the ball's surface reaches `seg`.
///
/// Offsets the segment toward the ball by `radius`, solves the
/// line-crossing quadratic, and projects the crossing back onto the edge;
/// crossings beyond an endpoint fall through to the nearer endpoint cap.
/// Times may come back non-positive (a crossing already behind the ball);
/// the simulator filters for the strictly-positive minimum.
pub fn time_of_impact(
    seg: &Segment,
    pos: DVec2,
    vel: DVec2,
    accel: DVec2,
    radius: f64,
) -> Impact {
    // Widen toward whichever side the ball currently occupies, so both
    // faces of a wall are solid.
    let side = if seg.side_offset(pos) >= 0.0 { 1.0 } else { -1.0 };
    let normal = seg.normal() * side;
    let w1 = seg.p1() + normal * radius;

    // n·P(t) = n·w1 happens when (n·A/2)·t² + (n·V)·t + n·(P₀-w1) = 0
    let t_line = solve_quadratic(
        normal.dot(accel) / 2.0,
        normal.dot(vel),
        normal.dot(pos - w1),
    );

    if t_line.is_finite() {
        let center = position_at(pos, vel, accel, t_line);
        let u = seg.project(center);
        if (0.0..=1.0).contains(&u) {
            return Impact {
                time: t_line,
                point: center - normal * radius,
                normal,
            };
        }
        let cap = if u < 0.0 { seg.p1() } else { seg.p2() };
        return cap_impact(cap, pos, vel, accel, radius);
    }

    // Moving parallel to the line: only the caps can be reached
    let hit1 = cap_impact(seg.p1(), pos, vel, accel, radius);
    let hit2 = cap_impact(seg.p2(), pos, vel, accel, radius);
    if hit1.time <= hit2.time { hit1 } else { hit2 }
}

/// Earliest time the ball's center comes within `radius` of a fixed point.
///
/// Constant-velocity motion keeps this a quadratic; under acceleration
/// the squared distance is quartic in t.
fn cap_impact(cap: DVec2, pos: DVec2, vel: DVec2, accel: DVec2, radius: f64) -> Impact {
    let f = pos - cap;

    let time = if accel.length_squared() < LINEAR_MOTION_EPS {
        solve_quadratic(
            vel.length_squared(),
            2.0 * f.dot(vel),
            f.length_squared() - radius * radius,
        )
    } else {
        let roots = solve_quartic([
            accel.length_squared() / 4.0,
            vel.dot(accel),
            vel.length_squared() + f.dot(accel),
            2.0 * f.dot(vel),
            f.length_squared() - radius * radius,
        ]);
        earliest_positive(&roots)
    };

    if !time.is_finite() {
        return Impact::none();
    }

    let center = position_at(pos, vel, accel, time);
    Impact {
        time,
        point: cap,
        normal: (center - cap) / radius,
    }
}
