//! Data-driven physics coefficients
//!
//! Everything a course designer might want to tweak lives here, persisted
//! separately from course geometry so a driver can load tuned values
//! without rebuilding.

use serde::{Deserialize, Serialize};

/// Tunable physics coefficients for one episode.
///
/// Units: course units for lengths, milliseconds for time, radians for
/// angles. Gravity points toward +y (screen-style coordinates: up is
/// negative y).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward gravity in units/ms²
    pub gravity: f64,
    /// Largest angle between velocity and slope for a contact to count
    /// as a roll rather than a bounce (radians)
    pub roll_angle: f64,
    /// Tangential friction coefficient while rolling
    pub roll_friction: f64,
    /// Fraction of tangential velocity lost at a bounce
    pub bounce_friction: f64,
    /// Normal restitution factor at a bounce (1 = perfectly elastic)
    pub bounce_damping: f64,
    /// Below this speed a contact always rolls instead of bouncing
    pub min_bounce_speed: f64,
    /// Ball radius in course units
    pub ball_radius: f64,
    /// Longest drag distance that still adds stroke power
    pub max_hit: f64,
    /// Impulse magnitude per unit of drag distance
    pub hit_sensitivity: f64,
    /// Gap below which a segment counts as touching at the start of a
    /// sub-step
    pub snap_tolerance: f64,
    /// Falling past this y respawns the ball
    pub out_of_bounds_y: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 3e-5,
            roll_angle: std::f64::consts::PI / 32.0,
            roll_friction: 0.8,
            bounce_friction: 0.05,
            bounce_damping: 0.7,
            min_bounce_speed: 0.001,
            ball_radius: 0.1,
            max_hit: 2.0,
            hit_sensitivity: 0.005,
            snap_tolerance: 0.01,
            out_of_bounds_y: 100.0,
        }
    }
}
