//! Event-driven golf ball simulation
//!
//! Continuous-time core: instead of sampling positions at a fixed
//! timestep, each frame resolves the exact times of segment hits and
//! roll stops from closed-form polynomial roots, so the ball never
//! tunnels through a thin wall no matter how fast it moves.
//!
//! This module is pure and deterministic: no rendering, no platform
//! dependencies, no hidden randomness.

pub mod collision;
pub mod contact;
pub mod roots;
pub mod segment;
pub mod state;
pub mod terrain;
pub mod world;

pub use collision::{Impact, time_of_impact};
pub use contact::{Regime, Roll, bounce_velocity, classify, roll_dynamics};
pub use roots::{earliest_positive, solve_cubic, solve_quadratic, solve_quartic};
pub use segment::Segment;
pub use state::{Aim, Body};
pub use terrain::{Course, CourseError, GoalRect, Terrain};
pub use world::{Contact, Snapshot, StepEvent, SubStep, World};
