//! The simulator: bounded event-driven sub-stepping per frame
//!
//! Each `update` call repeatedly advances the ball to the earliest of
//! {roll stop, next collision, frame end}, transitioning the contact
//! regime at each event. The loop is capped at `MAX_SUBSTEPS` iterations;
//! when degenerate geometry exhausts the cap, leftover frame time is
//! dropped rather than risking an unbounded frame.

use glam::DVec2;
use serde::Serialize;

use crate::consts::MAX_SUBSTEPS;
use crate::tuning::Tuning;

use super::collision::{Impact, time_of_impact};
use super::contact::{Regime, bounce_velocity, classify, roll_dynamics};
use super::state::{Aim, Body};
use super::terrain::{Course, CourseError, Terrain};

/// Non-owning link from the ball to its supporting segment.
///
/// Segments outlive every contact, so an index into the terrain's
/// segment arena is all the bookkeeping needed. The stored normal is the
/// effective contact normal from the adopting event: the segment normal
/// for snaps and line hits, the endpoint radial for cap hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub seg: usize,
    pub normal: DVec2,
}

/// What ended a sub-step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepEvent {
    /// Consumed the rest of the frame budget without an event
    FrameEnd,
    /// Reached a segment (index into the terrain)
    Hit(usize),
    /// Tangential velocity reached zero but the slope re-accelerates
    RollReversal,
    /// Came to rest for good
    FullStop,
}

/// Structured record of one sub-step, handed to the observability hook
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SubStep {
    pub regime: Regime,
    pub advanced: f64,
    pub pos: DVec2,
    pub vel: DVec2,
    pub contact: Option<usize>,
    pub event: StepEvent,
}

/// Read-only view of the episode for the render collaborator
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub regime: Regime,
    pub contact: Option<usize>,
    pub strokes: u32,
    pub ready_for_input: bool,
    pub victory: bool,
}

/// One golf episode: terrain, ball, and stroke bookkeeping.
///
/// Single-threaded and synchronous; a new episode is started by
/// discarding the world and building a fresh one from a new course.
pub struct World {
    terrain: Terrain,
    tuning: Tuning,
    body: Body,
    contact: Option<Contact>,
    last_regime: Regime,
    strokes: u32,
    ready_for_input: bool,
    victory: bool,
    aim: Option<Aim>,
    observer: Option<Box<dyn FnMut(&SubStep)>>,
}

impl World {
    pub fn new(terrain: Terrain, tuning: Tuning) -> Result<Self, CourseError> {
        if tuning.ball_radius <= 0.0 {
            return Err(CourseError::BadRadius(tuning.ball_radius));
        }
        let body = Body::at_rest(terrain.spawn(), tuning.ball_radius);
        Ok(Self {
            terrain,
            tuning,
            body,
            contact: None,
            last_regime: Regime::Free,
            strokes: 0,
            ready_for_input: true,
            victory: false,
            aim: None,
            observer: None,
        })
    }

    /// Build the terrain and the world in one go
    pub fn from_course(course: &Course, tuning: Tuning) -> Result<Self, CourseError> {
        Self::new(Terrain::build(course)?, tuning)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    pub fn ready_for_input(&self) -> bool {
        self.ready_for_input
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    /// Install a hook that receives every sub-step record
    pub fn set_observer(&mut self, observer: Box<dyn FnMut(&SubStep)>) {
        self.observer = Some(observer);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.body.pos,
            vel: self.body.vel,
            radius: self.body.radius,
            regime: self.last_regime,
            contact: self.contact.map(|c| c.seg),
            strokes: self.strokes,
            ready_for_input: self.ready_for_input,
            victory: self.victory,
        }
    }

    /// Reset the ball to the spawn point.
    ///
    /// Clears velocity, contact and any pending gesture; strokes and
    /// victory persist.
    pub fn respawn(&mut self) {
        self.body = Body::at_rest(self.terrain.spawn(), self.tuning.ball_radius);
        self.contact = None;
        self.last_regime = Regime::Free;
        self.ready_for_input = true;
        self.aim = None;
    }

    /// Strike the ball. Ignored unless the episode is waiting for input.
    pub fn apply_impulse(&mut self, impulse: DVec2) {
        if !self.ready_for_input {
            return;
        }
        self.body.vel = impulse;
        self.body.accel = DVec2::ZERO;
        self.ready_for_input = false;
        self.strokes += 1;
        log::debug!(
            "stroke {}: impulse ({:.5}, {:.5})",
            self.strokes,
            impulse.x,
            impulse.y
        );
    }

    /// Begin a drag gesture (input collaborator)
    pub fn aim_start(&mut self, point: DVec2) {
        if self.ready_for_input {
            self.aim = Some(Aim {
                start: point,
                current: point,
            });
        }
    }

    /// Update the drag gesture's current point
    pub fn aim_move(&mut self, point: DVec2) {
        if let Some(aim) = &mut self.aim {
            aim.current = point;
        }
    }

    /// Release the drag, converting it into a stroke
    pub fn aim_release(&mut self) {
        if let Some(aim) = self.aim.take() {
            let impulse = aim.impulse(&self.tuning);
            if impulse != DVec2::ZERO {
                self.apply_impulse(impulse);
            }
        }
    }

    /// Advance the episode by `dt` milliseconds of frame time.
    pub fn update(&mut self, dt: f64) {
        let mut remaining = dt.max(0.0);

        for _ in 0..MAX_SUBSTEPS {
            if remaining <= 0.0 {
                break;
            }

            self.snap_to_contact();

            // Regime for this sub-step; acceleration defaults to gravity
            self.body.accel = DVec2::new(0.0, self.tuning.gravity);
            let mut stop_time = f64::INFINITY;
            let mut will_full_stop = false;

            let regime = match self.contact {
                Some(contact) => {
                    let seg = &self.terrain.segments()[contact.seg];
                    match classify(self.body.vel, seg, &self.tuning) {
                        Regime::Rolling => {
                            let roll = roll_dynamics(self.body.vel, seg, &self.tuning);
                            // Constrained to the slope: velocity lives on
                            // the tangent while rolling
                            let tangent = seg.tangent();
                            self.body.vel = tangent * self.body.vel.dot(tangent);
                            self.body.accel = roll.accel;
                            stop_time = roll.stop_time;
                            will_full_stop = roll.will_full_stop;
                            Regime::Rolling
                        }
                        _ => {
                            // One-shot reflection; the rest of the
                            // sub-step falls freely under gravity
                            self.body.vel =
                                bounce_velocity(self.body.vel, contact.normal, &self.tuning);
                            self.contact = None;
                            Regime::Bouncing
                        }
                    }
                }
                None => Regime::Free,
            };
            self.last_regime = regime;

            // Earliest strictly-positive impact among the other segments
            let mut hit: Option<(usize, Impact)> = None;
            for (i, seg) in self.terrain.segments().iter().enumerate() {
                if self.contact.is_some_and(|c| c.seg == i) {
                    continue;
                }
                let impact = time_of_impact(
                    seg,
                    self.body.pos,
                    self.body.vel,
                    self.body.accel,
                    self.body.radius,
                );
                if impact.time > 0.0 && hit.is_none_or(|(_, best)| impact.time < best.time) {
                    hit = Some((i, impact));
                }
            }
            let hit_time = hit.map_or(f64::INFINITY, |(_, impact)| impact.time);

            // Advance to the earliest event
            let (step, event) = if stop_time <= hit_time && stop_time <= remaining {
                let event = if will_full_stop {
                    StepEvent::FullStop
                } else {
                    StepEvent::RollReversal
                };
                (stop_time, event)
            } else if let Some((idx, impact)) = hit.filter(|(_, imp)| imp.time <= remaining) {
                (impact.time, StepEvent::Hit(idx))
            } else {
                (remaining, StepEvent::FrameEnd)
            };

            self.body.advance(step);
            remaining -= step;

            match event {
                StepEvent::FullStop => {
                    self.body.vel = DVec2::ZERO;
                    self.body.accel = DVec2::ZERO;
                    self.finish_stroke();
                }
                StepEvent::RollReversal => {
                    // Tangential velocity is spent; the next sub-step
                    // decides whether the slope restarts the ball
                    self.body.vel = DVec2::ZERO;
                }
                StepEvent::Hit(idx) => {
                    if let Some((_, impact)) = hit {
                        self.contact = Some(Contact {
                            seg: idx,
                            normal: impact.normal,
                        });
                    }
                }
                StepEvent::FrameEnd => {}
            }

            self.observe(SubStep {
                regime,
                advanced: step,
                pos: self.body.pos,
                vel: self.body.vel,
                contact: self.contact.map(|c| c.seg),
                event,
            });

            if matches!(event, StepEvent::FullStop | StepEvent::FrameEnd) {
                break;
            }
        }

        if self.body.pos.y > self.tuning.out_of_bounds_y {
            log::debug!("out of bounds at y={:.2}, respawning", self.body.pos.y);
            self.respawn();
        }
    }

    /// Start-of-step snap: find the nearest segment within tolerance,
    /// push the ball out of any penetration, and adopt the segment as
    /// the contact when the ball is moving into or along it.
    fn snap_to_contact(&mut self) {
        let mut best: Option<(usize, f64)> = None;
        for (i, seg) in self.terrain.segments().iter().enumerate() {
            let gap = seg.distance_from(self.body.pos, self.body.radius);
            if gap > -self.body.radius
                && gap < self.tuning.snap_tolerance
                && best.is_none_or(|(_, g)| gap < g)
            {
                best = Some((i, gap));
            }
        }

        let Some((idx, gap)) = best else {
            self.contact = None;
            return;
        };

        let seg = &self.terrain.segments()[idx];
        let side = if seg.side_offset(self.body.pos) >= 0.0 {
            1.0
        } else {
            -1.0
        };
        let normal = seg.normal() * side;

        // Un-penetrate regardless of direction of travel, so a receding
        // ball never restarts the frame inside the surface
        if gap < 0.0 {
            self.body.pos -= normal * gap;
        }

        if self.body.vel.dot(normal) <= 0.0 {
            // Settle onto the surface and adopt it; keep the stored
            // normal when the contact segment hasn't changed (it may be
            // an endpoint radial from a cap hit)
            if gap > 0.0 {
                self.body.pos -= normal * gap;
            }
            if !self.contact.is_some_and(|c| c.seg == idx) {
                self.contact = Some(Contact { seg: idx, normal });
            }
        } else {
            self.contact = None;
        }
    }

    /// Goal bookkeeping at a full stop. Only a stroke in flight can end
    /// an episode; settling before the first hit (or after victory) is
    /// a no-op.
    fn finish_stroke(&mut self) {
        if self.ready_for_input || self.victory {
            return;
        }
        let in_goal = self
            .terrain
            .goal()
            .is_some_and(|goal| goal.contains(self.body.pos));
        if in_goal {
            self.victory = true;
            log::info!("holed out in {} strokes", self.strokes);
        } else {
            self.ready_for_input = true;
        }
    }

    fn observe(&mut self, sub: SubStep) {
        log::trace!(
            "substep {:?} dt={:.3} pos=({:.3},{:.3}) event={:?}",
            sub.regime,
            sub.advanced,
            sub.pos.x,
            sub.pos.y,
            sub.event
        );
        if let Some(observer) = &mut self.observer {
            observer(&sub);
        }
    }
}
