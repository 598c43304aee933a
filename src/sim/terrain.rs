//! Course input: polygon loops converted to immutable segments
//!
//! The terrain generator hands the core closed vertex loops, a spawn
//! point and an optional goal region. Edges become `Segment`s exactly
//! once, at episode start; malformed input is rejected here rather than
//! tolerated at runtime.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Axis-aligned goal region; coming to a full stop inside it wins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRect {
    pub min: DVec2,
    pub max: DVec2,
}

impl GoalRect {
    /// Build from any two opposite corners
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Raw course description produced by a terrain generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Closed polygon loops: consecutive vertices are joined and the
    /// last wraps back to the first
    pub loops: Vec<Vec<DVec2>>,
    /// Ball spawn point
    pub spawn: DVec2,
    /// Optional goal region
    pub goal: Option<GoalRect>,
}

/// Rejected course input
#[derive(Debug, Clone, PartialEq)]
pub enum CourseError {
    /// A loop has fewer than three vertices
    ShortLoop { loop_index: usize, len: usize },
    /// Two consecutive vertices coincide
    DegenerateEdge { loop_index: usize, edge_index: usize },
    /// Ball radius must be positive
    BadRadius(f64),
}

impl fmt::Display for CourseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseError::ShortLoop { loop_index, len } => {
                write!(f, "loop {loop_index} has only {len} vertices (need 3)")
            }
            CourseError::DegenerateEdge {
                loop_index,
                edge_index,
            } => {
                write!(f, "loop {loop_index} edge {edge_index} has zero length")
            }
            CourseError::BadRadius(r) => write!(f, "ball radius {r} is not positive"),
        }
    }
}

impl std::error::Error for CourseError {}

/// Immutable terrain for one episode.
///
/// Owns the segment arena; the ball's contact is an index into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    segments: Vec<Segment>,
    spawn: DVec2,
    goal: Option<GoalRect>,
}

impl Terrain {
    /// Convert a course's loops into segments, wrapping each loop closed.
    pub fn build(course: &Course) -> Result<Self, CourseError> {
        let mut segments = Vec::new();
        for (loop_index, ring) in course.loops.iter().enumerate() {
            if ring.len() < 3 {
                return Err(CourseError::ShortLoop {
                    loop_index,
                    len: ring.len(),
                });
            }
            for (edge_index, &p1) in ring.iter().enumerate() {
                let p2 = ring[(edge_index + 1) % ring.len()];
                let seg = Segment::new(p1, p2).ok_or(CourseError::DegenerateEdge {
                    loop_index,
                    edge_index,
                })?;
                segments.push(seg);
            }
        }
        Ok(Self {
            segments,
            spawn: course.spawn,
            goal: course.goal,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn spawn(&self) -> DVec2 {
        self.spawn
    }

    pub fn goal(&self) -> Option<GoalRect> {
        self.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<DVec2> {
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(50.0, 60.0),
        ]
    }

    #[test]
    fn test_loop_wraps_closed() {
        let course = Course {
            loops: vec![triangle()],
            spawn: DVec2::ZERO,
            goal: None,
        };
        let terrain = Terrain::build(&course).unwrap();
        assert_eq!(terrain.segments().len(), 3);
        // Last edge wraps back to the first vertex
        let last = &terrain.segments()[2];
        assert_eq!(last.p2(), DVec2::ZERO);
    }

    #[test]
    fn test_short_loop_rejected() {
        let course = Course {
            loops: vec![vec![DVec2::ZERO, DVec2::new(1.0, 0.0)]],
            spawn: DVec2::ZERO,
            goal: None,
        };
        assert_eq!(
            Terrain::build(&course),
            Err(CourseError::ShortLoop {
                loop_index: 0,
                len: 2
            })
        );
    }

    #[test]
    fn test_degenerate_edge_rejected() {
        let mut ring = triangle();
        ring.push(DVec2::ZERO); // duplicates the wrap target
        let course = Course {
            loops: vec![ring],
            spawn: DVec2::ZERO,
            goal: None,
        };
        assert_eq!(
            Terrain::build(&course),
            Err(CourseError::DegenerateEdge {
                loop_index: 0,
                edge_index: 3
            })
        );
    }

    #[test]
    fn test_goal_rect_normalizes_corners() {
        let goal = GoalRect::new(DVec2::new(5.0, -1.0), DVec2::new(2.0, 3.0));
        assert!(goal.contains(DVec2::new(3.0, 0.0)));
        assert!(!goal.contains(DVec2::new(6.0, 0.0)));
    }

    #[test]
    fn test_course_json_round_trip() {
        let course = Course {
            loops: vec![triangle()],
            spawn: DVec2::new(50.0, -5.0),
            goal: Some(GoalRect::new(DVec2::new(60.0, -3.0), DVec2::new(70.0, 0.0))),
        };
        let json = serde_json::to_string(&course).unwrap();
        let back: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(back.spawn, course.spawn);
        assert_eq!(back.goal, course.goal);
        assert_eq!(back.loops, course.loops);
    }
}
