//! Static terrain segments
//!
//! Each segment is one edge of a course polygon. Length, unit normal and
//! slope angle are cached at construction since the terrain never moves
//! for the lifetime of an episode.

use glam::DVec2;

/// An immutable terrain edge.
///
/// The normal is the edge direction rotated -90°, so for a floor running
/// left to right it points up (toward negative y).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    p1: DVec2,
    p2: DVec2,
    length: f64,
    normal: DVec2,
    slope_angle: f64,
    normal_angle: f64,
}

impl Segment {
    /// Build a segment from two endpoints.
    ///
    /// Returns `None` for a degenerate zero-length edge; terrain
    /// construction rejects those up front.
    pub fn new(p1: DVec2, p2: DVec2) -> Option<Self> {
        let edge = p2 - p1;
        let length = edge.length();
        if length <= f64::EPSILON {
            return None;
        }
        let dir = edge / length;
        let normal = DVec2::new(dir.y, -dir.x);
        Some(Self {
            p1,
            p2,
            length,
            normal,
            slope_angle: dir.y.atan2(dir.x),
            normal_angle: normal.y.atan2(normal.x),
        })
    }

    #[inline]
    pub fn p1(&self) -> DVec2 {
        self.p1
    }

    #[inline]
    pub fn p2(&self) -> DVec2 {
        self.p2
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Unit normal (edge direction rotated -90°)
    #[inline]
    pub fn normal(&self) -> DVec2 {
        self.normal
    }

    /// Angle of the edge direction
    #[inline]
    pub fn slope_angle(&self) -> f64 {
        self.slope_angle
    }

    /// Angle of the normal
    #[inline]
    pub fn normal_angle(&self) -> f64 {
        self.normal_angle
    }

    /// Unit vector along the edge
    #[inline]
    pub fn tangent(&self) -> DVec2 {
        DVec2::new(self.slope_angle.cos(), self.slope_angle.sin())
    }

    /// Signed perpendicular offset of a point from the segment's line
    /// (positive on the normal side)
    #[inline]
    pub fn side_offset(&self, point: DVec2) -> f64 {
        (point - self.p1).dot(self.normal)
    }

    /// Projection parameter of a point onto the segment's line
    /// (0 at `p1`, 1 at `p2`)
    #[inline]
    pub fn project(&self, point: DVec2) -> f64 {
        (point - self.p1).dot(self.p2 - self.p1) / (self.length * self.length)
    }

    /// Gap between a circular body's surface and this segment.
    ///
    /// Falls back to point-to-circle distance at whichever endpoint is
    /// nearer when the body's projection lands outside the edge.
    /// Negative means the body overlaps the segment.
    pub fn distance_from(&self, center: DVec2, radius: f64) -> f64 {
        let u = self.project(center);
        if u <= 0.0 {
            (center - self.p1).length() - radius
        } else if u >= 1.0 {
            (center - self.p2).length() - radius
        } else {
            self.side_offset(center).abs() - radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    fn floor() -> Segment {
        Segment::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)).unwrap()
    }

    #[test]
    fn test_zero_length_rejected() {
        let p = DVec2::new(3.0, 4.0);
        assert!(Segment::new(p, p).is_none());
    }

    #[test]
    fn test_floor_normal_points_up() {
        let seg = floor();
        assert!((seg.normal() - DVec2::new(0.0, -1.0)).length() < 1e-12);
        assert_eq!(seg.length(), 10.0);
        assert_eq!(seg.slope_angle(), 0.0);
    }

    #[test]
    fn test_diagonal_angles() {
        let seg = Segment::new(DVec2::ZERO, DVec2::new(1.0, 1.0)).unwrap();
        assert!((seg.slope_angle() - FRAC_PI_4).abs() < 1e-12);
        assert!((seg.normal_angle() - (FRAC_PI_4 - std::f64::consts::FRAC_PI_2)).abs() < 1e-12);
        assert!((seg.tangent() - DVec2::new(1.0, 1.0).normalize()).length() < 1e-12);
    }

    #[test]
    fn test_distance_above_interior() {
        // Body at (5,3) with radius 1 hovers 2 units off the surface
        let d = floor().distance_from(DVec2::new(5.0, 3.0), 1.0);
        assert!((d - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_beyond_endpoint() {
        // Projection falls left of p1: clipped to point-to-circle distance
        let d = floor().distance_from(DVec2::new(-2.0, 0.0), 1.0);
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_negative_when_overlapping() {
        let d = floor().distance_from(DVec2::new(5.0, 0.5), 1.0);
        assert!((d - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_side_offset_sign() {
        let seg = floor();
        // Normal points toward -y, so points above the floor are positive
        assert!(seg.side_offset(DVec2::new(5.0, -3.0)) > 0.0);
        assert!(seg.side_offset(DVec2::new(5.0, 3.0)) < 0.0);
    }
}
