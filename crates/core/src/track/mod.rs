//! The closed loop of waypoints both actors walk along.

mod builtin;
mod import;

use geo::{BoundingRect, Distance, Haversine, MultiPoint, Point};

use crate::error::{ChaseError, Result};

/// Ordered, cyclic sequence of (longitude, latitude) points.
///
/// Immutable after construction and always holds at least two finite points,
/// so every signed index resolves to a waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointTrack {
    points: Vec<Point>,
}

impl WaypointTrack {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < 2 {
            return Err(ChaseError::InvalidTrack(format!(
                "a track needs at least 2 waypoints, got {}",
                points.len()
            )));
        }

        if let Some(index) = points
            .iter()
            .position(|p| !p.x().is_finite() || !p.y().is_finite())
        {
            return Err(ChaseError::InvalidTrack(format!(
                "waypoint {index} has a non-finite coordinate"
            )));
        }

        Ok(Self { points })
    }

    /// Waypoint at `index mod len`; negative indices wrap backwards.
    pub fn at(&self, index: i64) -> Point {
        self.points[self.wrap(index)]
    }

    /// Normalize any signed index into `[0, len)`.
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.points.len() as i64) as usize
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Index of the waypoint nearest to `target` by planar (Euclidean)
    /// distance in degree space. Ties resolve to the lowest index.
    pub fn closest_index(&self, target: Point) -> usize {
        let mut closest = 0;
        let mut min_distance_2 = f64::INFINITY;

        for (index, point) in self.points.iter().enumerate() {
            let dx = point.x() - target.x();
            let dy = point.y() - target.y();
            let distance_2 = dx * dx + dy * dy;

            if distance_2 < min_distance_2 {
                min_distance_2 = distance_2;
                closest = index;
            }
        }

        closest
    }

    /// Centre of the track's bounding box.
    pub fn center(&self) -> Point {
        MultiPoint::new(self.points.clone())
            .bounding_rect()
            .map(|rect| rect.center().into())
            .unwrap_or(self.points[0])
    }

    /// Length of the closed loop in meters, including the closing segment.
    pub fn length_m(&self) -> f64 {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
            .map(|(a, b)| Haversine.distance(*a, *b))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> WaypointTrack {
        WaypointTrack::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_short_track() {
        let result = WaypointTrack::new(vec![Point::new(0.0, 0.0)]);
        assert!(matches!(result, Err(ChaseError::InvalidTrack(_))));
    }

    #[test]
    fn test_rejects_non_finite_waypoint() {
        let result = WaypointTrack::new(vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)]);
        assert!(matches!(result, Err(ChaseError::InvalidTrack(_))));
    }

    #[test]
    fn test_at_wraps_in_both_directions() {
        let track = square();
        assert_eq!(track.at(0), Point::new(0.0, 0.0));
        assert_eq!(track.at(4), Point::new(0.0, 0.0));
        assert_eq!(track.at(6), Point::new(1.0, 1.0));
        assert_eq!(track.at(-1), Point::new(0.0, 1.0));
        assert_eq!(track.at(-9), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_closest_index_exact_points() {
        let track = WaypointTrack::jingshan_park();
        for index in 0..track.len() {
            assert_eq!(track.closest_index(track.at(index as i64)), index);
        }
    }

    #[test]
    fn test_closest_index_snaps_nearby_point() {
        let track = square();
        assert_eq!(track.closest_index(Point::new(0.9, 0.1)), 1);
        assert_eq!(track.closest_index(Point::new(0.2, 1.3)), 3);
    }

    #[test]
    fn test_closest_index_ties_go_to_first() {
        let track = square();
        // Equidistant from all four corners
        assert_eq!(track.closest_index(Point::new(0.5, 0.5)), 0);
        // Equidistant from waypoints 1 and 2
        assert_eq!(track.closest_index(Point::new(2.0, 0.5)), 1);
    }

    #[test]
    fn test_center_of_square() {
        assert_eq!(square().center(), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_length_includes_closing_segment() {
        let track = WaypointTrack::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]).unwrap();
        let one_degree = Haversine.distance(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        approx::assert_relative_eq!(track.length_m(), 2.0 * one_degree, epsilon = 1e-6);
    }
}
