//! Boundary Geometry
//!
//! Wraps the district polygon and answers the geometry queries the engine
//! needs: containment, centroid, bounding box, and nearest-boundary-point
//! projection. A polygon is validated once at construction; queries never
//! fail.
//!
//! Containment is boundary-inclusive: a point exactly on the exterior
//! ring (or on a hole ring) counts as contained. Projection relies on
//! this, since projected points land exactly on the ring.

use bevy_ecs::prelude::*;
use geo::{Area, BoundingRect, Centroid, Closest, ClosestPoint, Intersects};
use geo::{Coord, Line, Point, Polygon, Rect};
use thiserror::Error;

/// A polygon that failed validation at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidBoundary {
    #[error("exterior ring has fewer than 3 distinct vertices")]
    DegenerateRing,
    #[error("polygon has zero area")]
    ZeroArea,
    #[error("polygon centroid is undefined")]
    DegenerateCentroid,
    #[error("exterior ring self-intersects")]
    SelfIntersecting,
}

/// A validated simple polygon with derived centroid and bounding box.
#[derive(Debug, Clone)]
pub struct BoundaryGeometry {
    polygon: Polygon<f64>,
    centroid: Coord<f64>,
    bounds: Rect<f64>,
}

impl BoundaryGeometry {
    /// Validates and wraps a polygon.
    ///
    /// Rejects degenerate rings (fewer than 3 distinct vertices), zero
    /// area, undefined centroids, and self-intersecting exterior rings
    /// (pairwise segment scan over non-adjacent segments).
    pub fn new(polygon: Polygon<f64>) -> Result<Self, InvalidBoundary> {
        let mut distinct: Vec<Coord<f64>> = Vec::new();
        for &c in polygon.exterior().coords() {
            if !distinct.contains(&c) {
                distinct.push(c);
            }
        }
        if distinct.len() < 3 {
            return Err(InvalidBoundary::DegenerateRing);
        }

        let segments: Vec<Line<f64>> = polygon
            .exterior()
            .lines()
            .filter(|l| l.start != l.end)
            .collect();
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                let shares_endpoint = a.start == b.start
                    || a.start == b.end
                    || a.end == b.start
                    || a.end == b.end;
                if shares_endpoint {
                    continue;
                }
                if a.intersects(b) {
                    return Err(InvalidBoundary::SelfIntersecting);
                }
            }
        }

        let area = polygon.unsigned_area();
        if !(area > 0.0) {
            return Err(InvalidBoundary::ZeroArea);
        }

        let centroid = polygon
            .centroid()
            .ok_or(InvalidBoundary::DegenerateCentroid)?
            .into();
        let bounds = polygon
            .bounding_rect()
            .ok_or(InvalidBoundary::DegenerateRing)?;

        Ok(Self {
            polygon,
            centroid,
            bounds,
        })
    }

    /// True iff the point lies within the exterior ring and outside every
    /// hole. Boundary-inclusive: points exactly on a ring are contained.
    pub fn contains(&self, point: Coord<f64>) -> bool {
        self.polygon.intersects(&point)
    }

    /// Area-weighted geometric centroid of the polygon.
    pub fn centroid(&self) -> Coord<f64> {
        self.centroid
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// The underlying polygon.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Returns `point` unchanged when it is contained; otherwise the
    /// closest point on the exterior ring, the global minimum over
    /// per-segment nearest-point projections.
    pub fn project_to_boundary(&self, point: Coord<f64>) -> Coord<f64> {
        if self.contains(point) {
            return point;
        }
        let target = Point::from(point);
        let mut best = point;
        let mut best_distance = f64::INFINITY;
        for segment in self.polygon.exterior().lines() {
            let candidate: Coord<f64> = match segment.closest_point(&target) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => p.into(),
                Closest::Indeterminate => continue,
            };
            let distance = euclidean(point, candidate);
            if distance < best_distance {
                best_distance = distance;
                best = candidate;
            }
        }
        best
    }
}

fn euclidean(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// The district boundary a run is constrained by, as a world resource.
#[derive(Resource, Debug, Clone)]
pub struct SimBoundary {
    /// Name the boundary was selected by; carried into snapshots.
    pub name: String,
    pub geometry: BoundaryGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, LineString};

    fn unit_square() -> BoundaryGeometry {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        BoundaryGeometry::new(polygon).unwrap()
    }

    fn l_shape() -> BoundaryGeometry {
        let polygon = Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 1.0),
                (1.0, 1.0),
                (1.0, 2.0),
                (0.0, 2.0),
            ]),
            vec![],
        );
        BoundaryGeometry::new(polygon).unwrap()
    }

    fn annulus() -> BoundaryGeometry {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            vec![LineString::from(vec![
                (1.5, 1.5),
                (2.5, 1.5),
                (2.5, 2.5),
                (1.5, 2.5),
            ])],
        );
        BoundaryGeometry::new(polygon).unwrap()
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let boundary = unit_square();
        assert!(boundary.contains(coord! { x: 0.5, y: 0.5 }));
        assert!(!boundary.contains(coord! { x: 1.5, y: 0.5 }));
        assert!(!boundary.contains(coord! { x: -0.1, y: 0.5 }));
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let boundary = unit_square();
        assert!(boundary.contains(coord! { x: 1.0, y: 0.5 }));
        assert!(boundary.contains(coord! { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_contains_excludes_holes() {
        let boundary = annulus();
        assert!(boundary.contains(coord! { x: 0.5, y: 0.5 }));
        assert!(!boundary.contains(coord! { x: 2.0, y: 2.0 }));
        // hole ring itself is still part of the polygon
        assert!(boundary.contains(coord! { x: 1.5, y: 2.0 }));
    }

    #[test]
    fn test_centroid_is_area_weighted() {
        let boundary = unit_square();
        let c = boundary.centroid();
        assert!((c.x - 0.5).abs() < 1e-12);
        assert!((c.y - 0.5).abs() < 1e-12);

        // The L-shape centroid differs from the vertex average (1, 1):
        // two axis-aligned rectangles of area 2 and 1 give (5/6, 5/6).
        let boundary = l_shape();
        let c = boundary.centroid();
        assert!((c.x - 5.0 / 6.0).abs() < 1e-9);
        assert!((c.y - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds() {
        let boundary = l_shape();
        let bounds = boundary.bounds();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, 0.0);
        assert_eq!(bounds.max().x, 2.0);
        assert_eq!(bounds.max().y, 2.0);
    }

    #[test]
    fn test_projection_onto_edge() {
        let boundary = unit_square();
        let projected = boundary.project_to_boundary(coord! { x: 1.5, y: 0.5 });
        assert_eq!(projected, coord! { x: 1.0, y: 0.5 });
    }

    #[test]
    fn test_projection_onto_corner() {
        let boundary = unit_square();
        let projected = boundary.project_to_boundary(coord! { x: 2.0, y: 2.0 });
        assert!((projected.x - 1.0).abs() < 1e-12);
        assert!((projected.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_projection_of_contained_point_is_identity() {
        let boundary = unit_square();
        let p = coord! { x: 0.25, y: 0.75 };
        assert_eq!(boundary.project_to_boundary(p), p);
    }

    #[test]
    fn test_projection_is_global_minimum() {
        // Compare against a brute-force scan of densely sampled boundary
        // points: no sampled point may be meaningfully closer than the
        // projection, and the projection itself must lie on the boundary.
        let boundary = l_shape();
        let outside = [
            coord! { x: 3.0, y: 0.4 },
            coord! { x: 1.7, y: 1.9 },
            coord! { x: -1.0, y: -1.0 },
            coord! { x: 2.5, y: 2.5 },
        ];
        for p in outside {
            let q = boundary.project_to_boundary(p);
            assert!(boundary.contains(q));
            let projected_distance = (p.x - q.x).hypot(p.y - q.y);

            let mut brute_min = f64::INFINITY;
            for segment in boundary.polygon().exterior().lines() {
                for i in 0..=1000 {
                    let t = i as f64 / 1000.0;
                    let sample = coord! {
                        x: segment.start.x + t * (segment.end.x - segment.start.x),
                        y: segment.start.y + t * (segment.end.y - segment.start.y),
                    };
                    let d = (p.x - sample.x).hypot(p.y - sample.y);
                    brute_min = brute_min.min(d);
                }
            }
            assert!(projected_distance <= brute_min + 1e-9);
        }
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let polygon = Polygon::new(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]), vec![]);
        assert_eq!(
            BoundaryGeometry::new(polygon).unwrap_err(),
            InvalidBoundary::DegenerateRing
        );
    }

    #[test]
    fn test_zero_area_rejected() {
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
            vec![],
        );
        assert_eq!(
            BoundaryGeometry::new(polygon).unwrap_err(),
            InvalidBoundary::ZeroArea
        );
    }

    #[test]
    fn test_self_intersection_rejected() {
        // bowtie
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]),
            vec![],
        );
        assert_eq!(
            BoundaryGeometry::new(polygon).unwrap_err(),
            InvalidBoundary::SelfIntersecting
        );
    }
}
