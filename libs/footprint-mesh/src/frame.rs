//! # Reference Frame
//!
//! One shared origin per batch. All footprints are translated by `-origin`
//! before triangulation so exported coordinates stay small, and so every
//! mesh of a batch lives in the same scene coordinates.
//!
//! The origin is the centroid of the union of all (projected) footprints.

use geo::{
    BooleanOps, Centroid, Coord, CoordsIter, MultiPoint, MultiPolygon, Point, RemoveRepeatedPoints,
};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::footprint::Footprint;

/// Batch-wide translation applied to every footprint.
///
/// Immutable once computed; there is no way to move the origin of an
/// existing frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    origin: DVec2,
}

impl ReferenceFrame {
    /// Creates a frame with an explicit origin.
    pub fn new(origin: DVec2) -> Self {
        Self { origin }
    }

    /// Computes the frame of a batch from its projected footprints.
    ///
    /// # Errors
    ///
    /// [`PipelineError::EmptyBatch`] when `footprints` is empty, or when no
    /// centroid can be defined at all (every coordinate non-finite).
    pub fn from_footprints(footprints: &[Footprint]) -> PipelineResult<Self> {
        if footprints.is_empty() {
            return Err(PipelineError::empty_batch(
                "no footprints to center the reference frame on",
            ));
        }

        let union = union_all(footprints);
        let centroid = union
            .centroid()
            .filter(|point| point.x().is_finite() && point.y().is_finite())
            .or_else(|| {
                log::debug!("footprint union has no area, falling back to vertex centroid");
                vertex_centroid(footprints)
            })
            .ok_or_else(|| PipelineError::empty_batch("footprints have no usable coordinates"))?;

        let frame = Self::new(DVec2::new(centroid.x(), centroid.y()));
        log::debug!(
            "reference frame origin ({:.3}, {:.3}) from {} footprints",
            frame.origin.x,
            frame.origin.y,
            footprints.len()
        );
        Ok(frame)
    }

    /// Returns the origin in projected coordinates.
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Translates a projected coordinate into the frame, at z = 0.
    #[inline]
    pub fn to_local(&self, coord: Coord<f64>) -> DVec3 {
        DVec3::new(coord.x - self.origin.x, coord.y - self.origin.y, 0.0)
    }

    /// Translates a frame-relative point back to projected coordinates.
    #[inline]
    pub fn to_world(&self, local: DVec2) -> DVec2 {
        local + self.origin
    }
}

/// Unions all footprints; overlapping footprints count once.
///
/// Repeated points are removed first, then neighbours are unioned in
/// balanced pairs so each level halves the number of operands.
fn union_all(footprints: &[Footprint]) -> MultiPolygon<f64> {
    let mut layer: Vec<MultiPolygon<f64>> = footprints
        .iter()
        .map(|footprint| MultiPolygon::new(vec![footprint.polygon.remove_repeated_points()]))
        .collect();

    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut operands = layer.into_iter();
        while let Some(left) = operands.next() {
            next.push(match operands.next() {
                Some(right) => left.union(&right),
                None => left,
            });
        }
        layer = next;
    }

    layer.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

fn vertex_centroid(footprints: &[Footprint]) -> Option<Point<f64>> {
    let points: MultiPoint<f64> = footprints
        .iter()
        .flat_map(|footprint| footprint.polygon.exterior_coords_iter())
        .filter(|coord| coord.x.is_finite() && coord.y.is_finite())
        .map(Point::from)
        .collect();
    points.centroid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{polygon, LineString, Polygon};

    fn square(x: f64, y: f64, size: f64) -> Footprint {
        Footprint::new(
            polygon![
                (x: x, y: y),
                (x: x + size, y: y),
                (x: x + size, y: y + size),
                (x: x, y: y + size)
            ],
            10.0,
        )
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let err = ReferenceFrame::from_footprints(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyBatch(_)));
    }

    #[test]
    fn test_single_square_centroid() {
        let frame = ReferenceFrame::from_footprints(&[square(100.0, 200.0, 10.0)]).unwrap();
        assert_relative_eq!(frame.origin().x, 105.0, epsilon = 1e-6);
        assert_relative_eq!(frame.origin().y, 205.0, epsilon = 1e-6);
    }

    #[test]
    fn test_two_equal_squares() {
        let frame =
            ReferenceFrame::from_footprints(&[square(0.0, 0.0, 10.0), square(90.0, 0.0, 10.0)])
                .unwrap();
        assert_relative_eq!(frame.origin().x, 50.0, epsilon = 1e-6);
        assert_relative_eq!(frame.origin().y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_overlap_is_dissolved() {
        // The same square twice must not weigh more than once
        let frame = ReferenceFrame::from_footprints(&[
            square(0.0, 0.0, 10.0),
            square(0.0, 0.0, 10.0),
            square(20.0, 0.0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(frame.origin().x, 15.0, epsilon = 1e-6);
    }

    #[test]
    fn test_repeated_closing_point_keeps_centroid() {
        let doubled = Footprint::new(
            Polygon::new(
                LineString::from(vec![
                    (0.0, 0.0),
                    (10.0, 0.0),
                    (10.0, 10.0),
                    (0.0, 10.0),
                    (0.0, 0.0),
                    (0.0, 0.0),
                ]),
                vec![],
            ),
            5.0,
        );
        let frame = ReferenceFrame::from_footprints(&[doubled]).unwrap();
        assert_relative_eq!(frame.origin().x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(frame.origin().y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_odd_batch_unions_every_footprint() {
        // Five disjoint squares along x; the unpaired last one must survive
        let footprints: Vec<Footprint> =
            (0..5).map(|i| square(i as f64 * 20.0, 0.0, 10.0)).collect();
        assert_eq!(union_all(&footprints).0.len(), 5);

        let frame = ReferenceFrame::from_footprints(&footprints).unwrap();
        assert_relative_eq!(frame.origin().x, 45.0, epsilon = 1e-6);
        assert_relative_eq!(frame.origin().y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_area_falls_back_to_vertices() {
        let line = Footprint::new(
            Polygon::new(
                LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]),
                vec![],
            ),
            5.0,
        );
        let frame = ReferenceFrame::from_footprints(&[line]).unwrap();
        assert!(frame.origin().x.is_finite());
        assert_relative_eq!(frame.origin().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_local_and_world_round_trip() {
        let frame = ReferenceFrame::new(DVec2::new(691_000.0, 5_335_000.0));
        let local = frame.to_local(Coord { x: 691_010.0, y: 5_334_990.0 });
        assert_eq!(local, DVec3::new(10.0, -10.0, 0.0));
        assert_eq!(frame.to_world(local.truncate()), DVec2::new(691_010.0, 5_334_990.0));
    }
}
