//! # Polygon Sanitizer
//!
//! Per-footprint repair and rejection. Steps, in order:
//!
//! 1. Reject empty or non-finite geometry
//! 2. Zero-distance repair (repeated points, self-intersections, precision
//!    noise)
//! 3. Reject zero area and rings with fewer than 3 points
//! 4. Translate into the reference frame at z = 0
//! 5. Drop the duplicate closing vertex
//! 6. Reject rings with no extent on x or y
//!
//! The output is an open, origin-relative ring ready for triangulation.

use config::constants::{AREA_EPSILON, EXTENT_EPSILON};
use geo::orient::{Direction, Orient};
use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon, RemoveRepeatedPoints};
use glam::DVec3;

use crate::error::{FootprintError, FootprintResult};
use crate::footprint::Footprint;
use crate::frame::ReferenceFrame;

/// Tunables for the sanitizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeOptions {
    /// Keep interior rings (courtyards) instead of filling them.
    pub keep_holes: bool,
    /// Areas at or below this are degenerate.
    pub area_epsilon: f64,
    /// Bounding-box extents at or below this are degenerate.
    pub extent_epsilon: f64,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            keep_holes: false,
            area_epsilon: AREA_EPSILON,
            extent_epsilon: EXTENT_EPSILON,
        }
    }
}

/// An open, origin-relative footprint outline with z = 0.
///
/// The exterior is counter-clockwise; holes are clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRing {
    /// Outer boundary, without a closing duplicate
    pub exterior: Vec<DVec3>,
    /// Interior rings, empty unless holes are kept
    pub holes: Vec<Vec<DVec3>>,
}

impl CleanRing {
    /// Creates a ring without holes.
    pub fn new(exterior: Vec<DVec3>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Total number of points over all rings.
    pub fn vertex_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Iterates over the exterior followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &[DVec3]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// Sanitizes one footprint into a [`CleanRing`].
///
/// # Errors
///
/// - [`FootprintError::InvalidGeometry`] for empty or non-finite geometry
/// - [`FootprintError::DegenerateGeometry`] for zero area (including
///   geometry the repair reduces to nothing), too few points or zero extent
pub fn sanitize(
    footprint: &Footprint,
    frame: &ReferenceFrame,
    options: &SanitizeOptions,
) -> FootprintResult<CleanRing> {
    let polygon = &footprint.polygon;
    if polygon.exterior().0.is_empty() {
        return Err(FootprintError::invalid("exterior ring is empty"));
    }
    let all_finite = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.0.iter())
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !all_finite {
        return Err(FootprintError::invalid("ring contains non-finite coordinates"));
    }

    let Repaired {
        polygon: repaired,
        part_count,
        discarded_area,
    } = repair_parts(polygon)?;
    if part_count > 1 {
        log::warn!(
            "{}: repair split the footprint into {part_count} parts, keeping the largest and discarding {discarded_area:.3} of area",
            footprint.display_name()
        );
    }

    let area = repaired.unsigned_area();
    if area <= options.area_epsilon {
        return Err(FootprintError::degenerate(format!(
            "area {area:e} is at or below {:e}",
            options.area_epsilon
        )));
    }
    if repaired.exterior().0.len() < 3 {
        return Err(FootprintError::degenerate(format!(
            "exterior ring has {} points",
            repaired.exterior().0.len()
        )));
    }

    let oriented = repaired.orient(Direction::Default);
    let exterior = open_ring(oriented.exterior(), frame);
    check_ring(&exterior, options)?;

    let mut holes = Vec::new();
    if options.keep_holes {
        for (index, interior) in oriented.interiors().iter().enumerate() {
            let hole = open_ring(interior, frame);
            match check_ring(&hole, options) {
                Ok(()) => holes.push(hole),
                Err(err) => log::debug!(
                    "{}: dropping hole {index}: {err}",
                    footprint.display_name()
                ),
            }
        }
    }

    Ok(CleanRing { exterior, holes })
}

/// Zero-distance repair: a boolean union with nothing.
///
/// Repeated points are removed first. Self-intersecting rings are split into
/// their simple parts; when more than one part remains, the one with the
/// largest area is kept.
///
/// # Errors
///
/// - [`FootprintError::InvalidGeometry`] for an empty exterior
/// - [`FootprintError::DegenerateGeometry`] when nothing with area remains
pub fn repair(polygon: &Polygon<f64>) -> FootprintResult<Polygon<f64>> {
    repair_parts(polygon).map(|repaired| repaired.polygon)
}

/// Output of a repair, with what was discarded.
struct Repaired {
    polygon: Polygon<f64>,
    part_count: usize,
    discarded_area: f64,
}

fn repair_parts(polygon: &Polygon<f64>) -> FootprintResult<Repaired> {
    if polygon.exterior().0.is_empty() {
        return Err(FootprintError::invalid("exterior ring is empty"));
    }

    let cleaned = polygon.remove_repeated_points();
    let unioned = MultiPolygon::new(vec![cleaned]).union(&MultiPolygon::new(Vec::new()));
    let part_count = unioned.0.len();
    let total_area = unioned.unsigned_area();

    let largest = unioned
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or_else(|| FootprintError::degenerate("repair left no area"))?;

    let discarded_area = total_area - largest.unsigned_area();
    Ok(Repaired {
        polygon: largest,
        part_count,
        discarded_area,
    })
}

/// Translates a closed ring into the frame and opens it.
///
/// The closing duplicate is dropped, then consecutive duplicates collapse.
pub fn open_ring(ring: &LineString<f64>, frame: &ReferenceFrame) -> Vec<DVec3> {
    let mut points: Vec<DVec3> = ring.0.iter().map(|coord| frame.to_local(*coord)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Rejects rings that cannot be triangulated.
fn check_ring(points: &[DVec3], options: &SanitizeOptions) -> FootprintResult<()> {
    if points.len() < 3 {
        return Err(FootprintError::degenerate(format!(
            "ring has {} distinct points",
            points.len()
        )));
    }

    let (min, max) = points.iter().fold(
        (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    );
    let extent = max - min;
    if extent.x <= options.extent_epsilon || extent.y <= options.extent_epsilon {
        return Err(FootprintError::degenerate(
            "all points lie on a line or a single point",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
