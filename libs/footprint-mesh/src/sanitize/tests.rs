//! # Sanitizer Tests
//!
//! Repair, rejection and ring opening.

use super::*;
use crate::diagnostics::SkipKind;
use geo::{polygon, Coord};
use glam::DVec2;

fn frame() -> ReferenceFrame {
    ReferenceFrame::new(DVec2::ZERO)
}

fn footprint(polygon: Polygon<f64>) -> Footprint {
    Footprint::new(polygon, 10.0)
}

fn closed_ring(points: &[(f64, f64)]) -> Polygon<f64> {
    Polygon::new(LineString::from(points.to_vec()), vec![])
}

#[test]
fn test_square_passes() {
    let square = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
    let ring = sanitize(&footprint(square), &frame(), &SanitizeOptions::default()).unwrap();
    assert_eq!(ring.exterior.len(), 4);
    assert!(ring.holes.is_empty());
    assert!(ring.exterior.iter().all(|p| p.z == 0.0));
}

#[test]
fn test_ring_is_translated_by_origin() {
    let square = polygon![(x: 100.0, y: 50.0), (x: 110.0, y: 50.0), (x: 110.0, y: 60.0), (x: 100.0, y: 60.0)];
    let frame = ReferenceFrame::new(DVec2::new(105.0, 55.0));
    let ring = sanitize(&footprint(square), &frame, &SanitizeOptions::default()).unwrap();
    for p in &ring.exterior {
        assert!((p.x.abs() - 5.0).abs() < 1e-6);
        assert!((p.y.abs() - 5.0).abs() < 1e-6);
    }
}

#[test]
fn test_exterior_is_counter_clockwise() {
    // Clockwise input
    let square = closed_ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
    let ring = sanitize(&footprint(square), &frame(), &SanitizeOptions::default()).unwrap();
    let signed_area: f64 = ring
        .exterior
        .iter()
        .zip(ring.exterior.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    assert!(signed_area > 0.0);
}

#[test]
fn test_bowtie_is_repaired() {
    let bowtie = closed_ring(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]);
    let ring = sanitize(&footprint(bowtie), &frame(), &SanitizeOptions::default()).unwrap();
    assert!(ring.exterior.len() >= 3);
}

#[test]
fn test_repair_keeps_simple_polygon_area() {
    let square = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)];
    let repaired = repair(&square).unwrap();
    assert!((repaired.unsigned_area() - 16.0).abs() < 1e-6);
}

#[test]
fn test_empty_polygon_is_invalid() {
    let empty = Polygon::new(LineString::new(vec![]), vec![]);
    let err = sanitize(&footprint(empty), &frame(), &SanitizeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), SkipKind::InvalidGeometry);
}

#[test]
fn test_non_finite_is_invalid() {
    let broken = closed_ring(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let err = sanitize(&footprint(broken), &frame(), &SanitizeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), SkipKind::InvalidGeometry);
}

#[test]
fn test_collinear_ring_is_degenerate() {
    let line = closed_ring(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0), (0.0, 0.0)]);
    let err = sanitize(&footprint(line), &frame(), &SanitizeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), SkipKind::DegenerateGeometry);
}

#[test]
fn test_sliver_is_degenerate() {
    let sliver = closed_ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1e-12), (0.0, 0.0)]);
    let err = sanitize(&footprint(sliver), &frame(), &SanitizeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), SkipKind::DegenerateGeometry);
}

#[test]
fn test_repair_ignores_repeated_closing_point() {
    for (x, y) in [(0.0, 0.0), (690_000.0, 5_335_000.0)] {
        let doubled = closed_ring(&[
            (x, y),
            (x + 10.0, y),
            (x + 10.0, y + 10.0),
            (x, y + 10.0),
            (x, y),
            (x, y),
        ]);
        let repaired = repair(&doubled).unwrap();
        assert!((repaired.unsigned_area() - 100.0).abs() < 1e-6);
    }
}

#[test]
fn test_repeated_closing_point_gives_same_ring() {
    let plain = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
    let doubled = closed_ring(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
        (0.0, 0.0),
    ]);
    let options = SanitizeOptions::default();
    assert_eq!(
        sanitize(&footprint(plain), &frame(), &options).unwrap(),
        sanitize(&footprint(doubled), &frame(), &options).unwrap()
    );
}

#[test]
fn test_pinched_ring_keeps_largest_part() {
    // Two squares touching at (1, 1)
    let pinched = closed_ring(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (3.0, 1.0),
        (3.0, 3.0),
        (1.0, 3.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (0.0, 0.0),
    ]);
    let repaired = repair(&pinched).unwrap();
    assert!((repaired.unsigned_area() - 4.0).abs() < 1e-6);

    let parts = repair_parts(&pinched).unwrap();
    assert_eq!(parts.part_count, 2);
    assert!((parts.discarded_area - 1.0).abs() < 1e-6);
}

#[test]
fn test_repair_of_empty_exterior_is_invalid() {
    let empty = Polygon::new(LineString::new(vec![]), vec![]);
    assert_eq!(repair(&empty).unwrap_err().kind(), SkipKind::InvalidGeometry);
}

#[test]
fn test_two_point_ring_never_passes() {
    let sliver = closed_ring(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]);
    assert!(sanitize(&footprint(sliver), &frame(), &SanitizeOptions::default()).is_err());
}

#[test]
fn test_open_ring_drops_closing_duplicate() {
    let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let open = open_ring(&ring, &frame());
    assert_eq!(open.len(), 3);
    assert_ne!(open.first(), open.last());
}

#[test]
fn test_open_ring_collapses_repeated_points() {
    let ring = LineString(vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 1.0, y: 1.0 },
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 0.0, y: 0.0 },
    ]);
    let open = open_ring(&ring, &frame());
    assert_eq!(open.len(), 3);
}

#[test]
fn test_open_ring_without_closing_point_is_unchanged() {
    let ring = LineString(vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 1.0, y: 1.0 },
    ]);
    let open = open_ring(&ring, &frame());
    assert_eq!(open.len(), 3);
}

#[test]
fn test_check_ring_rejects_zero_extent() {
    let points = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 2.0, 0.0),
    ];
    let err = check_ring(&points, &SanitizeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), SkipKind::DegenerateGeometry);
}

#[test]
fn test_area_epsilon_is_configurable() {
    let tiny = polygon![(x: 0.0, y: 0.0), (x: 0.01, y: 0.0), (x: 0.01, y: 0.01), (x: 0.0, y: 0.01)];
    let strict = SanitizeOptions {
        area_epsilon: 1.0,
        ..Default::default()
    };
    let err = sanitize(&footprint(tiny.clone()), &frame(), &strict).unwrap_err();
    assert_eq!(err.kind(), SkipKind::DegenerateGeometry);
    assert!(sanitize(&footprint(tiny), &frame(), &SanitizeOptions::default()).is_ok());
}

#[test]
fn test_holes_are_dropped_by_default_and_kept_on_request() {
    let courtyard = Polygon::new(
        LineString::from(vec![(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0), (0.0, 0.0)]),
        vec![LineString::from(vec![
            (5.0, 5.0),
            (15.0, 5.0),
            (15.0, 15.0),
            (5.0, 15.0),
            (5.0, 5.0),
        ])],
    );

    let filled = sanitize(&footprint(courtyard.clone()), &frame(), &SanitizeOptions::default())
        .unwrap();
    assert!(filled.holes.is_empty());

    let options = SanitizeOptions {
        keep_holes: true,
        ..Default::default()
    };
    let with_hole = sanitize(&footprint(courtyard), &frame(), &options).unwrap();
    assert_eq!(with_hole.holes.len(), 1);
    assert_eq!(with_hole.holes[0].len(), 4);
    assert_eq!(with_hole.vertex_count(), 8);
    assert_eq!(with_hole.rings().count(), 2);
}
