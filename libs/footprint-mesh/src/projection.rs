//! # Projections
//!
//! Reprojection of footprint geometry into one planar, metric coordinate
//! system. The [`Projection`] trait is the seam: callers can plug in any
//! reprojection capability. Two implementations ship with the crate:
//!
//! - [`Planar`]: input is already planar, coordinates pass through
//! - [`TransverseMercator`]: geographic lon/lat (GRS80) to UTM
//!
//! ## UTM Math
//!
//! Forward Transverse Mercator uses the Krüger series in the third flattening
//! `n`, truncated after the third order. Within a zone (and a few degrees
//! beyond, as EPSG:25832 is routinely used) this is accurate to well under a
//! millimetre.

use config::constants::{
    utm_central_meridian, ETRS89_UTM_ZONE, GRS80_INVERSE_FLATTENING, GRS80_SEMI_MAJOR_AXIS,
    UTM_FALSE_EASTING, UTM_FALSE_NORTHING_SOUTH, UTM_SCALE_FACTOR,
};
use geo::{Coord, MapCoords, Polygon};

use crate::diagnostics::{SkipRecord, Stage};
use crate::error::{FootprintError, ProjectionError};
use crate::footprint::Footprint;

/// Maps source coordinates into the working planar coordinate system.
pub trait Projection: Send + Sync {
    /// Identifier used in diagnostics (e.g. an EPSG code).
    fn name(&self) -> &str;

    /// Projects one coordinate.
    fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>, ProjectionError>;

    /// Projects every coordinate of a polygon.
    fn project_polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, ProjectionError> {
        polygon.try_map_coords(|coord| self.project(coord))
    }
}

// =============================================================================
// PLANAR
// =============================================================================

/// Identity projection for input that is already in a metric planar CRS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Planar;

impl Projection for Planar {
    fn name(&self) -> &str {
        "planar"
    }

    fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        if !(coord.x.is_finite() && coord.y.is_finite()) {
            return Err(ProjectionError {
                projection: self.name().to_string(),
                message: format!("non-finite coordinate ({}, {})", coord.x, coord.y),
            });
        }
        Ok(coord)
    }
}

// =============================================================================
// TRANSVERSE MERCATOR
// =============================================================================

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    /// False northing 0
    North,
    /// False northing 10 000 km
    South,
}

/// Forward UTM projection from geographic lon/lat degrees on GRS80.
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercator {
    name: String,
    central_meridian: f64,
    false_northing: f64,
    /// Rectifying radius times the central scale factor
    scaled_radius: f64,
    /// `2√n / (1 + n)`, used for the conformal latitude
    conformal_factor: f64,
    alpha: [f64; 3],
}

impl TransverseMercator {
    /// Creates the projection for a UTM zone (1..=60).
    pub fn utm(zone: u8, hemisphere: Hemisphere) -> Result<Self, ProjectionError> {
        let suffix = match hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        let name = format!("UTM {zone}{suffix}");
        if !(1..=60).contains(&zone) {
            return Err(ProjectionError {
                projection: name,
                message: format!("zone {zone} is outside 1..=60"),
            });
        }

        Ok(Self::build(name, zone, hemisphere))
    }

    /// ETRS89 / UTM zone 32N (EPSG:25832).
    pub fn etrs89_utm32n() -> Self {
        Self::build("EPSG:25832".to_string(), ETRS89_UTM_ZONE, Hemisphere::North)
    }

    fn build(name: String, zone: u8, hemisphere: Hemisphere) -> Self {
        let f = 1.0 / GRS80_INVERSE_FLATTENING;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let rectifying_radius =
            GRS80_SEMI_MAJOR_AXIS / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);

        Self {
            name,
            central_meridian: utm_central_meridian(zone).to_radians(),
            false_northing: match hemisphere {
                Hemisphere::North => 0.0,
                Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
            },
            scaled_radius: UTM_SCALE_FACTOR * rectifying_radius,
            conformal_factor: 2.0 * n.sqrt() / (1.0 + n),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
                61.0 * n3 / 240.0,
            ],
        }
    }

    fn error(&self, message: String) -> ProjectionError {
        ProjectionError {
            projection: self.name.clone(),
            message,
        }
    }
}

impl Projection for TransverseMercator {
    fn name(&self) -> &str {
        &self.name
    }

    fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        let (lon, lat) = (coord.x, coord.y);
        if !(lon.is_finite() && lat.is_finite()) {
            return Err(self.error(format!("non-finite coordinate ({lon}, {lat})")));
        }
        if lat.abs() >= 90.0 {
            return Err(self.error(format!("latitude {lat} is outside (-90, 90)")));
        }

        let phi = lat.to_radians();
        let d_lambda = lon.to_radians() - self.central_meridian;
        let c = self.conformal_factor;

        let t = (phi.sin().atanh() - c * (c * phi.sin()).atanh()).sinh();
        let xi = t.atan2(d_lambda.cos());
        let eta = (d_lambda.sin() / (1.0 + t * t).sqrt()).atanh();
        if !eta.is_finite() {
            return Err(self.error(format!("longitude {lon} is 90° from the central meridian")));
        }

        let (mut easting, mut northing) = (eta, xi);
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            easting += alpha * (k * xi).cos() * (k * eta).sinh();
            northing += alpha * (k * xi).sin() * (k * eta).cosh();
        }

        Ok(Coord {
            x: UTM_FALSE_EASTING + self.scaled_radius * easting,
            y: self.false_northing + self.scaled_radius * northing,
        })
    }
}

// =============================================================================
// BATCH REPROJECTION
// =============================================================================

/// Reprojects every footprint; failures are returned as skip records.
pub fn project_footprints(
    footprints: Vec<Footprint>,
    projection: &dyn Projection,
) -> (Vec<Footprint>, Vec<SkipRecord>) {
    let mut projected = Vec::with_capacity(footprints.len());
    let mut skipped = Vec::new();

    for mut footprint in footprints {
        match projection.project_polygon(&footprint.polygon) {
            Ok(polygon) => {
                footprint.polygon = polygon;
                projected.push(footprint);
            }
            Err(err) => {
                let record =
                    SkipRecord::footprint(&footprint, Stage::Project, &FootprintError::from(err));
                record.log();
                skipped.push(record);
            }
        }
    }

    log::debug!(
        "projected {} footprints to {} ({} failed)",
        projected.len(),
        projection.name(),
        skipped.len()
    );
    (projected, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::polygon;

    #[test]
    fn test_planar_is_identity() {
        let coord = Coord { x: 691_000.5, y: 5_335_000.25 };
        assert_eq!(Planar.project(coord).unwrap(), coord);
    }

    #[test]
    fn test_planar_rejects_nan() {
        assert!(Planar.project(Coord { x: f64::NAN, y: 0.0 }).is_err());
    }

    #[test]
    fn test_central_meridian_at_equator() {
        let utm = TransverseMercator::etrs89_utm32n();
        let projected = utm.project(Coord { x: 9.0, y: 0.0 }).unwrap();
        assert_relative_eq!(projected.x, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(projected.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_central_meridian_northing_is_scaled_meridian_arc() {
        // Meridian arc length from the equator to 45°N on GRS80 is 4 984 944.378 m
        let utm = TransverseMercator::etrs89_utm32n();
        let projected = utm.project(Coord { x: 9.0, y: 45.0 }).unwrap();
        assert_relative_eq!(projected.x, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(projected.y, 0.9996 * 4_984_944.378, epsilon = 0.01);
    }

    #[test]
    fn test_symmetric_about_central_meridian() {
        let utm = TransverseMercator::etrs89_utm32n();
        let east = utm.project(Coord { x: 10.0, y: 51.0 }).unwrap();
        let west = utm.project(Coord { x: 8.0, y: 51.0 }).unwrap();
        assert_relative_eq!(east.x - 500_000.0, 500_000.0 - west.x, epsilon = 1e-6);
        assert_relative_eq!(east.y, west.y, epsilon = 1e-6);
    }

    #[test]
    fn test_leipzig_in_zone_32() {
        let utm = TransverseMercator::etrs89_utm32n();
        let projected = utm.project(Coord { x: 12.3731, y: 51.3397 }).unwrap();
        assert_relative_eq!(projected.x, 734_926.84, epsilon = 0.05);
        assert_relative_eq!(projected.y, 5_693_004.59, epsilon = 0.05);
    }

    #[test]
    fn test_utm_constructor_matches_preset() {
        let generic = TransverseMercator::utm(32, Hemisphere::North).unwrap();
        let preset = TransverseMercator::etrs89_utm32n();
        let coord = Coord { x: 11.0, y: 48.0 };
        assert_eq!(generic.project(coord).unwrap(), preset.project(coord).unwrap());
    }

    #[test]
    fn test_southern_hemisphere_false_northing() {
        let utm = TransverseMercator::utm(33, Hemisphere::South).unwrap();
        let projected = utm.project(Coord { x: 15.0, y: -10.0 }).unwrap();
        assert!(projected.y < UTM_FALSE_NORTHING_SOUTH);
        assert!(projected.y > UTM_FALSE_NORTHING_SOUTH - 1_200_000.0);
    }

    #[test]
    fn test_invalid_zone_and_latitude() {
        assert!(TransverseMercator::utm(0, Hemisphere::North).is_err());
        assert!(TransverseMercator::utm(61, Hemisphere::North).is_err());
        let utm = TransverseMercator::etrs89_utm32n();
        assert!(utm.project(Coord { x: 9.0, y: 90.0 }).is_err());
    }

    #[test]
    fn test_project_footprints_skips_failures() {
        let good = Footprint::new(
            polygon![(x: 9.0, y: 50.0), (x: 9.001, y: 50.0), (x: 9.001, y: 50.001)],
            5.0,
        );
        let bad = Footprint::new(
            polygon![(x: 9.0, y: 95.0), (x: 9.001, y: 95.0), (x: 9.001, y: 95.001)],
            5.0,
        );
        let (projected, skipped) =
            project_footprints(vec![good, bad], &TransverseMercator::etrs89_utm32n());
        assert_eq!(projected.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].stage, Stage::Project);
        assert!(projected[0].polygon.exterior().0[0].x > 400_000.0);
    }
}
