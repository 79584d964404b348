//! # Configuration Constants
//!
//! Centralized constants for the footprint extrusion pipeline. Precision
//! thresholds, projection parameters and output metadata defaults are all
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Area/extent tolerances used to reject degenerate footprints
//! - **Triangulation**: Snap radius for the cap triangulator
//! - **Projection**: Ellipsoid and UTM parameters
//! - **Output**: Element type, color, naming and container metadata

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Minimum footprint area, in squared projected units (m² for UTM).
///
/// Repaired footprints whose area is at or below this value are rejected as
/// degenerate. A millimetre-square is far below any real building, yet well
/// above the rounding noise left behind by polygon repair at UTM magnitudes.
///
/// # Example
///
/// ```rust
/// use config::constants::AREA_EPSILON;
///
/// let sliver_area = 1e-12;
/// assert!(sliver_area <= AREA_EPSILON);
/// ```
pub const AREA_EPSILON: f64 = 1e-9;

/// Minimum bounding-box extent on either axis, in projected units.
///
/// A ring whose x or y extent is at or below this value has all its points
/// on a line (or on a single point) and cannot be triangulated.
///
/// # Example
///
/// ```rust
/// use config::constants::EXTENT_EPSILON;
///
/// let (min_x, max_x) = (3.0_f64, 3.0_f64);
/// assert!(max_x - min_x <= EXTENT_EPSILON);
/// ```
pub const EXTENT_EPSILON: f64 = 1e-9;

// =============================================================================
// TRIANGULATION CONSTANTS
// =============================================================================

/// Snap radius handed to the Delaunay cap triangulator.
///
/// Vertices closer than this are merged by the triangulator. Kept tiny so
/// that sanitized rings map back onto their own vertices one-to-one.
pub const TRIANGULATION_SNAP_RADIUS: f64 = 1e-8;

// =============================================================================
// INPUT CONSTANTS
// =============================================================================

/// Default name of the feature property holding the building height.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_HEIGHT_ATTRIBUTE;
///
/// let user_attribute: Option<&str> = None;
/// assert_eq!(user_attribute.unwrap_or(DEFAULT_HEIGHT_ATTRIBUTE), "building_height");
/// ```
pub const DEFAULT_HEIGHT_ATTRIBUTE: &str = "building_height";

// =============================================================================
// PROJECTION CONSTANTS
// =============================================================================

/// Semi-major axis of the GRS80 ellipsoid in metres.
///
/// GRS80 and WGS84 differ by less than a millimetre in the semi-minor axis,
/// so the same parameters serve both ETRS89 and WGS84 inputs.
pub const GRS80_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Inverse flattening of the GRS80 ellipsoid.
pub const GRS80_INVERSE_FLATTENING: f64 = 298.257_222_101;

/// Scale factor on the central meridian of every UTM zone.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// False easting of every UTM zone in metres.
pub const UTM_FALSE_EASTING: f64 = 500_000.0;

/// False northing applied to southern-hemisphere UTM zones in metres.
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Width of a UTM zone in degrees of longitude.
pub const UTM_ZONE_WIDTH_DEGREES: f64 = 6.0;

/// UTM zone of the ETRS89 / UTM 32N projection (EPSG:25832).
///
/// # Example
///
/// ```rust
/// use config::constants::{ETRS89_UTM_ZONE, UTM_ZONE_WIDTH_DEGREES};
///
/// let central_meridian = ETRS89_UTM_ZONE as f64 * UTM_ZONE_WIDTH_DEGREES - 183.0;
/// assert_eq!(central_meridian, 9.0);
/// ```
pub const ETRS89_UTM_ZONE: u8 = 32;

// =============================================================================
// OUTPUT CONSTANTS
// =============================================================================

/// Type tag attached to every emitted element.
pub const DEFAULT_ELEMENT_TYPE: &str = "Block";

/// Default element color as RGBA bytes (muted teal, partially transparent).
pub const DEFAULT_COLOR: [u8; 4] = [120, 166, 171, 180];

/// Prefix of the generated element name; the mesh id is appended.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_NAME_PREFIX;
///
/// let name = format!("{}-{}", DEFAULT_NAME_PREFIX, 7);
/// assert_eq!(name, "building-7");
/// ```
pub const DEFAULT_NAME_PREFIX: &str = "building";

/// Info key under which the element name is stored.
pub const NAME_INFO_KEY: &str = "Name";

/// Version string of the exchange container the output is destined for.
pub const CONTAINER_VERSION: &str = "1.0.0";

/// Default author recorded in the container metadata.
pub const DEFAULT_AUTHOR: &str = "DCS";

/// Info key under which the author is stored.
pub const AUTHOR_INFO_KEY: &str = "Author";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Central meridian in degrees of a UTM zone (1..=60).
///
/// # Example
///
/// ```rust
/// use config::constants::utm_central_meridian;
///
/// assert_eq!(utm_central_meridian(32), 9.0);
/// assert_eq!(utm_central_meridian(1), -177.0);
/// ```
#[inline]
pub fn utm_central_meridian(zone: u8) -> f64 {
    zone as f64 * UTM_ZONE_WIDTH_DEGREES - 183.0
}
