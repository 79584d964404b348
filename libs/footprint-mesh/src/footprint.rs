//! # Footprint Loading
//!
//! Selects usable records from a raw feature collection.
//!
//! ## Rules
//!
//! - The named height attribute becomes the canonical `height` field
//! - Records with a missing (or null, or non-numeric) height are dropped
//! - Records without geometry or without any areal part are dropped
//! - Multi-part geometries yield one footprint per part, in order
//!
//! No geometric validation happens here; see [`crate::sanitize`].

use geo::{Geometry, Polygon};
use geojson::GeoJson;
use serde_json::Value;

use crate::diagnostics::{SkipKind, SkipRecord};
use crate::error::PipelineResult;

/// Attribute bag attached to features and footprints.
pub type JsonObject = serde_json::Map<String, Value>;

/// A feature as read from the input collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeature {
    /// Geometry in the source coordinate reference system
    pub geometry: Option<Geometry<f64>>,
    /// Feature properties, including the height attribute
    pub properties: JsonObject,
}

impl RawFeature {
    /// Creates a feature from a geometry and its properties.
    pub fn new(geometry: impl Into<Geometry<f64>>, properties: JsonObject) -> Self {
        Self {
            geometry: Some(geometry.into()),
            properties,
        }
    }

    /// Creates a feature that carries properties only.
    pub fn without_geometry(properties: JsonObject) -> Self {
        Self {
            geometry: None,
            properties,
        }
    }
}

/// A single-part building footprint with its height.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Outline polygon
    pub polygon: Polygon<f64>,
    /// Extrusion height
    pub height: f64,
    /// Remaining feature properties (the height attribute is moved out)
    pub attributes: JsonObject,
    /// Index of the originating feature in the input collection
    pub source_index: usize,
    /// Index of this part within the originating geometry
    pub part_index: usize,
}

impl Footprint {
    /// Creates a footprint that is not tied to an input collection.
    pub fn new(polygon: Polygon<f64>, height: f64) -> Self {
        Self {
            polygon,
            height,
            attributes: JsonObject::new(),
            source_index: 0,
            part_index: 0,
        }
    }

    /// Human readable name: the `name`/`Name` attribute, or the record position.
    pub fn display_name(&self) -> String {
        ["name", "Name"]
            .iter()
            .find_map(|key| self.attributes.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("footprint-{}.{}", self.source_index, self.part_index))
    }
}

/// Outcome of loading a feature collection.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of raw features examined
    pub feature_count: usize,
    /// Footprint candidates, in input order
    pub footprints: Vec<Footprint>,
    /// Features dropped by the loader
    pub dropped: Vec<SkipRecord>,
}

/// Loads footprint candidates from raw features.
///
/// # Example
///
/// ```rust
/// use footprint_mesh::footprint::{load_footprints, JsonObject, RawFeature};
/// use geo::polygon;
/// use serde_json::json;
///
/// let mut properties = JsonObject::new();
/// properties.insert("h".to_string(), json!(12.5));
/// let square = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)];
///
/// let report = load_footprints(&[RawFeature::new(square, properties)], "h");
/// assert_eq!(report.footprints.len(), 1);
/// assert_eq!(report.footprints[0].height, 12.5);
/// ```
pub fn load_footprints(features: &[RawFeature], height_attribute: &str) -> LoadReport {
    let mut report = LoadReport {
        feature_count: features.len(),
        ..Default::default()
    };

    for (source_index, feature) in features.iter().enumerate() {
        let Some(height) = read_height(feature.properties.get(height_attribute)) else {
            report.dropped.push(SkipRecord::feature(
                source_index,
                SkipKind::MissingHeight,
                format!("attribute '{height_attribute}' is missing or not numeric"),
            ));
            continue;
        };

        let Some(geometry) = &feature.geometry else {
            report.dropped.push(SkipRecord::feature(
                source_index,
                SkipKind::MissingGeometry,
                "feature has no geometry",
            ));
            continue;
        };

        let mut parts = Vec::new();
        explode(geometry, &mut parts);
        if parts.is_empty() {
            report.dropped.push(SkipRecord::feature(
                source_index,
                SkipKind::NonArealGeometry,
                "geometry has no polygonal part",
            ));
            continue;
        }

        let mut attributes = feature.properties.clone();
        attributes.remove(height_attribute);

        for (part_index, polygon) in parts.into_iter().enumerate() {
            report.footprints.push(Footprint {
                polygon,
                height,
                attributes: attributes.clone(),
                source_index,
                part_index,
            });
        }
    }

    for record in &report.dropped {
        log::debug!(
            "loader dropped feature {}: {:?}: {}",
            record.source_index,
            record.kind,
            record.reason
        );
    }
    log::debug!(
        "loaded {} footprints from {} features ({} dropped)",
        report.footprints.len(),
        report.feature_count,
        report.dropped.len()
    );

    report
}

/// Reads a height value. Numbers and numeric strings are accepted.
fn read_height(value: Option<&Value>) -> Option<f64> {
    let height = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    height.is_finite().then_some(height)
}

/// Collects the polygonal parts of a geometry in order.
fn explode(geometry: &Geometry<f64>, parts: &mut Vec<Polygon<f64>>) {
    match geometry {
        Geometry::Polygon(polygon) => parts.push(polygon.clone()),
        Geometry::MultiPolygon(multi) => parts.extend(multi.0.iter().cloned()),
        Geometry::Rect(rect) => parts.push(rect.to_polygon()),
        Geometry::Triangle(triangle) => parts.push(triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for member in &collection.0 {
                explode(member, parts);
            }
        }
        // points and lines carry no area
        _ => {}
    }
}

// =============================================================================
// GEOJSON ADAPTER
// =============================================================================

/// Reads raw features from GeoJSON text.
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry.
/// Features whose geometry cannot be converted keep their properties and are
/// reported later by the loader as missing geometry.
pub fn features_from_geojson(text: &str) -> PipelineResult<Vec<RawFeature>> {
    let geojson: GeoJson = text.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| convert_feature(index, feature))
            .collect(),
        GeoJson::Feature(feature) => vec![convert_feature(0, feature)],
        GeoJson::Geometry(geometry) => vec![RawFeature {
            geometry: convert_geometry(0, geometry),
            properties: JsonObject::new(),
        }],
    };

    Ok(features)
}

fn convert_feature(index: usize, feature: geojson::Feature) -> RawFeature {
    RawFeature {
        geometry: feature.geometry.and_then(|g| convert_geometry(index, g)),
        properties: feature.properties.unwrap_or_default(),
    }
}

fn convert_geometry(index: usize, geometry: geojson::Geometry) -> Option<Geometry<f64>> {
    match Geometry::<f64>::try_from(geometry) {
        Ok(geometry) => Some(geometry),
        Err(err) => {
            log::warn!("feature {index}: unsupported GeoJSON geometry: {err}");
            None
        }
    }
}
