//! Skip records emitted when a footprint is dropped from the batch.
//!
//! Every drop, whether at load time or deep inside extrusion, produces one
//! [`SkipRecord`] so callers can audit drop rates without scraping logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FootprintError;
use crate::footprint::Footprint;

/// Pipeline stage at which a footprint was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Feature selection
    Load,
    /// Reprojection into the planar CRS
    Project,
    /// Repair and rejection
    Sanitize,
    /// Cap triangulation
    Triangulate,
    /// Height check and solid construction
    Extrude,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Project => "project",
            Stage::Sanitize => "sanitize",
            Stage::Triangulate => "triangulate",
            Stage::Extrude => "extrude",
        };
        f.write_str(name)
    }
}

/// Why a footprint was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipKind {
    /// Height attribute missing, null or not numeric.
    MissingHeight,
    /// Feature has no geometry at all.
    MissingGeometry,
    /// Geometry has no areal part (points, lines).
    NonArealGeometry,
    /// See [`FootprintError::InvalidGeometry`].
    InvalidGeometry,
    /// See [`FootprintError::DegenerateGeometry`].
    DegenerateGeometry,
    /// See [`FootprintError::Triangulation`].
    Triangulation,
}

/// A single dropped footprint or feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipRecord {
    /// Stage that rejected the record
    pub stage: Stage,
    /// Rejection category
    pub kind: SkipKind,
    /// Index of the raw feature in the input collection
    pub source_index: usize,
    /// Part index within a multi-part geometry, when the record was split
    pub part_index: Option<usize>,
    /// Display name of the footprint, when known
    pub name: Option<String>,
    /// Human readable reason
    pub reason: String,
}

impl SkipRecord {
    /// Records a feature dropped before it became a footprint.
    pub fn feature(source_index: usize, kind: SkipKind, reason: impl Into<String>) -> Self {
        Self {
            stage: Stage::Load,
            kind,
            source_index,
            part_index: None,
            name: None,
            reason: reason.into(),
        }
    }

    /// Records a footprint rejected at `stage`.
    pub fn footprint(footprint: &Footprint, stage: Stage, error: &FootprintError) -> Self {
        Self {
            stage,
            kind: error.kind(),
            source_index: footprint.source_index,
            part_index: Some(footprint.part_index),
            name: Some(footprint.display_name()),
            reason: error.message().to_string(),
        }
    }

    /// Emits the record through the `log` facade.
    pub fn log(&self) {
        match self.part_index {
            Some(part) => log::warn!(
                "skipping feature {} part {} ({}) at {} stage: {:?}: {}",
                self.source_index,
                part,
                self.name.as_deref().unwrap_or("unnamed"),
                self.stage,
                self.kind,
                self.reason
            ),
            None => log::warn!(
                "skipping feature {} at {} stage: {:?}: {}",
                self.source_index,
                self.stage,
                self.kind,
                self.reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Sanitize.to_string(), "sanitize");
        assert_eq!(Stage::Triangulate.to_string(), "triangulate");
    }

    #[test]
    fn test_feature_record() {
        let record = SkipRecord::feature(4, SkipKind::MissingHeight, "height is null");
        assert_eq!(record.stage, Stage::Load);
        assert_eq!(record.source_index, 4);
        assert!(record.part_index.is_none());
    }

    #[test]
    fn test_record_serializes() {
        let record = SkipRecord::feature(0, SkipKind::MissingGeometry, "no geometry");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "MissingGeometry");
        assert_eq!(json["stage"], "Load");
    }
}
