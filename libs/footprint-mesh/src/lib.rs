//! # Footprint Mesh
//!
//! Extrudes 2D building footprints with heights into closed triangle
//! meshes, paired with placement metadata for a building exchange
//! container.
//!
//! ## Architecture
//!
//! ```text
//! RawFeature → footprint (load) → projection → frame (shared origin)
//!            → sanitize → extrude (cap + walls) → assemble (Mesh, Element)
//! ```
//!
//! Footprints that cannot be turned into a solid are skipped and reported
//! as [`SkipRecord`]s; only batch-level failures abort a run.
//!
//! ## Usage
//!
//! ```rust
//! use footprint_mesh::{FootprintPipeline, PipelineOptions};
//!
//! let geojson = r#"{
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "type": "Feature",
//!         "properties": {"building_height": 10.0},
//!         "geometry": {
//!             "type": "Polygon",
//!             "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]
//!         }
//!     }]
//! }"#;
//!
//! let pipeline = FootprintPipeline::planar(PipelineOptions::default());
//! let output = pipeline.run_geojson(geojson).unwrap();
//! assert_eq!(output.batch.len(), 1);
//! assert_eq!(output.batch.meshes[0].triangle_count(), 12);
//! ```

pub mod assemble;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod extrude;
pub mod footprint;
pub mod frame;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod sanitize;

pub use assemble::{Assembler, AssemblyOptions, Batch, BatchInfo};
pub use diagnostics::{SkipKind, SkipRecord, Stage};
pub use element::{Color, Element};
pub use error::{FootprintError, PipelineError, PipelineResult, ProjectionError};
pub use extrude::{CapMode, ZeroHeightPolicy};
pub use footprint::{Footprint, RawFeature};
pub use frame::ReferenceFrame;
pub use mesh::Mesh;
pub use pipeline::{FootprintPipeline, PipelineOptions, PipelineOutput, PipelineReport};
pub use projection::{Hemisphere, Planar, Projection, TransverseMercator};
pub use sanitize::SanitizeOptions;
