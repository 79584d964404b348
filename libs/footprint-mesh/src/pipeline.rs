//! # Footprint Pipeline
//!
//! Orchestrates one batch:
//!
//! ```text
//! load → project → frame → (sanitize → triangulate → extrude) → assemble
//! ```
//!
//! The frame is computed once, sequentially, before any footprint is
//! touched. The bracketed stage is a pure per-footprint map and runs on
//! rayon when [`PipelineOptions::parallel`] is set; results are collected in
//! input order and reduced sequentially by the [`Assembler`].

use config::constants::DEFAULT_HEIGHT_ATTRIBUTE;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assemble::{Assembler, AssemblyOptions, Batch};
use crate::diagnostics::{SkipRecord, Stage};
use crate::error::{FootprintError, PipelineError, PipelineResult};
use crate::extrude::{check_height, extrude, triangulate_cap, CapMode, SolidMesh, ZeroHeightPolicy};
use crate::footprint::{features_from_geojson, load_footprints, Footprint, RawFeature};
use crate::frame::ReferenceFrame;
use crate::projection::{project_footprints, Planar, Projection};
use crate::sanitize::{sanitize, SanitizeOptions};

// =============================================================================
// OPTIONS
// =============================================================================

/// Runtime options for a pipeline run.
///
/// # Example
///
/// ```rust
/// use footprint_mesh::{CapMode, PipelineOptions, ZeroHeightPolicy};
///
/// let options = PipelineOptions::default()
///     .with_height_attribute("h")
///     .with_cap_mode(CapMode::ConvexHull)
///     .with_zero_height(ZeroHeightPolicy::PassThrough)
///     .with_parallel(false);
/// assert_eq!(options.height_attribute, "h");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Feature property holding the extrusion height
    pub height_attribute: String,
    /// Sanitizer tunables
    pub sanitize: SanitizeOptions,
    /// Cap triangulation mode
    pub cap_mode: CapMode,
    /// Handling of zero heights
    pub zero_height: ZeroHeightPolicy,
    /// Element metadata
    pub assembly: AssemblyOptions,
    /// Run the per-footprint stage on the rayon pool
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            height_attribute: DEFAULT_HEIGHT_ATTRIBUTE.to_string(),
            sanitize: SanitizeOptions::default(),
            cap_mode: CapMode::default(),
            zero_height: ZeroHeightPolicy::default(),
            assembly: AssemblyOptions::default(),
            parallel: true,
        }
    }
}

impl PipelineOptions {
    /// Sets the height attribute name.
    pub fn with_height_attribute(mut self, name: impl Into<String>) -> Self {
        self.height_attribute = name.into();
        self
    }

    /// Sets the sanitizer options.
    pub fn with_sanitize(mut self, sanitize: SanitizeOptions) -> Self {
        self.sanitize = sanitize;
        self
    }

    /// Keeps or fills interior rings.
    pub fn with_keep_holes(mut self, keep_holes: bool) -> Self {
        self.sanitize.keep_holes = keep_holes;
        self
    }

    /// Sets the cap triangulation mode.
    pub fn with_cap_mode(mut self, cap_mode: CapMode) -> Self {
        self.cap_mode = cap_mode;
        self
    }

    /// Sets the zero height policy.
    pub fn with_zero_height(mut self, policy: ZeroHeightPolicy) -> Self {
        self.zero_height = policy;
        self
    }

    /// Sets the element metadata.
    pub fn with_assembly(mut self, assembly: AssemblyOptions) -> Self {
        self.assembly = assembly;
        self
    }

    /// Enables or disables the parallel stage.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> PipelineResult<()> {
        if self.height_attribute.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "height attribute name is empty".to_string(),
            ));
        }
        for (name, value) in [
            ("area epsilon", self.sanitize.area_epsilon),
            ("extent epsilon", self.sanitize.extent_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::InvalidInput(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// Counts and skip records of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Raw features in the input
    pub feature_count: usize,
    /// Footprints produced by the loader
    pub footprint_count: usize,
    /// Mesh/element pairs emitted
    pub emitted: usize,
    /// Every dropped feature or footprint, in input order per stage
    pub skipped: Vec<SkipRecord>,
}

impl PipelineReport {
    /// Number of records dropped at `stage`.
    pub fn skipped_at(&self, stage: Stage) -> usize {
        self.skipped.iter().filter(|record| record.stage == stage).count()
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Ordered mesh/element pairs
    pub batch: Batch,
    /// Shared frame all meshes are expressed in
    pub frame: ReferenceFrame,
    /// Counts and skips
    pub report: PipelineReport,
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Footprint-to-solid pipeline over a chosen projection.
#[derive(Debug, Clone)]
pub struct FootprintPipeline<P = Planar> {
    projection: P,
    options: PipelineOptions,
}

impl FootprintPipeline<Planar> {
    /// Pipeline for input that is already planar and metric.
    pub fn planar(options: PipelineOptions) -> Self {
        Self::new(Planar, options)
    }
}

impl<P: Projection> FootprintPipeline<P> {
    /// Creates a pipeline.
    pub fn new(projection: P, options: PipelineOptions) -> Self {
        Self {
            projection,
            options,
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Returns the projection.
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Parses GeoJSON text and runs the batch.
    ///
    /// # Errors
    ///
    /// [`PipelineError::GeoJson`] for unparsable text, otherwise as
    /// [`FootprintPipeline::run`].
    pub fn run_geojson(&self, text: &str) -> PipelineResult<PipelineOutput> {
        let features = features_from_geojson(text)?;
        self.run(&features)
    }

    /// Runs one batch.
    ///
    /// Per-footprint failures are skipped and reported; only batch-level
    /// failures are returned as errors.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] for unusable options
    /// - [`PipelineError::EmptyBatch`] when no footprint survives loading
    ///   and projection
    pub fn run(&self, features: &[RawFeature]) -> PipelineResult<PipelineOutput> {
        self.options.validate()?;

        let loaded = load_footprints(features, &self.options.height_attribute);
        let mut report = PipelineReport {
            feature_count: loaded.feature_count,
            footprint_count: loaded.footprints.len(),
            emitted: 0,
            skipped: loaded.dropped,
        };
        if loaded.footprints.is_empty() {
            return Err(PipelineError::empty_batch(format!(
                "none of {} features has a usable '{}' and areal geometry",
                report.feature_count, self.options.height_attribute
            )));
        }

        let (footprints, unprojectable) = project_footprints(loaded.footprints, &self.projection);
        report.skipped.extend(unprojectable);

        let frame = ReferenceFrame::from_footprints(&footprints)?;

        let results: Vec<Result<SolidMesh, (Stage, FootprintError)>> = if self.options.parallel {
            footprints
                .par_iter()
                .map(|footprint| build_solid(footprint, &frame, &self.options))
                .collect()
        } else {
            footprints
                .iter()
                .map(|footprint| build_solid(footprint, &frame, &self.options))
                .collect()
        };

        let mut assembler = Assembler::new(self.options.assembly.clone());
        for (footprint, result) in footprints.iter().zip(results) {
            match result {
                Ok(solid) => {
                    assembler.push(solid, footprint);
                }
                Err((stage, err)) => {
                    let record = SkipRecord::footprint(footprint, stage, &err);
                    record.log();
                    report.skipped.push(record);
                }
            }
        }

        let batch = assembler.finish();
        report.emitted = batch.len();
        log::info!(
            "{} features → {} footprints → {} meshes ({} skipped) via {}",
            report.feature_count,
            report.footprint_count,
            report.emitted,
            report.skipped.len(),
            self.projection.name()
        );

        Ok(PipelineOutput {
            batch,
            frame,
            report,
        })
    }
}

/// Sanitizes, triangulates and extrudes one footprint.
fn build_solid(
    footprint: &Footprint,
    frame: &ReferenceFrame,
    options: &PipelineOptions,
) -> Result<SolidMesh, (Stage, FootprintError)> {
    check_height(footprint.height, options.zero_height).map_err(|err| (Stage::Extrude, err))?;
    let ring =
        sanitize(footprint, frame, &options.sanitize).map_err(|err| (Stage::Sanitize, err))?;
    let cap = triangulate_cap(&ring, options.cap_mode).map_err(|err| (Stage::Triangulate, err))?;

    let solid = extrude(&cap, footprint.height);
    debug_assert!(solid.validate());
    Ok(solid)
}
