//! # Error Types
//!
//! Two tiers of errors, matching how failures propagate through the pipeline.
//!
//! ## Error Policy
//!
//! - [`PipelineError`] is fatal for a batch and is returned to the caller
//! - [`FootprintError`] concerns a single footprint; the pipeline records it
//!   as a skip and continues with the rest of the batch
//! - Every error carries a message with enough context to audit the drop

use thiserror::Error;

use crate::diagnostics::SkipKind;

// =============================================================================
// BATCH ERRORS
// =============================================================================

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No footprint with a valid height and geometry was found, so there is
    /// nothing to center the reference frame on.
    #[error("Empty batch: {0}")]
    EmptyBatch(String),

    /// The GeoJSON input could not be parsed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The caller supplied unusable input or options.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PipelineError {
    /// Creates an empty batch error.
    pub fn empty_batch(message: impl Into<String>) -> Self {
        Self::EmptyBatch(message.into())
    }
}

// =============================================================================
// PER-FOOTPRINT ERRORS
// =============================================================================

/// Errors that cause a single footprint to be skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FootprintError {
    /// Empty, non-finite or unprojectable geometry.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Error message
        message: String,
    },

    /// Zero area (also after repair), fewer than 3 points, collinear ring
    /// or unusable height.
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry {
        /// Error message
        message: String,
    },

    /// The cap triangulator could not produce a usable triangulation.
    #[error("Triangulation failed: {message}")]
    Triangulation {
        /// Error message
        message: String,
    },
}

impl FootprintError {
    /// Creates an invalid geometry error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a triangulation error.
    pub fn triangulation(message: impl Into<String>) -> Self {
        Self::Triangulation {
            message: message.into(),
        }
    }

    /// Classifies the error for skip accounting.
    pub fn kind(&self) -> SkipKind {
        match self {
            Self::InvalidGeometry { .. } => SkipKind::InvalidGeometry,
            Self::DegenerateGeometry { .. } => SkipKind::DegenerateGeometry,
            Self::Triangulation { .. } => SkipKind::Triangulation,
        }
    }

    /// Returns the bare message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidGeometry { message }
            | Self::DegenerateGeometry { message }
            | Self::Triangulation { message } => message,
        }
    }
}

/// Reprojection of a single coordinate failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Projection '{projection}' failed: {message}")]
pub struct ProjectionError {
    /// Name of the projection that failed
    pub projection: String,
    /// Error message
    pub message: String,
}

impl From<ProjectionError> for FootprintError {
    fn from(err: ProjectionError) -> Self {
        Self::invalid(err.to_string())
    }
}

// =============================================================================
// RESULT TYPE ALIASES
// =============================================================================

/// Result type alias for batch-level operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for per-footprint operations.
pub type FootprintResult<T> = Result<T, FootprintError>;

// =============================================================================
// TESTS
// =============================================================================
