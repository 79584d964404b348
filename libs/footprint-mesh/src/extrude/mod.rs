//! # Extrusion
//!
//! Turns a clean ring into a closed prism:
//! - **triangulate_cap**: Delaunay cap in the z = 0 plane
//! - **extrude**: bottom cap, top cap and walls, sharing vertices
//!
//! ## Heights
//!
//! Negative and non-finite heights never produce a solid. A height of
//! exactly zero is skipped unless [`ZeroHeightPolicy::PassThrough`] is
//! chosen, in which case a flat, zero-volume solid is emitted.

mod solid;
mod triangulate;


pub use solid::{extrude, SolidMesh};
pub use triangulate::{triangulate_cap, Cap, CapMode};

use crate::error::{FootprintError, FootprintResult};

/// What to do with footprints whose height is exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroHeightPolicy {
    /// Drop the footprint as degenerate.
    #[default]
    Skip,
    /// Emit a flat solid with coincident caps.
    PassThrough,
}

/// Rejects heights that cannot produce a solid under `policy`.
///
/// # Errors
///
/// [`FootprintError::DegenerateGeometry`] for non-finite or negative
/// heights, and for zero under [`ZeroHeightPolicy::Skip`].
pub fn check_height(height: f64, policy: ZeroHeightPolicy) -> FootprintResult<()> {
    if !height.is_finite() || height < 0.0 {
        return Err(FootprintError::degenerate(format!(
            "height {height} is not a finite non-negative number"
        )));
    }
    if height == 0.0 && policy == ZeroHeightPolicy::Skip {
        return Err(FootprintError::degenerate("height is zero"));
    }
    Ok(())
}
