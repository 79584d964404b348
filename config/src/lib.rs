//! # Config Crate
//!
//! Centralized configuration constants for the footprint extrusion pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{AREA_EPSILON, DEFAULT_COLOR, DEFAULT_ELEMENT_TYPE};
//!
//! // Reject footprints that repair down to (almost) nothing
//! let area = 0.0;
//! assert!(area <= AREA_EPSILON);
//!
//! // Output metadata defaults
//! assert_eq!(DEFAULT_ELEMENT_TYPE, "Block");
//! assert_eq!(DEFAULT_COLOR[3], 180);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No I/O**: Pure values, no environment or file lookups
//! - **Documented Thresholds**: Every tolerance states its unit

pub mod constants;
