//! # Path Module
//!
//! Read-only set of named lanes with arc-length parameterization and
//! per-zone properties.
//!
//! A [`Path`] never changes shape once built; the [`PathCatalog`] is the
//! read-only-after-load lookup the scheduler and spatial index query by id.
pub mod catalog;
pub mod path;

pub use catalog::PathCatalog;
pub use path::{Path, PathBuilder, PathId, ZoneTag, DEFAULT_LANE_WIDTH};
