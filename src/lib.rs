//! Vector path geometry for diagram objects.
//!
//! - [`bbox`]: bounding boxes that account for line width, joins and arrows
//! - [`render`]: the renderer interface, a path-recording backend and a
//!   transforming backend
//! - [`object`]: drawables and their conversion into paths
//! - [`combine`]: boolean union, difference, intersection and exclusion
//! - [`pathdata`]: SVG path data import

pub mod bbox;
pub mod combine;
pub mod defaults;
pub mod errors;
pub mod geometry;
mod log;
pub mod object;
pub mod pathdata;
pub mod render;
pub mod types;

pub use combine::{PathCombineMode, path_combine, try_path_combine};
pub use errors::{PathDataError, PathError};
pub use object::{Drawable, PathShape, Primitive, StandardPath, combine_objects, create_standard_path_from_object};
pub use pathdata::parse_path_data;
pub use render::{PathRenderer, Renderer, TransformRenderer};
pub use types::{BezPath, BezPoint, Color, Point, Rectangle};

/// Combine two outlines given as SVG path data.
///
/// Returns `Ok(None)` when the combination has no outline, or an error with
/// diagnostics when either input is malformed.
pub fn combine_path_data(a: &str, b: &str, mode: PathCombineMode) -> Result<Option<BezPath>, miette::Report> {
    let one = parse_path_data("<first>", a)?;
    let two = parse_path_data("<second>", b)?;
    Ok(try_path_combine(&one, &two, mode)?)
}
