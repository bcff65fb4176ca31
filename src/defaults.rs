//! Numeric tolerances shared by the geometry, renderer and combination code.
//!
//! These are fixed on purpose: saved combination results depend on them.

/// Point coincidence tolerance for path combination.
pub const EPSILON: f64 = 0.0001;

/// Euclidean slack used when two points are compared by distance.
pub const DIAGONAL_EPSILON: f64 = 1.4142 * EPSILON;

/// Distance under which the path renderer continues the current path
/// instead of starting a new sub-path.
pub const STITCH_EPSILON: f64 = 0.001;

/// Upper bound on crossings collected between two paths, over all segment pairs.
pub const MAX_CROSSINGS: usize = 128;

/// Control point offset for the four-segment ellipse approximation.
pub const ELLIPSE_CONTROL_RATIO: f64 = 0.55;

/// Joins whose supplement cosine is below this are treated as flat
/// (roughly 169 degrees) and get no miter overshoot.
pub const MITER_COS_LIMIT: f64 = -0.9816;

/// Below this a coefficient or squared length counts as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-6;

/// Number of chords used to flatten one cubic for distance queries.
pub const BEZIER_SUBDIVISIONS: usize = 10;
