//! Boolean combination of two closed bezier outlines.
//!
//! The pipeline runs in four steps:
//! - [`segment`]: both paths become lists of uniform cubic segments
//! - [`intersect`]: crossings are found by recursive subdivision
//! - [`split`]: each list is cut at its crossings and every run between two
//!   cuts is classified as inside or outside the other path
//! - [`assemble`]: runs are walked back into one outline for the mode
//!
//! Without crossings the result is decided by containment alone.

mod assemble;
mod intersect;
mod segment;
mod split;

use crate::errors::PathError;
use crate::geometry::distance_bez_shape_point;
use crate::types::{BezPath, BezPoint, validate_points};
use assemble::{make_path, make_path0};
use intersect::find_intersections;
use segment::{BezierSegment, path_to_segments};
use split::{Side, extract_splits, split_segments};

/// How two outlines are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathCombineMode {
    /// Area covered by either outline
    Union,
    /// Area of the first outline not covered by the second
    Difference,
    /// Area covered by both outlines
    Intersection,
    /// Area covered by exactly one outline
    Exclusion,
}

impl PathCombineMode {
    pub const ALL: [PathCombineMode; 4] = [
        PathCombineMode::Union,
        PathCombineMode::Difference,
        PathCombineMode::Intersection,
        PathCombineMode::Exclusion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PathCombineMode::Union => "union",
            PathCombineMode::Difference => "difference",
            PathCombineMode::Intersection => "intersection",
            PathCombineMode::Exclusion => "exclusion",
        }
    }
}

impl std::str::FromStr for PathCombineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathCombineMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown combine mode `{s}`"))
    }
}

impl std::fmt::Display for PathCombineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Combine two closed outlines into a new one.
///
/// Both inputs must start with a move-to and hold at least two points;
/// shorter input is a caller bug and trips a debug assertion. Returns
/// `None` when the result is empty, e.g. the intersection of disjoint
/// shapes or the difference of a shape with something covering it.
///
/// Self-intersecting input is not supported, and neither are outlines
/// that share part of an edge.
pub fn path_combine(p1: &[BezPoint], p2: &[BezPoint], mode: PathCombineMode) -> Option<BezPath> {
    debug_assert!(
        p1.len() > 1 && p2.len() > 1,
        "path_combine needs at least two points per path"
    );
    if p1.len() < 2 || p2.len() < 2 {
        return None;
    }
    let _span = crate::log::enter_combine(mode, p1.len(), p2.len());
    if let Err(err) = validate_points(p1).and_then(|()| validate_points(p2)) {
        crate::log::warn!(%err, "refusing to combine invalid path");
        return None;
    }

    let mut one = path_to_segments(p1);
    let mut two = path_to_segments(p2);
    if one.is_empty() || two.is_empty() {
        return None;
    }

    let result = if same_outline(&one, &two) {
        // every corner would register as a crossing
        match mode {
            PathCombineMode::Union | PathCombineMode::Intersection => Some(p1.to_vec()),
            PathCombineMode::Difference | PathCombineMode::Exclusion => None,
        }
    } else {
        let crossings = find_intersections(&one, &two);
        crate::log::debug!(crossings = crossings.len(), %mode, "combining paths");
        if crossings.is_empty() {
            combine_without_crossings(p1, p2, &one, &two, mode)
        } else {
            let mut one_splits = extract_splits(&crossings, Side::One);
            let mut two_splits = extract_splits(&crossings, Side::Two);
            split_segments(&mut one, &mut one_splits, p2);
            split_segments(&mut two, &mut two_splits, p1);

            if one_splits.len() < 2 {
                // touching in a single point, nothing to walk
                Some(make_path0(&one, Some(&one_splits), &two, Some(&two_splits)))
            } else if mode == PathCombineMode::Exclusion {
                let first = make_path(&one, &mut one_splits, &mut two_splits, PathCombineMode::Difference);
                let second = make_path(&two, &mut two_splits, &mut one_splits, PathCombineMode::Difference);
                let joined: Vec<BezPoint> = first.into_iter().chain(second).flatten().collect();
                Some(joined)
            } else {
                make_path(&one, &mut one_splits, &mut two_splits, mode)
            }
        }
    };

    result.filter(|points| points.len() >= 2).map(BezPath::from)
}

/// Result by containment when the outlines never cross.
fn combine_without_crossings(
    p1: &[BezPoint],
    p2: &[BezPoint],
    one: &[BezierSegment],
    two: &[BezierSegment],
    mode: PathCombineMode,
) -> Option<Vec<BezPoint>> {
    let two_in_one = distance_bez_shape_point(p1, 0.0, p2[0].p1()) == 0.0;
    let one_in_two = distance_bez_shape_point(p2, 0.0, p1[0].p1()) == 0.0;
    crate::log::debug!(two_in_one, one_in_two, "no crossings");

    match mode {
        PathCombineMode::Union if two_in_one => Some(p1.to_vec()),
        PathCombineMode::Union if one_in_two => Some(p2.to_vec()),
        PathCombineMode::Union => Some(make_path0(one, None, two, None)),

        // the inner outline becomes a hole
        PathCombineMode::Difference if two_in_one => Some(make_path0(one, None, two, None)),
        PathCombineMode::Difference if one_in_two => None,
        PathCombineMode::Difference => Some(p1.to_vec()),

        PathCombineMode::Intersection if two_in_one => Some(p2.to_vec()),
        PathCombineMode::Intersection if one_in_two => Some(p1.to_vec()),
        PathCombineMode::Intersection => None,

        PathCombineMode::Exclusion if one_in_two => Some(make_path0(two, None, one, None)),
        PathCombineMode::Exclusion => Some(make_path0(one, None, two, None)),
    }
}

fn same_outline(one: &[BezierSegment], two: &[BezierSegment]) -> bool {
    one.len() == two.len() && one.iter().zip(two).all(|(a, b)| a.approx_eq(b))
}

/// Combine two validated paths, reporting why the input was refused.
///
/// Same as [`path_combine`] but with errors instead of a debug assertion,
/// for callers holding paths that came from outside.
pub fn try_path_combine(p1: &BezPath, p2: &BezPath, mode: PathCombineMode) -> Result<Option<BezPath>, PathError> {
    for path in [p1, p2] {
        path.validate()?;
        if path.len() < 2 {
            return Err(PathError::TooShort { len: path.len(), min: 2 });
        }
    }
    Ok(path_combine(p1, p2, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::outline_area;
    use glam::dvec2;

    const AREA_EPSILON: f64 = 1e-3;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        BezPath::polygon(&[dvec2(x0, y0), dvec2(x1, y0), dvec2(x1, y1), dvec2(x0, y1)])
    }

    fn assert_area(path: &BezPath, expected: f64) {
        let area = outline_area(path);
        assert!(
            (area - expected).abs() < AREA_EPSILON,
            "expected area {expected}, got {area} for {path}"
        );
    }

    #[test]
    fn overlapping_squares_all_modes() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, 1.0, 3.0, 3.0);

        let union = path_combine(&a, &b, PathCombineMode::Union).expect("union");
        assert_eq!(union.subpath_count(), 1);
        assert_area(&union, 7.0);

        let inter = path_combine(&a, &b, PathCombineMode::Intersection).expect("intersection");
        assert_eq!(inter.subpath_count(), 1);
        assert_area(&inter, 1.0);
        let bb = inter.bounding_box(&Default::default(), true);
        assert!((bb.left - 1.0).abs() < 1e-3 && (bb.right - 2.0).abs() < 1e-3);

        let diff = path_combine(&a, &b, PathCombineMode::Difference).expect("difference");
        assert_area(&diff, 3.0);

        let excl = path_combine(&a, &b, PathCombineMode::Exclusion).expect("exclusion");
        assert_eq!(excl.subpath_count(), 2);
        assert_area(&excl, 6.0);
    }

    #[test]
    fn nested_squares_use_containment() {
        let outer = square(0.0, 0.0, 4.0, 4.0);
        let inner = square(1.0, 1.0, 2.0, 2.0);

        let union = path_combine(&outer, &inner, PathCombineMode::Union).expect("union");
        assert_eq!(union, outer);
        let union = path_combine(&inner, &outer, PathCombineMode::Union).expect("union");
        assert_eq!(union, outer);

        let inter = path_combine(&outer, &inner, PathCombineMode::Intersection).expect("intersection");
        assert_eq!(inter, inner);

        let diff = path_combine(&outer, &inner, PathCombineMode::Difference).expect("difference");
        assert_eq!(diff.subpath_count(), 2);
        assert_eq!(diff.subpaths()[0], outer);

        assert!(path_combine(&inner, &outer, PathCombineMode::Difference).is_none());
    }

    #[test]
    fn disjoint_squares() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);

        let union = path_combine(&a, &b, PathCombineMode::Union).expect("union");
        assert_eq!(union.subpath_count(), 2);
        assert_area(&union, 2.0);

        assert!(path_combine(&a, &b, PathCombineMode::Intersection).is_none());
        assert_eq!(path_combine(&a, &b, PathCombineMode::Difference), Some(a.clone()));

        let excl = path_combine(&a, &b, PathCombineMode::Exclusion).expect("exclusion");
        assert_area(&excl, 2.0);
    }

    #[test]
    fn circle_meeting_the_square_at_its_own_vertices() {
        // the circle's segments start and end on the square's edges
        let a = square(-1.0, -1.0, 1.0, 1.0);
        let mut b = Vec::new();
        crate::render::geometry::path_build_ellipse(&mut b, dvec2(1.0, 1.0), 2.0, 2.0);

        let inter = path_combine(&a, &b, PathCombineMode::Intersection).expect("intersection");
        let area = outline_area(&inter);
        assert!((area - 0.781).abs() < 0.01, "quarter disc, got {area} for {inter}");

        let diff = path_combine(&a, &b, PathCombineMode::Difference).expect("difference");
        let area = outline_area(&diff);
        assert!((area - 3.219).abs() < 0.01, "square minus quarter disc, got {area} for {diff}");
    }

    #[test]
    fn identical_outlines() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        assert_eq!(path_combine(&a, &a, PathCombineMode::Union), Some(a.clone()));
        assert_eq!(path_combine(&a, &a, PathCombineMode::Intersection), Some(a.clone()));
        assert!(path_combine(&a, &a, PathCombineMode::Difference).is_none());
        assert!(path_combine(&a, &a, PathCombineMode::Exclusion).is_none());
    }

    #[test]
    fn union_is_symmetric_in_area() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = square(1.0, -1.0, 3.0, 1.0);
        let ab = path_combine(&a, &b, PathCombineMode::Union).expect("a+b");
        let ba = path_combine(&b, &a, PathCombineMode::Union).expect("b+a");
        assert_area(&ab, 7.0);
        assert_area(&ba, 7.0);
    }

    #[test]
    fn non_finite_input_is_refused() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = BezPath::from(vec![
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::LineTo(dvec2(f64::NAN, 1.0)),
        ]);
        assert!(path_combine(&a, &b, PathCombineMode::Union).is_none());
        assert_eq!(
            try_path_combine(&a, &b, PathCombineMode::Union),
            Err(PathError::NonFinite { index: 1 })
        );
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "at least two points"))]
    fn short_input_is_a_contract_violation() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = BezPath::from(vec![BezPoint::MoveTo(dvec2(0.0, 0.0))]);
        assert!(path_combine(&a, &b, PathCombineMode::Union).is_none());
    }

    #[test]
    fn try_combine_reports_short_paths() {
        let a = square(0.0, 0.0, 2.0, 2.0);
        let b = BezPath::from(vec![BezPoint::MoveTo(dvec2(0.0, 0.0))]);
        assert_eq!(
            try_path_combine(&a, &b, PathCombineMode::Union),
            Err(PathError::TooShort { len: 1, min: 2 })
        );
    }

    #[test]
    fn mode_names_parse() {
        for mode in PathCombineMode::ALL {
            assert_eq!(mode.name().parse::<PathCombineMode>(), Ok(mode));
        }
        assert!("xor".parse::<PathCombineMode>().is_err());
    }
}
