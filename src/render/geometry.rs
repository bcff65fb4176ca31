//! Bezier approximations of arcs, ellipses and rounded rectangles.
//!
//! Angles are in degrees, counter-clockwise, measured in a y-down screen
//! space: 90° points up. All builders append to a caller-owned buffer.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::dvec2;

use crate::defaults::{ELLIPSE_CONTROL_RATIO, STITCH_EPSILON};
use crate::types::{BezPoint, Point};

/// Move to `pt` unless the path already ends there.
pub(crate) fn path_append(path: &mut Vec<BezPoint>, pt: Point) {
    let attached = path
        .last()
        .is_some_and(|last| last.end_point().distance(pt) < STITCH_EPSILON);
    if !attached {
        path.push(BezPoint::MoveTo(pt));
    }
}

/// One cubic for the circular arc from `angle_a` to `angle_b` (radians).
///
/// Control points sit at `4/3 * tan(delta / 4)` along the tangents; good
/// for spans up to a quarter turn.
fn arc_segment(path: &mut Vec<BezPoint>, center: Point, radius: f64, angle_a: f64, angle_b: f64) {
    let (sin_a, cos_a) = angle_a.sin_cos();
    let (sin_b, cos_b) = angle_b.sin_cos();
    let (r_sin_a, r_cos_a) = (radius * sin_a, radius * cos_a);
    let (r_sin_b, r_cos_b) = (radius * sin_b, radius * cos_b);
    let h = 4.0 / 3.0 * ((angle_b - angle_a) / 4.0).tan();

    path.push(BezPoint::CurveTo(
        center + dvec2(r_cos_a - h * r_sin_a, r_sin_a + h * r_cos_a),
        center + dvec2(r_cos_b + h * r_sin_b, r_sin_b - h * r_cos_b),
        center + dvec2(r_cos_b, r_sin_b),
    ));
}

/// Append the arc of the ellipse inscribed in `width` x `height` around
/// `center`, from `angle1` to `angle2`.
///
/// The curve itself is circular with the geometric mean radius; only the
/// start point honours the ellipse. Open arcs attach to the path end when
/// they can and take one cubic per started quarter turn, so a sweep of
/// exactly 90° takes two and a full turn takes five. Closed arcs become a
/// pie wedge: start, one cubic, the center and back to the start.
pub fn path_build_arc(
    path: &mut Vec<BezPoint>,
    center: Point,
    width: f64,
    height: f64,
    angle1: f64,
    angle2: f64,
    closed: bool,
) {
    if !(angle1.is_finite() && angle2.is_finite()) {
        crate::log::warn!(angle1, angle2, "arc with non-finite angles skipped");
        return;
    }
    let radius = (width * height).sqrt() / 2.0;

    let mut angle1 = angle1;
    if angle1 > angle2 {
        angle1 -= ((angle1 - angle2) / 360.0).ceil() * 360.0;
    }

    // the arc is walked from angle2 back to angle1
    let mut ar1 = angle2.to_radians();
    let mut ar2 = angle1.to_radians();
    let segs = ((ar2 - ar1).abs() / FRAC_PI_2) as usize + 1;
    let ars = -(ar2 - ar1) / segs as f64;

    let start = dvec2(
        center.x + width / 2.0 * ar1.cos(),
        center.y - height / 2.0 * ar1.sin(),
    );

    // mirror at the x axis into y-down space
    ar1 = -ar1;
    ar2 = -ar2;
    let lowest = ar1.min(ar2);
    if lowest < 0.0 {
        let turns = (-lowest / TAU).ceil();
        ar1 += turns * TAU;
        ar2 += turns * TAU;
    }

    if closed {
        path.push(BezPoint::MoveTo(start));
        arc_segment(path, center, radius, ar1, ar2);
        path.push(BezPoint::LineTo(center));
        path.push(BezPoint::LineTo(start));
    } else {
        path_append(path, start);
        for i in 0..segs {
            let a = ar1 + i as f64 * ars;
            arc_segment(path, center, radius, a, a + ars);
        }
    }
}

/// Append a closed ellipse of four cubics, starting at the top and going
/// clockwise on screen.
pub fn path_build_ellipse(path: &mut Vec<BezPoint>, center: Point, width: f64, height: f64) {
    let w2 = width / 2.0;
    let h2 = height / 2.0;
    let dx = w2 * ELLIPSE_CONTROL_RATIO;
    let dy = h2 * ELLIPSE_CONTROL_RATIO;
    let (cx, cy) = (center.x, center.y);

    path.push(BezPoint::MoveTo(dvec2(cx, cy - h2)));
    // right, bottom, left, top
    path.push(BezPoint::CurveTo(
        dvec2(cx + dx, cy - h2),
        dvec2(cx + w2, cy - dy),
        dvec2(cx + w2, cy),
    ));
    path.push(BezPoint::CurveTo(
        dvec2(cx + w2, cy + dy),
        dvec2(cx + dx, cy + h2),
        dvec2(cx, cy + h2),
    ));
    path.push(BezPoint::CurveTo(
        dvec2(cx - dx, cy + h2),
        dvec2(cx - w2, cy + dy),
        dvec2(cx - w2, cy),
    ));
    path.push(BezPoint::CurveTo(
        dvec2(cx - w2, cy - dy),
        dvec2(cx - dx, cy - h2),
        dvec2(cx, cy - h2),
    ));
}

/// Clamp a corner radius so opposite corners never overlap
pub fn clamp_corner_radius(ul: Point, lr: Point, radius: f64) -> f64 {
    radius.min((lr.x - ul.x) / 2.0).min((lr.y - ul.y) / 2.0)
}

/// Closed outline of a rounded rectangle, clockwise from the top edge.
///
/// A non-positive radius gives the plain rectangle.
pub fn rounded_rect_outline(ul: Point, lr: Point, radius: f64) -> Vec<BezPoint> {
    let r = clamp_corner_radius(ul, lr, radius);
    let mut path = Vec::with_capacity(16);
    if r <= 0.0 {
        path.push(BezPoint::MoveTo(ul));
        path.push(BezPoint::LineTo(dvec2(lr.x, ul.y)));
        path.push(BezPoint::LineTo(lr));
        path.push(BezPoint::LineTo(dvec2(ul.x, lr.y)));
        path.push(BezPoint::LineTo(ul));
        return path;
    }

    let d = 2.0 * r;
    path.push(BezPoint::MoveTo(dvec2(ul.x + r, ul.y)));
    path.push(BezPoint::LineTo(dvec2(lr.x - r, ul.y)));
    path_build_arc(&mut path, dvec2(lr.x - r, ul.y + r), d, d, 0.0, 90.0, false);
    path.push(BezPoint::LineTo(dvec2(lr.x, lr.y - r)));
    path_build_arc(&mut path, dvec2(lr.x - r, lr.y - r), d, d, 270.0, 360.0, false);
    path.push(BezPoint::LineTo(dvec2(ul.x + r, lr.y)));
    path_build_arc(&mut path, dvec2(ul.x + r, lr.y - r), d, d, 180.0, 270.0, false);
    path.push(BezPoint::LineTo(dvec2(ul.x, ul.y + r)));
    path_build_arc(&mut path, dvec2(ul.x + r, ul.y + r), d, d, 90.0, 180.0, false);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bezier_point_at;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    /// Every curve's midpoint stays within `tolerance` of the circle
    fn assert_on_circle(path: &[BezPoint], center: Point, radius: f64, tolerance: f64) {
        let mut prev = path[0].end_point();
        for bp in &path[1..] {
            if let BezPoint::CurveTo(p1, p2, p3) = *bp {
                let mid = bezier_point_at(prev, p1, p2, p3, 0.5);
                let off = (mid.distance(center) - radius).abs();
                assert!(off < tolerance, "midpoint {mid:?} is {off} off the circle");
            }
            prev = bp.end_point();
        }
    }

    #[test]
    fn quarter_arc_runs_from_top_to_right() {
        let mut path = Vec::new();
        path_build_arc(&mut path, dvec2(0.0, 0.0), 2.0, 2.0, 0.0, 90.0, false);
        assert_eq!(path.len(), 3, "move-to plus two cubics");
        assert_point_eq(path[0].end_point(), dvec2(0.0, -1.0));
        assert_point_eq(path[2].end_point(), dvec2(1.0, 0.0));
        assert_on_circle(&path, dvec2(0.0, 0.0), 1.0, 1e-3);
    }

    #[test]
    fn full_turn_takes_five_cubics() {
        let mut path = Vec::new();
        path_build_arc(&mut path, dvec2(0.0, 0.0), 2.0, 2.0, 0.0, 360.0, false);
        assert_eq!(path.len(), 6, "move-to plus five cubics");
        assert!(path[1..].iter().all(|bp| matches!(bp, BezPoint::CurveTo(..))));
        assert_point_eq(path[0].end_point(), dvec2(1.0, 0.0));
        assert_point_eq(path[5].end_point(), dvec2(1.0, 0.0));
        assert_on_circle(&path, dvec2(0.0, 0.0), 1.0, 1e-3);
    }

    #[test]
    fn wrapping_arc_takes_the_short_way() {
        // 315° -> 45° passes through 0°, the right-hand side
        let mut path = Vec::new();
        path_build_arc(&mut path, dvec2(0.0, 0.0), 2.0, 2.0, 315.0, 45.0, false);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert_point_eq(path[0].end_point(), dvec2(s, -s));
        let end = path.last().map(BezPoint::end_point).unwrap_or_default();
        assert_point_eq(end, dvec2(s, s));
        for bp in &path {
            assert!(bp.end_point().x > 0.0);
        }
    }

    #[test]
    fn open_arc_attaches_to_path_end() {
        let mut path = vec![BezPoint::MoveTo(dvec2(-3.0, -1.0)), BezPoint::LineTo(dvec2(0.0, -1.0))];
        path_build_arc(&mut path, dvec2(0.0, 0.0), 2.0, 2.0, 0.0, 90.0, false);
        assert_eq!(path.iter().filter(|bp| bp.is_move_to()).count(), 1);
    }

    #[test]
    fn closed_arc_is_a_wedge() {
        let mut path = Vec::new();
        path_build_arc(&mut path, dvec2(5.0, 5.0), 4.0, 4.0, 0.0, 90.0, true);
        assert_eq!(path.len(), 4);
        assert!(path[0].is_move_to());
        assert_eq!(path[2], BezPoint::LineTo(dvec2(5.0, 5.0)));
        assert_eq!(path[3], BezPoint::LineTo(path[0].end_point()));
    }

    #[test]
    fn non_finite_angles_leave_path_untouched() {
        let mut path = Vec::new();
        path_build_arc(&mut path, dvec2(0.0, 0.0), 2.0, 2.0, f64::NAN, 90.0, false);
        assert!(path.is_empty());
    }

    #[test]
    fn ellipse_is_closed_and_hits_the_axes() {
        let mut path = Vec::new();
        path_build_ellipse(&mut path, dvec2(10.0, 20.0), 8.0, 4.0);
        assert_eq!(path.len(), 5);
        assert_point_eq(path[0].end_point(), dvec2(10.0, 18.0));
        assert_point_eq(path[1].end_point(), dvec2(14.0, 20.0));
        assert_point_eq(path[2].end_point(), dvec2(10.0, 22.0));
        assert_point_eq(path[3].end_point(), dvec2(6.0, 20.0));
        assert_point_eq(path[4].end_point(), path[0].end_point());
    }

    #[test]
    fn rounded_rect_outline_is_one_closed_contour() {
        let ul = dvec2(0.0, 0.0);
        let lr = dvec2(10.0, 6.0);
        let path = rounded_rect_outline(ul, lr, 2.0);
        assert_eq!(path.iter().filter(|bp| bp.is_move_to()).count(), 1);
        let first = path[0].end_point();
        let last = path.last().map(BezPoint::end_point).unwrap_or_default();
        assert!(first.distance(last) < STITCH_EPSILON);
        let bb = crate::bbox::polybezier_bbox(&path, &Default::default(), true);
        assert!((bb.left - 0.0).abs() < 1e-9 && (bb.right - 10.0).abs() < 1e-9);
        assert!((bb.top - 0.0).abs() < 1e-9 && (bb.bottom - 6.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_radius_is_clamped() {
        assert_eq!(clamp_corner_radius(dvec2(0.0, 0.0), dvec2(10.0, 4.0), 5.0), 2.0);
        let flat = rounded_rect_outline(dvec2(0.0, 0.0), dvec2(4.0, 4.0), 0.0);
        assert_eq!(flat.len(), 5);
    }
}
