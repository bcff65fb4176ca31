//! Stroke-aware bounding boxes.
//!
//! Every function here returns the smallest axis-aligned [`Rectangle`] that
//! covers a primitive once it is stroked. Stroke and arrow geometry is not
//! baked into the points; it comes in through the `*BBExtras` structs:
//!
//! - `*_long` extends along the path direction past an end point
//! - `*_trans` extends perpendicular to the path direction
//!
//! For polylines and bezier chains the interior joins are also widened to
//! cover miter overshoot.

use crate::defaults::MITER_COS_LIMIT;
use crate::geometry::{CubicCoeffs, clamped_acos, normalize_or_zero, perpendicular};
use crate::types::{BezPoint, Point, Rectangle};
use glam::DVec2;

/// Margins for bezier chains and polylines
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolyBBExtras {
    pub start_long: f64,
    pub start_trans: f64,
    pub middle_trans: f64,
    pub end_long: f64,
    pub end_trans: f64,
}

impl PolyBBExtras {
    /// Every margin is half the line width
    pub fn with_line_width(line_width: f64) -> Self {
        let half = line_width / 2.0;
        Self {
            start_long: half,
            start_trans: half,
            middle_trans: half,
            end_long: half,
            end_trans: half,
        }
    }
}

/// Margins for a single straight line
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineBBExtras {
    pub start_long: f64,
    pub start_trans: f64,
    pub end_long: f64,
    pub end_trans: f64,
}

impl LineBBExtras {
    pub fn with_line_width(line_width: f64) -> Self {
        let half = line_width / 2.0;
        Self {
            start_long: half,
            start_trans: half,
            end_long: half,
            end_trans: half,
        }
    }
}

/// Margin for closed elements (rectangles, ellipses)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBBExtras {
    pub border_trans: f64,
}

/// Unit direction, `+x` when the vector has no length.
fn unit_direction(v: DVec2) -> DVec2 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        DVec2::X
    }
}

/// Add the four corners of the box an arrow head (or stroke cap) occupies
/// at `vertex`, pointing along `normed_dir`.
pub fn add_arrow_rectangle(
    rect: &mut Rectangle,
    vertex: Point,
    normed_dir: DVec2,
    extra_long: f64,
    extra_trans: f64,
) {
    let vt = perpendicular(normed_dir);
    let mut pt = vertex + normed_dir * extra_long + vt * extra_trans;
    rect.add_point(pt);
    pt += vt * (-2.0 * extra_trans);
    rect.add_point(pt);
    pt += normed_dir * (-2.0 * extra_long);
    rect.add_point(pt);
    pt += vt * (2.0 * extra_trans);
    rect.add_point(pt);
}

/// Bounding box of one cubic segment.
///
/// Covers both end caps (using the neighbouring control point, or the one
/// after it when they coincide) and the stroke width at each interior x/y
/// extremum.
pub fn bicubicbezier_bbox(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    extra: &PolyBBExtras,
) -> Rectangle {
    let mut rect = Rectangle::from_point(p0);
    rect.add_point(p3);

    let mut vl = p0 - p1;
    if vl.length() == 0.0 {
        vl = p0 - p2;
    }
    add_arrow_rectangle(
        &mut rect,
        p0,
        unit_direction(vl),
        extra.start_long,
        extra.start_trans.max(extra.middle_trans),
    );

    let mut vl = p3 - p2;
    if vl.length() == 0.0 {
        vl = p3 - p1;
    }
    add_arrow_rectangle(
        &mut rect,
        p3,
        unit_direction(vl),
        extra.end_long,
        extra.end_trans.max(extra.middle_trans),
    );

    let coeffs = CubicCoeffs::new(p0, p1, p2, p3);
    for axis in [coeffs.x, coeffs.y] {
        for u in axis.extrema() {
            if !(0.0..=1.0).contains(&u) {
                continue;
            }
            let p = coeffs.eval(u);
            let vt = perpendicular(unit_direction(coeffs.tangent(u)));
            rect.add_point(p + vt * extra.middle_trans);
            rect.add_point(p - vt * extra.middle_trans);
        }
    }

    rect
}

/// Bounding box of a straight line with caps or arrows at both ends.
///
/// `p1 == p2` has no direction; the caps are then laid along `+x`.
pub fn line_bbox(p1: Point, p2: Point, extra: &LineBBExtras) -> Rectangle {
    let mut rect = Rectangle::from_point(p1);
    rect.add_point(p2);

    let vl = unit_direction(p1 - p2);
    add_arrow_rectangle(&mut rect, p1, vl, extra.start_long, extra.start_trans);
    add_arrow_rectangle(&mut rect, p2, -vl, extra.end_long, extra.end_trans);
    rect
}

/// Conservative box of an ellipse: its frame plus the border
pub fn ellipse_bbox(center: Point, width: f64, height: f64, extra: &ElementBBExtras) -> Rectangle {
    let half = DVec2::new(width / 2.0, height / 2.0);
    let frame = Rectangle::from_corners(center - half, center + half);
    rectangle_bbox(&frame, extra)
}

pub fn rectangle_bbox(rect: &Rectangle, extra: &ElementBBExtras) -> Rectangle {
    rect.inflate(extra.border_trans)
}

/// Bounding box of a polyline, optionally closed back to its first point.
pub fn polyline_bbox(points: &[Point], extra: &PolyBBExtras, closed: bool) -> Rectangle {
    let Some((&first, rest)) = points.split_first() else {
        return Rectangle::EMPTY;
    };
    let mut bez = Vec::with_capacity(points.len() + 1);
    bez.push(BezPoint::MoveTo(first));
    bez.extend(rest.iter().map(|&p| BezPoint::LineTo(p)));
    if closed {
        bez.push(BezPoint::LineTo(first));
    }
    polybezier_bbox(&bez, extra, closed)
}

/// Derived margins for each segment position along a chain
struct ChainExtras {
    full_line: LineBBExtras,
    start_line: LineBBExtras,
    end_line: LineBBExtras,
    middle_line: LineBBExtras,
    full_curve: PolyBBExtras,
    start_curve: PolyBBExtras,
    end_curve: PolyBBExtras,
    middle_curve: PolyBBExtras,
}

impl ChainExtras {
    fn derive(extra: &PolyBBExtras) -> Self {
        let mt = extra.middle_trans;
        let start_trans = extra.start_trans.max(mt);
        let end_trans = extra.end_trans.max(mt);
        Self {
            full_line: LineBBExtras {
                start_long: extra.start_long,
                start_trans,
                end_long: extra.end_long,
                end_trans,
            },
            start_line: LineBBExtras {
                start_long: extra.start_long,
                start_trans,
                end_long: 0.0,
                end_trans: mt,
            },
            end_line: LineBBExtras {
                start_long: 0.0,
                start_trans: mt,
                end_long: extra.end_long,
                end_trans,
            },
            middle_line: LineBBExtras {
                start_long: 0.0,
                start_trans: mt,
                end_long: 0.0,
                end_trans: mt,
            },
            full_curve: PolyBBExtras {
                start_long: extra.start_long,
                start_trans,
                middle_trans: mt,
                end_long: extra.end_long,
                end_trans,
            },
            start_curve: PolyBBExtras {
                start_long: extra.start_long,
                start_trans: extra.start_trans,
                middle_trans: mt,
                end_long: 0.0,
                end_trans: mt,
            },
            end_curve: PolyBBExtras {
                start_long: 0.0,
                start_trans: mt,
                middle_trans: mt,
                end_long: extra.end_long,
                end_trans: extra.end_trans,
            },
            middle_curve: PolyBBExtras {
                start_long: 0.0,
                start_trans: mt,
                middle_trans: mt,
                end_long: 0.0,
                end_trans: mt,
            },
        }
    }
}

/// Bounding box of a bezier chain. `points` must start with a move-to.
///
/// Closed chains get middle margins everywhere (the line segments keep the
/// full line margins). Open chains use the start and end margins on their
/// first and last segment of every sub-path.
pub fn polybezier_bbox(points: &[BezPoint], extra: &PolyBBExtras, closed: bool) -> Rectangle {
    let Some(first) = points.first() else {
        return Rectangle::EMPTY;
    };
    debug_assert!(first.is_move_to(), "bezier chain must start with a move-to");

    let n = points.len();
    let mut rect = Rectangle::from_point(first.p1());
    let chain = ChainExtras::derive(extra);

    for i in 1..n {
        let mut next = (i + 1) % n;
        let mut prev = i - 1;
        if closed && next == 0 {
            next = 1;
        }
        if closed && prev == 0 {
            prev = n - 1;
        }

        let prev_end = points[prev].end_point();
        // vx: current vertex, vp: the point we arrive from, vsc: segment start
        let (vx, vp, vsc) = match points[i] {
            BezPoint::MoveTo(_) => continue,
            BezPoint::LineTo(p) => (p, prev_end, prev_end),
            BezPoint::CurveTo(_, p2, p3) => (p3, p2, prev_end),
        };
        let start = points[prev].is_move_to();
        let end = points[next].is_move_to();
        let vn = points[next].p1();

        let segment = match points[i] {
            BezPoint::LineTo(_) => {
                let lextra = if closed || (start && end) {
                    &chain.full_line
                } else if start {
                    &chain.start_line
                } else if end {
                    &chain.end_line
                } else {
                    &chain.middle_line
                };
                line_bbox(vsc, vx, lextra)
            }
            BezPoint::CurveTo(p1, p2, p3) => {
                let bextra = if closed {
                    &chain.middle_curve
                } else if start && end {
                    &chain.full_curve
                } else if start {
                    &chain.start_curve
                } else if end {
                    &chain.end_curve
                } else {
                    &chain.middle_curve
                };
                bicubicbezier_bbox(vsc, p1, p2, p3, bextra)
            }
            BezPoint::MoveTo(_) => continue,
        };
        rect.union_with(&segment);

        if !end {
            add_miter_overshoot(&mut rect, vp, vx, vn, extra.middle_trans);
        }
    }

    rect
}

/// Widen `rect` by the tip a mitered join at `vx` sticks out.
fn add_miter_overshoot(rect: &mut Rectangle, vp: Point, vx: Point, vn: Point, middle_trans: f64) {
    let vpx = normalize_or_zero(vx - vp);
    let vxn = normalize_or_zero(vn - vx);

    let co = vpx.dot(vxn);
    if co <= MITER_COS_LIMIT {
        // folds back on itself; the tip would grow without bound
        return;
    }

    let alpha = clamped_acos(-co);
    let overshoot = if alpha > 0.0 && alpha < std::f64::consts::PI {
        middle_trans / (alpha / 2.0).sin()
    } else {
        middle_trans
    };

    let vovs = normalize_or_zero(vpx - vxn);
    rect.add_point(vx + vovs * overshoot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    const EPSILON: f64 = 1e-9;

    fn assert_rect_eq(actual: Rectangle, expected: Rectangle) {
        let close = (actual.left - expected.left).abs() < EPSILON
            && (actual.top - expected.top).abs() < EPSILON
            && (actual.right - expected.right).abs() < EPSILON
            && (actual.bottom - expected.bottom).abs() < EPSILON;
        assert!(close, "expected {:?}, got {:?}", expected, actual);
    }

    #[test]
    fn s_curve_reaches_interior_extrema() {
        let rect = bicubicbezier_bbox(
            dvec2(0.0, 0.0),
            dvec2(3.0, 5.0),
            dvec2(7.0, -5.0),
            dvec2(10.0, 0.0),
            &PolyBBExtras::default(),
        );
        // y(u) = 30u^3 - 45u^2 + 15u peaks at u = 0.5 -+ sqrt(3)/6
        let u = 0.5 - 3f64.sqrt() / 6.0;
        let peak = 30.0 * u * u * u - 45.0 * u * u + 15.0 * u;
        assert!((rect.bottom - peak).abs() < 1e-9);
        assert!((rect.top + peak).abs() < 1e-9);
        assert!(rect.bottom > 1.4);
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.right, 10.0);
    }

    #[test]
    fn curve_bbox_excludes_control_points() {
        let rect = bicubicbezier_bbox(
            dvec2(0.0, 0.0),
            dvec2(0.0, 10.0),
            dvec2(10.0, 10.0),
            dvec2(10.0, 0.0),
            &PolyBBExtras::default(),
        );
        assert!((rect.bottom - 7.5).abs() < 1e-9);
    }

    #[test]
    fn curve_bbox_with_coincident_controls() {
        // p1 == p0 and p2 == p3: tangents fall back to the other control point
        let extra = PolyBBExtras::with_line_width(2.0);
        let rect = bicubicbezier_bbox(
            dvec2(0.0, 0.0),
            dvec2(0.0, 0.0),
            dvec2(10.0, 0.0),
            dvec2(10.0, 0.0),
            &extra,
        );
        assert_rect_eq(rect, Rectangle::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn line_bbox_adds_caps() {
        let rect = line_bbox(
            dvec2(0.0, 0.0),
            dvec2(10.0, 0.0),
            &LineBBExtras::with_line_width(2.0),
        );
        assert_rect_eq(rect, Rectangle::new(-1.0, -1.0, 11.0, 1.0));
    }

    #[test]
    fn line_bbox_zero_length_is_finite() {
        let p = dvec2(3.0, 4.0);
        let rect = line_bbox(p, p, &LineBBExtras::with_line_width(1.0));
        assert!(rect.left.is_finite() && rect.bottom.is_finite());
        assert!(rect.contains_point(p));
        assert_rect_eq(rect, Rectangle::new(2.5, 3.5, 3.5, 4.5));
    }

    #[test]
    fn rectangle_and_ellipse_bbox() {
        let extra = ElementBBExtras { border_trans: 0.5 };
        assert_rect_eq(
            rectangle_bbox(&Rectangle::new(0.0, 0.0, 2.0, 1.0), &extra),
            Rectangle::new(-0.5, -0.5, 2.5, 1.5),
        );
        assert_rect_eq(
            ellipse_bbox(dvec2(1.0, 1.0), 4.0, 2.0, &extra),
            Rectangle::new(-1.5, -0.5, 3.5, 2.5),
        );
    }

    #[test]
    fn closed_square_without_margin_is_tight() {
        let square = [
            dvec2(0.0, 0.0),
            dvec2(2.0, 0.0),
            dvec2(2.0, 2.0),
            dvec2(0.0, 2.0),
        ];
        let rect = polyline_bbox(&square, &PolyBBExtras::default(), true);
        assert_rect_eq(rect, Rectangle::new(0.0, 0.0, 2.0, 2.0));
    }

    #[test]
    fn square_corners_get_miter_overshoot() {
        let square = [
            dvec2(0.0, 0.0),
            dvec2(2.0, 0.0),
            dvec2(2.0, 2.0),
            dvec2(0.0, 2.0),
        ];
        let rect = polyline_bbox(&square, &PolyBBExtras::with_line_width(1.0), true);
        // a right-angle miter tip sits at half width along both axes
        assert_rect_eq(rect, Rectangle::new(-0.5, -0.5, 2.5, 2.5));
    }

    #[test]
    fn sharp_join_extends_past_segment_boxes() {
        // a narrow spike: the miter tip at (10, 0) pokes well past x = 10.5
        let points = [dvec2(0.0, -2.0), dvec2(10.0, 0.0), dvec2(0.0, 2.0)];
        let extra = PolyBBExtras {
            middle_trans: 0.5,
            ..Default::default()
        };
        let rect = polyline_bbox(&points, &extra, false);
        let naive = line_bbox(points[0], points[1], &LineBBExtras::with_line_width(1.0))
            .union(&line_bbox(points[1], points[2], &LineBBExtras::with_line_width(1.0)));
        assert!(rect.right > naive.right + 1.0, "{:?} vs {:?}", rect, naive);
    }

    #[test]
    fn open_polyline_uses_end_margins() {
        let points = [dvec2(0.0, 0.0), dvec2(10.0, 0.0)];
        let extra = PolyBBExtras {
            start_long: 3.0,
            start_trans: 2.0,
            end_long: 1.0,
            end_trans: 1.0,
            middle_trans: 0.0,
        };
        let rect = polyline_bbox(&points, &extra, false);
        assert_rect_eq(rect, Rectangle::new(-3.0, -2.0, 11.0, 2.0));
    }

    #[test]
    fn bbox_covers_all_vertices() {
        let path = [
            BezPoint::MoveTo(dvec2(1.0, 1.0)),
            BezPoint::LineTo(dvec2(5.0, 2.0)),
            BezPoint::CurveTo(dvec2(6.0, 8.0), dvec2(-2.0, 6.0), dvec2(0.0, 3.0)),
            BezPoint::LineTo(dvec2(1.0, 1.0)),
        ];
        for margin in [0.0, 0.25, 1.0] {
            let rect = polybezier_bbox(&path, &PolyBBExtras::with_line_width(margin * 2.0), true);
            for bp in &path {
                assert!(rect.contains_point(bp.end_point()));
            }
            let bare = polybezier_bbox(&path, &PolyBBExtras::default(), true);
            assert!(rect.inflate(1e-9).contains(&bare));
        }
    }

    #[test]
    fn margin_removal_recovers_straight_bbox() {
        let points = [dvec2(0.0, 0.0), dvec2(4.0, 0.0), dvec2(4.0, 3.0)];
        let bare = polyline_bbox(&points, &PolyBBExtras::default(), false);
        let wide = polyline_bbox(&points, &PolyBBExtras::with_line_width(0.5), false);
        assert!(bare.inflate(1e-9).contains(&wide.inflate(-0.25)));
    }
}
