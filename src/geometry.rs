//! Point arithmetic, cubic evaluation and point-to-outline distances.
//!
//! This is the math layer everything else stands on: bounding boxes use the
//! Bernstein form to find extrema, the renderer and combination code use the
//! distance queries for containment.

use crate::defaults::{BEZIER_SUBDIVISIONS, DEGENERATE_EPSILON};
use crate::types::{BezPoint, Point};
use glam::dvec2;

/// Unit vector, or `(0, 0)` for a zero-length input.
#[inline]
pub fn normalize_or_zero(v: Point) -> Point {
    v.normalize_or_zero()
}

/// Counter-clockwise perpendicular `(-y, x)`
#[inline]
pub fn perpendicular(v: Point) -> Point {
    dvec2(-v.y, v.x)
}

#[inline]
pub fn distance_point_point(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// `acos` with the argument clamped into `[-1, 1]`
pub fn clamped_acos(x: f64) -> f64 {
    if x <= -1.0 {
        std::f64::consts::PI
    } else if x >= 1.0 {
        0.0
    } else {
        x.acos()
    }
}

/// Distance from `p` to the segment `start..end` drawn with `line_width`.
///
/// Zero when `p` is on the stroke.
pub fn distance_line_point(start: Point, end: Point, line_width: f64, p: Point) -> f64 {
    let v1 = end - start;
    let v2 = p - start;

    let v1_lensq = v1.length_squared();
    if v1_lensq < DEGENERATE_EPSILON {
        return v2.length();
    }

    let projlen = v1.dot(v2) / v1_lensq;
    if projlen < 0.0 {
        return v2.length();
    }
    if projlen > 1.0 {
        return p.distance(end);
    }

    let perp_dist = (v1 * projlen - v2).length() - line_width / 2.0;
    perp_dist.max(0.0)
}

/// 1 if the segment crosses the horizontal ray going right from `ray`.
///
/// Half-open in y so a ray through a shared vertex counts once.
pub fn line_crosses_ray(start: Point, end: Point, ray: Point) -> u32 {
    let straddles = (start.y <= ray.y && end.y > ray.y) || (start.y > ray.y && end.y <= ray.y);
    if straddles {
        let vt = (ray.y - start.y) / (end.y - start.y);
        if ray.x < start.x + vt * (end.x - start.x) {
            return 1;
        }
    }
    0
}

/// Power-basis coefficients of one cubic coordinate:
/// `a*u^3 + b*u^2 + c*u + d`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BernsteinCoeffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl BernsteinCoeffs {
    pub fn develop(p0: f64, p1: f64, p2: f64, p3: f64) -> Self {
        Self {
            a: -p0 + 3.0 * p1 - 3.0 * p2 + p3,
            b: 3.0 * p0 - 6.0 * p1 + 3.0 * p2,
            c: -3.0 * p0 + 3.0 * p1,
            d: p0,
        }
    }

    #[inline]
    pub fn eval(&self, u: f64) -> f64 {
        ((self.a * u + self.b) * u + self.c) * u + self.d
    }

    /// First derivative at `u`
    #[inline]
    pub fn tangent(&self, u: f64) -> f64 {
        (3.0 * self.a * u + 2.0 * self.b) * u + self.c
    }

    /// Roots of the derivative, unclipped.
    ///
    /// A near-zero cubic term degrades to the linear root; a negative
    /// discriminant yields nothing.
    pub fn extrema(&self) -> Vec<f64> {
        let delta = 4.0 * self.b * self.b - 12.0 * self.a * self.c;
        if delta < 0.0 {
            return Vec::new();
        }
        if self.a.abs() < DEGENERATE_EPSILON {
            if self.b == 0.0 {
                return Vec::new();
            }
            return vec![-self.c / (2.0 * self.b)];
        }
        let root = delta.sqrt();
        let u0 = (-2.0 * self.b + root) / (6.0 * self.a);
        if delta == 0.0 {
            vec![u0]
        } else {
            vec![u0, (-2.0 * self.b - root) / (6.0 * self.a)]
        }
    }
}

/// Both coordinates of a cubic in power form
#[derive(Clone, Copy, Debug)]
pub struct CubicCoeffs {
    pub x: BernsteinCoeffs,
    pub y: BernsteinCoeffs,
}

impl CubicCoeffs {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            x: BernsteinCoeffs::develop(p0.x, p1.x, p2.x, p3.x),
            y: BernsteinCoeffs::develop(p0.y, p1.y, p2.y, p3.y),
        }
    }

    pub fn eval(&self, u: f64) -> Point {
        dvec2(self.x.eval(u), self.y.eval(u))
    }

    pub fn tangent(&self, u: f64) -> Point {
        dvec2(self.x.tangent(u), self.y.tangent(u))
    }
}

/// Point at `t` on the cubic through the four control points
pub fn bezier_point_at(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let it = 1.0 - t;
    p0 * (it * it * it) + p1 * (3.0 * t * it * it) + p2 * (3.0 * t * t * it) + p3 * (t * t * t)
}

/// Distance to a flattened cubic, counting ray crossings when asked.
fn bez_distance_and_crosses(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    line_width: f64,
    point: Point,
    mut crossings: Option<&mut u32>,
) -> f64 {
    let mut dist = f64::MAX;
    let mut prev = p0;
    for i in 1..=BEZIER_SUBDIVISIONS {
        let t = i as f64 / BEZIER_SUBDIVISIONS as f64;
        let pt = bezier_point_at(p0, p1, p2, p3, t);
        dist = dist.min(distance_line_point(prev, pt, line_width, point));
        if let Some(count) = crossings.as_deref_mut() {
            *count += line_crosses_ray(prev, pt, point);
        }
        prev = pt;
    }
    dist
}

/// Distance from `point` to the element `seg` starting at `start`.
pub fn distance_bez_seg_point(start: Point, seg: &BezPoint, line_width: f64, point: Point) -> f64 {
    match *seg {
        BezPoint::CurveTo(p1, p2, p3) => {
            bez_distance_and_crosses(start, p1, p2, p3, line_width, point, None)
        }
        BezPoint::MoveTo(p) | BezPoint::LineTo(p) => {
            distance_line_point(start, p, line_width, point)
        }
    }
}

/// Distance to an open bezier chain. `points` must start with a move-to.
pub fn distance_bez_line_point(points: &[BezPoint], line_width: f64, point: Point) -> f64 {
    let Some(first) = points.first() else {
        return f64::MAX;
    };
    debug_assert!(first.is_move_to(), "bezier chain must start with a move-to");

    let mut last = first.p1();
    let mut dist = f64::MAX;
    for bp in &points[1..] {
        match *bp {
            BezPoint::MoveTo(p) => last = p,
            BezPoint::LineTo(p) => {
                dist = dist.min(distance_line_point(last, p, line_width, point));
                last = p;
            }
            BezPoint::CurveTo(p1, p2, p3) => {
                dist = dist.min(bez_distance_and_crosses(
                    last, p1, p2, p3, line_width, point, None,
                ));
                last = p3;
            }
        }
    }
    dist
}

/// Distance to a closed bezier shape: 0 inside, else distance to the outline.
///
/// Each sub-path is closed implicitly if it does not end on its start.
/// Inside-ness uses the even-odd rule.
pub fn distance_bez_shape_point(points: &[BezPoint], line_width: f64, point: Point) -> f64 {
    let Some(first) = points.first() else {
        return f64::MAX;
    };
    debug_assert!(first.is_move_to(), "bezier shape must start with a move-to");

    let mut last = first.p1();
    let mut close_to = Some(last);
    let mut dist = f64::MAX;
    let mut crossings = 0u32;

    for bp in &points[1..] {
        match *bp {
            BezPoint::MoveTo(p) => {
                if let Some(start) = close_to {
                    dist = dist.min(distance_line_point(last, start, line_width, point));
                    crossings += line_crosses_ray(last, start, point);
                }
                last = p;
                close_to = Some(p);
                continue;
            }
            BezPoint::LineTo(p) => {
                dist = dist.min(distance_line_point(last, p, line_width, point));
                crossings += line_crosses_ray(last, p, point);
                last = p;
            }
            BezPoint::CurveTo(p1, p2, p3) => {
                dist = dist.min(bez_distance_and_crosses(
                    last,
                    p1,
                    p2,
                    p3,
                    line_width,
                    point,
                    Some(&mut crossings),
                ));
                last = p3;
            }
        }
        if close_to == Some(last) {
            close_to = None;
        }
    }

    if let Some(start) = close_to {
        dist = dist.min(distance_line_point(last, start, line_width, point));
        crossings += line_crosses_ray(last, start, point);
    }

    if crossings % 2 == 1 { 0.0 } else { dist }
}

/// Enclosed area of each flattened sub-path, summed.
///
/// Sub-paths are closed implicitly and counted regardless of winding, so
/// a hole adds to the total rather than subtracting.
pub fn outline_area(points: &[BezPoint]) -> f64 {
    fn shoelace(poly: &[Point]) -> f64 {
        let n = poly.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (poly[i], poly[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        (twice / 2.0).abs()
    }

    let mut total = 0.0;
    let mut poly: Vec<Point> = Vec::new();
    for bp in points {
        match *bp {
            BezPoint::MoveTo(p) => {
                total += shoelace(&poly);
                poly.clear();
                poly.push(p);
            }
            BezPoint::LineTo(p) => poly.push(p),
            BezPoint::CurveTo(p1, p2, p3) => {
                let p0 = poly.last().copied().unwrap_or(p1);
                for i in 1..=BEZIER_SUBDIVISIONS {
                    let t = i as f64 / BEZIER_SUBDIVISIONS as f64;
                    poly.push(bezier_point_at(p0, p1, p2, p3, t));
                }
            }
        }
    }
    total + shoelace(&poly)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    fn unit_square() -> Vec<BezPoint> {
        vec![
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 1.0)),
            BezPoint::LineTo(dvec2(0.0, 1.0)),
        ]
    }

    #[test]
    fn distance_line_point_regions() {
        let a = dvec2(0.0, 0.0);
        let b = dvec2(10.0, 0.0);
        // before the start, beyond the end, beside the middle
        assert!((distance_line_point(a, b, 0.0, dvec2(-3.0, 4.0)) - 5.0).abs() < EPSILON);
        assert!((distance_line_point(a, b, 0.0, dvec2(13.0, 4.0)) - 5.0).abs() < EPSILON);
        assert!((distance_line_point(a, b, 0.0, dvec2(5.0, 2.0)) - 2.0).abs() < EPSILON);
        // line width eats into the distance and never goes negative
        assert!((distance_line_point(a, b, 2.0, dvec2(5.0, 2.0)) - 1.0).abs() < EPSILON);
        assert_eq!(distance_line_point(a, b, 10.0, dvec2(5.0, 2.0)), 0.0);
    }

    #[test]
    fn distance_line_point_degenerate_segment() {
        let a = dvec2(1.0, 1.0);
        assert!((distance_line_point(a, a, 0.0, dvec2(4.0, 5.0)) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn ray_crossing_counts_shared_vertex_once() {
        let ray = dvec2(-1.0, 1.0);
        let crossings = line_crosses_ray(dvec2(0.0, 0.0), dvec2(0.0, 1.0), ray)
            + line_crosses_ray(dvec2(0.0, 1.0), dvec2(0.0, 2.0), ray);
        assert_eq!(crossings, 1);
    }

    #[test]
    fn bernstein_matches_direct_evaluation() {
        let (p0, p1, p2, p3) = (dvec2(0.0, 0.0), dvec2(3.0, 5.0), dvec2(7.0, -5.0), dvec2(10.0, 0.0));
        let coeffs = CubicCoeffs::new(p0, p1, p2, p3);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert_point_eq(coeffs.eval(t), bezier_point_at(p0, p1, p2, p3, t));
        }
    }

    #[test]
    fn extrema_of_s_curve() {
        let y = BernsteinCoeffs::develop(0.0, 5.0, -5.0, 0.0);
        let mut roots = y.extrema();
        roots.sort_by(f64::total_cmp);
        assert_eq!(roots.len(), 2);
        for u in roots {
            assert!(y.tangent(u).abs() < 1e-9);
        }
    }

    #[test]
    fn extrema_of_quadratic_like_cubic() {
        // cubic term vanishes: 3*(p1 - p2) == p3 - p0
        let x = BernsteinCoeffs::develop(0.0, 1.0, 1.0, 0.0);
        assert!(x.a.abs() < DEGENERATE_EPSILON);
        assert_eq!(x.extrema(), vec![0.5]);
        let straight = BernsteinCoeffs::develop(0.0, 1.0, 2.0, 3.0);
        assert!(straight.extrema().is_empty());
    }

    #[test]
    fn shape_distance_inside_is_zero() {
        let square = unit_square();
        assert_eq!(distance_bez_shape_point(&square, 0.0, dvec2(0.5, 0.5)), 0.0);
        let outside = distance_bez_shape_point(&square, 0.0, dvec2(3.0, 0.5));
        assert!((outside - 2.0).abs() < EPSILON);
    }

    #[test]
    fn shape_distance_hole_by_even_odd() {
        let mut shape = unit_square();
        shape.extend([
            BezPoint::LineTo(dvec2(0.0, 0.0)),
            BezPoint::MoveTo(dvec2(0.25, 0.25)),
            BezPoint::LineTo(dvec2(0.75, 0.25)),
            BezPoint::LineTo(dvec2(0.75, 0.75)),
            BezPoint::LineTo(dvec2(0.25, 0.75)),
            BezPoint::LineTo(dvec2(0.25, 0.25)),
        ]);
        assert!(distance_bez_shape_point(&shape, 0.0, dvec2(0.5, 0.5)) > 0.0);
        assert_eq!(distance_bez_shape_point(&shape, 0.0, dvec2(0.1, 0.5)), 0.0);
    }

    #[test]
    fn shape_distance_with_curves() {
        // a lens: two curves bulging away from the x axis
        let lens = vec![
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::CurveTo(dvec2(0.0, -2.0), dvec2(4.0, -2.0), dvec2(4.0, 0.0)),
            BezPoint::CurveTo(dvec2(4.0, 2.0), dvec2(0.0, 2.0), dvec2(0.0, 0.0)),
        ];
        assert_eq!(distance_bez_shape_point(&lens, 0.0, dvec2(2.0, 0.0)), 0.0);
        assert!(distance_bez_shape_point(&lens, 0.0, dvec2(2.0, 3.0)) > 1.0);
    }

    #[test]
    fn line_distance_ignores_interior() {
        let square = unit_square();
        let d = distance_bez_line_point(&square, 0.0, dvec2(0.5, 0.4));
        assert!((d - 0.4).abs() < EPSILON);
    }

    #[test]
    fn seg_distance_for_curve() {
        let seg = BezPoint::CurveTo(dvec2(0.0, 0.0), dvec2(10.0, 0.0), dvec2(10.0, 0.0));
        let d = distance_bez_seg_point(dvec2(0.0, 0.0), &seg, 0.0, dvec2(5.0, 1.0));
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn outline_area_sums_subpaths() {
        assert!((outline_area(&unit_square()) - 1.0).abs() < EPSILON);
        let mut two = unit_square();
        two.push(BezPoint::MoveTo(dvec2(5.0, 5.0)));
        two.push(BezPoint::LineTo(dvec2(7.0, 5.0)));
        two.push(BezPoint::LineTo(dvec2(7.0, 7.0)));
        two.push(BezPoint::LineTo(dvec2(5.0, 7.0)));
        assert!((outline_area(&two) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn clamped_acos_limits() {
        assert_eq!(clamped_acos(-2.0), std::f64::consts::PI);
        assert_eq!(clamped_acos(1.5), 0.0);
        assert!((clamped_acos(0.0) - std::f64::consts::FRAC_PI_2).abs() < EPSILON);
    }
}
