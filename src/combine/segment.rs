//! Uniform cubic segments used by the combination code.
//!
//! Every path edge becomes four points. A line keeps its end point in all
//! three trailing slots, a move-to collapses all four onto its target.

use crate::bbox::{PolyBBExtras, bicubicbezier_bbox};
use crate::defaults::EPSILON;
use crate::geometry::distance_bez_seg_point;
use crate::types::{BezPoint, Point, Rectangle};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BezierSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl BezierSegment {
    pub fn move_to(p: Point) -> Self {
        Self {
            p0: p,
            p1: p,
            p2: p,
            p3: p,
        }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self {
            p0: from,
            p1: to,
            p2: to,
            p3: to,
        }
    }

    /// All four points identical
    pub fn is_move_to(&self) -> bool {
        self.p0 == self.p1 && self.p0 == self.p2 && self.p0 == self.p3
    }

    /// Straight: the three trailing points coincide and differ from the start
    pub fn is_line_to(&self) -> bool {
        self.p0 != self.p1 && self.p1 == self.p2 && self.p1 == self.p3
    }

    /// De Casteljau split at the parameter midpoint
    pub fn split(&self) -> (Self, Self) {
        let l2 = (self.p0 + self.p1) / 2.0;
        let h = (self.p1 + self.p2) / 2.0;
        let r3 = (self.p2 + self.p3) / 2.0;
        let l3 = (l2 + h) / 2.0;
        let r2 = (h + r3) / 2.0;
        let l4 = (l3 + r2) / 2.0;
        (
            Self {
                p0: self.p0,
                p1: l2,
                p2: l3,
                p3: l4,
            },
            Self {
                p0: l4,
                p1: r2,
                p2: r3,
                p3: self.p3,
            },
        )
    }

    /// De Casteljau split at parameter `t`
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let lerp = |a: Point, b: Point| a * (1.0 - t) + b * t;
        let l2 = lerp(self.p0, self.p1);
        let h = lerp(self.p1, self.p2);
        let r3 = lerp(self.p2, self.p3);
        let l3 = lerp(l2, h);
        let r2 = lerp(h, r3);
        let l4 = lerp(l3, r2);
        (
            Self {
                p0: self.p0,
                p1: l2,
                p2: l3,
                p3: l4,
            },
            Self {
                p0: l4,
                p1: r2,
                p2: r3,
                p3: self.p3,
            },
        )
    }

    /// Length of the control polygon, an upper bound on the arc length
    pub fn hull_length(&self) -> f64 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Tight box, no stroke
    pub fn bounding_box(&self) -> Rectangle {
        bicubicbezier_bbox(self.p0, self.p1, self.p2, self.p3, &PolyBBExtras::default())
    }

    /// True if `pt` lies on the (flattened) segment
    pub fn has_point(&self, pt: Point) -> bool {
        let bp = BezPoint::CurveTo(self.p1, self.p2, self.p3);
        distance_bez_seg_point(self.p0, &bp, 0.0, pt) <= 0.0
    }

    /// Convert back to a path element, optionally walking it backwards.
    ///
    /// A reversed straight segment (or move) lands on `p0`.
    pub fn to_bez_point(&self, flip: bool) -> BezPoint {
        if self.is_move_to() {
            BezPoint::MoveTo(if flip { self.p0 } else { self.p1 })
        } else if self.is_line_to() {
            BezPoint::LineTo(if flip { self.p0 } else { self.p1 })
        } else if flip {
            BezPoint::CurveTo(self.p2, self.p1, self.p0)
        } else {
            BezPoint::CurveTo(self.p1, self.p2, self.p3)
        }
    }

    /// Same control points within `EPSILON`
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.p0.distance(other.p0) < EPSILON
            && self.p1.distance(other.p1) < EPSILON
            && self.p2.distance(other.p2) < EPSILON
            && self.p3.distance(other.p3) < EPSILON
    }
}

/// Segment for element `i`, starting where element `i - 1` ends.
///
/// Lines shorter than `EPSILON` are dropped so they are not mistaken for
/// moves.
fn segment_from_path(path: &[BezPoint], i: usize) -> Option<BezierSegment> {
    let p0 = path[i - 1].end_point();
    match path[i] {
        BezPoint::CurveTo(p1, p2, p3) => Some(BezierSegment { p0, p1, p2, p3 }),
        BezPoint::LineTo(p) => {
            if p0.distance(p) < EPSILON {
                None
            } else {
                Some(BezierSegment::line(p0, p))
            }
        }
        BezPoint::MoveTo(p) => Some(BezierSegment::move_to(p)),
    }
}

/// Break a path into segments, closing the last sub-path.
///
/// A last point within `EPSILON` of the sub-path start is snapped onto it;
/// otherwise an explicit closing line is appended.
pub(crate) fn path_to_segments(path: &[BezPoint]) -> Vec<BezierSegment> {
    let mut segs: Vec<BezierSegment> = Vec::with_capacity(path.len());
    let Some(first) = path.first() else {
        return segs;
    };
    let mut last_move = first.p1();

    for i in 1..path.len() {
        if let BezPoint::MoveTo(p) = path[i] {
            last_move = p;
        }
        if let Some(seg) = segment_from_path(path, i) {
            segs.push(seg);
        }
    }

    let Some(last) = segs.last_mut() else {
        return segs;
    };
    if last.p3.distance(last_move) < EPSILON {
        if last.is_line_to() {
            last.p1 = last_move;
            last.p2 = last_move;
        }
        last.p3 = last_move;
    } else {
        let closing = BezierSegment::line(last.p3, last_move);
        segs.push(closing);
    }
    segs
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-12,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn split_at_half_matches_split() {
        let seg = BezierSegment {
            p0: dvec2(0.0, 0.0),
            p1: dvec2(1.0, 3.0),
            p2: dvec2(4.0, 3.0),
            p3: dvec2(5.0, 0.0),
        };
        let (a1, a2) = seg.split();
        let (b1, b2) = seg.split_at(0.5);
        assert_point_eq(a1.p3, b1.p3);
        assert_point_eq(a1.p2, b1.p2);
        assert_point_eq(a2.p1, b2.p1);
        assert_point_eq(a1.p3, dvec2(2.5, 2.25));
    }

    #[test]
    fn split_line_stays_on_line() {
        let seg = BezierSegment::line(dvec2(0.0, 0.0), dvec2(4.0, 0.0));
        let (left, right) = seg.split_at(0.3);
        for p in [left.p1, left.p2, left.p3, right.p1, right.p2] {
            assert_eq!(p.y, 0.0);
        }
        assert_eq!(left.p3, right.p0);
    }

    #[test]
    fn kinds_round_trip() {
        let line = BezierSegment::line(dvec2(0.0, 0.0), dvec2(1.0, 0.0));
        assert!(line.is_line_to() && !line.is_move_to());
        assert_eq!(line.to_bez_point(false), BezPoint::LineTo(dvec2(1.0, 0.0)));
        assert_eq!(line.to_bez_point(true), BezPoint::LineTo(dvec2(0.0, 0.0)));

        let mv = BezierSegment::move_to(dvec2(2.0, 2.0));
        assert!(mv.is_move_to() && !mv.is_line_to());
        assert_eq!(mv.to_bez_point(false), BezPoint::MoveTo(dvec2(2.0, 2.0)));

        let curve = BezierSegment {
            p0: dvec2(0.0, 0.0),
            p1: dvec2(0.0, 1.0),
            p2: dvec2(1.0, 1.0),
            p3: dvec2(1.0, 0.0),
        };
        assert_eq!(
            curve.to_bez_point(true),
            BezPoint::CurveTo(dvec2(1.0, 1.0), dvec2(0.0, 1.0), dvec2(0.0, 0.0))
        );
    }

    #[test]
    fn open_path_gets_closing_segment() {
        let path = [
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 1.0)),
        ];
        let segs = path_to_segments(&path);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2], BezierSegment::line(dvec2(1.0, 1.0), dvec2(0.0, 0.0)));
    }

    #[test]
    fn nearly_closed_path_is_snapped() {
        let path = [
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 1.0)),
            BezPoint::LineTo(dvec2(0.00001, 0.0)),
        ];
        let segs = path_to_segments(&path);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[2], BezierSegment::line(dvec2(1.0, 1.0), dvec2(0.0, 0.0)));
    }

    #[test]
    fn zero_length_lines_are_skipped() {
        let path = [
            BezPoint::MoveTo(dvec2(0.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 0.0)),
            BezPoint::LineTo(dvec2(1.0, 0.0)),
            BezPoint::LineTo(dvec2(0.0, 1.0)),
            BezPoint::LineTo(dvec2(0.0, 0.0)),
        ];
        assert_eq!(path_to_segments(&path).len(), 3);
    }

    #[test]
    fn has_point_on_curve() {
        let seg = BezierSegment::line(dvec2(0.0, 0.0), dvec2(2.0, 2.0));
        assert!(seg.has_point(dvec2(0.0, 0.0)));
        assert!(seg.has_point(dvec2(2.0, 2.0)));
        assert!(!seg.has_point(dvec2(2.0, 0.0)));
    }
}
