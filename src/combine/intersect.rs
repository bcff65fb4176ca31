//! Segment/segment crossings by recursive subdivision.

use super::segment::BezierSegment;
use crate::defaults::{DIAGONAL_EPSILON, EPSILON, MAX_CROSSINGS};

/// A crossing between segment `seg_one` of the first path and segment
/// `seg_two` of the second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Intersection {
    pub pt: crate::types::Point,
    /// 0..1 along the unsplit segment of the first path
    pub split_one: f64,
    /// 0..1 along the unsplit segment of the second path
    pub split_two: f64,
    pub seg_one: usize,
    pub seg_two: usize,
}

/// Collects crossings for one pair of original segments
struct Search<'a> {
    crossings: &'a mut Vec<Intersection>,
    seg_one: usize,
    seg_two: usize,
}

impl Search<'_> {
    /// Returns true if `a` and `b` cross somewhere.
    ///
    /// `asplit`/`bsplit` are the parameter midpoints of `a` and `b` on the
    /// original segments; `depth` counts halvings so far.
    fn bezier_bezier(
        &mut self,
        a: &BezierSegment,
        b: &BezierSegment,
        depth: i32,
        asplit: f64,
        bsplit: f64,
    ) -> bool {
        // both ends on the other segment: full overlap, not a crossing
        // TODO: partial overlaps still produce a run of crossings along the shared part
        if (a.has_point(b.p0) && a.has_point(b.p3)) || (b.has_point(a.p0) && b.has_point(a.p3)) {
            return false;
        }

        if self.crossings.len() >= MAX_CROSSINGS {
            return false;
        }

        let abox = a.bounding_box();
        let bbox = b.bounding_box();
        if !abox.intersects(&bbox) {
            return false;
        }

        let small_a = abox.width() < EPSILON && abox.height() < EPSILON;
        let small_b = bbox.width() < EPSILON && bbox.height() < EPSILON;
        if small_a && small_b {
            let pt = (abox.center() + bbox.center()) / 2.0;
            if self
                .crossings
                .iter()
                .any(|known| known.pt.distance(pt) < DIAGONAL_EPSILON)
            {
                // already recorded from a neighbouring sub-segment
                return true;
            }
            crate::log::debug!(depth, asplit, bsplit, x = pt.x, y = pt.y, "crossing found");
            self.crossings.push(Intersection {
                pt,
                split_one: asplit,
                split_two: bsplit,
                seg_one: self.seg_one,
                seg_two: self.seg_two,
            });
            return true;
        }

        let ofs = 0.5f64.powi(depth + 1);
        let (a1, a2) = a.split();
        let (b1, b2) = b.split();

        let mut found = false;
        found |= self.bezier_bezier(&a1, &b1, depth + 1, asplit - ofs, bsplit - ofs);
        found |= self.bezier_bezier(&a2, &b1, depth + 1, asplit + ofs, bsplit - ofs);
        found |= self.bezier_bezier(&a1, &b2, depth + 1, asplit - ofs, bsplit + ofs);
        found |= self.bezier_bezier(&a2, &b2, depth + 1, asplit + ofs, bsplit + ofs);
        found
    }
}

/// All crossings between the segments of `one` and `two`.
///
/// A segment may be crossed several times, so `seg_one`/`seg_two` are not
/// unique and the split positions refer to the whole original segment.
pub(crate) fn find_intersections(one: &[BezierSegment], two: &[BezierSegment]) -> Vec<Intersection> {
    let mut crossings = Vec::new();
    for (i, a) in one.iter().enumerate() {
        for (j, b) in two.iter().enumerate() {
            let mut search = Search {
                crossings: &mut crossings,
                seg_one: i,
                seg_two: j,
            };
            if search.bezier_bezier(a, b, 1, 0.5, 0.5) {
                crate::log::debug!(seg_one = i, seg_two = j, "segments cross");
            }
        }
    }
    if crossings.len() >= MAX_CROSSINGS {
        crate::log::warn!(limit = MAX_CROSSINGS, "crossing limit reached, result may be wrong");
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn perpendicular_lines_cross_once() {
        let a = [BezierSegment::line(dvec2(0.0, 1.0), dvec2(2.0, 1.0))];
        let b = [BezierSegment::line(dvec2(1.0, 0.0), dvec2(1.0, 2.0))];
        let crossings = find_intersections(&a, &b);
        assert_eq!(crossings.len(), 1);
        let c = crossings[0];
        assert!(c.pt.distance(dvec2(1.0, 1.0)) < 2.0 * EPSILON);
        assert_eq!((c.seg_one, c.seg_two), (0, 0));
        // the split refers to the cubic parameter, not arc length
        let (left, _) = a[0].split_at(c.split_one);
        assert!(left.p3.distance(dvec2(1.0, 1.0)) < 2.0 * EPSILON);
    }

    #[test]
    fn disjoint_segments_do_not_cross() {
        let a = [BezierSegment::line(dvec2(0.0, 0.0), dvec2(1.0, 0.0))];
        let b = [BezierSegment::line(dvec2(0.0, 1.0), dvec2(1.0, 1.0))];
        assert!(find_intersections(&a, &b).is_empty());
    }

    #[test]
    fn identical_segments_are_overlap_not_crossing() {
        let a = [BezierSegment::line(dvec2(0.0, 0.0), dvec2(3.0, 1.0))];
        assert!(find_intersections(&a, &a).is_empty());
    }

    #[test]
    fn curve_crosses_line_twice() {
        // an arch from (0,0) to (4,0) peaking at y = 3, cut by y = 1
        let arch = [BezierSegment {
            p0: dvec2(0.0, 0.0),
            p1: dvec2(0.0, 4.0),
            p2: dvec2(4.0, 4.0),
            p3: dvec2(4.0, 0.0),
        }];
        let cut = [BezierSegment::line(dvec2(-1.0, 1.0), dvec2(5.0, 1.0))];
        let crossings = find_intersections(&arch, &cut);
        assert_eq!(crossings.len(), 2);
        for c in &crossings {
            assert!((c.pt.y - 1.0).abs() < 2.0 * EPSILON);
        }
    }

    #[test]
    fn crossing_cap_bounds_the_search() {
        // many nearly-coincident wiggles against a straight line
        let mut a = Vec::new();
        for i in 0..200 {
            let x = i as f64 * 0.01;
            a.push(BezierSegment {
                p0: dvec2(x, -0.001),
                p1: dvec2(x + 0.003, 0.002),
                p2: dvec2(x + 0.006, -0.002),
                p3: dvec2(x + 0.01, -0.001),
            });
        }
        let b = [BezierSegment::line(dvec2(-1.0, 0.0), dvec2(3.0, 0.0))];
        let crossings = find_intersections(&a, &b);
        assert_eq!(crossings.len(), MAX_CROSSINGS);
    }
}
