//! Cutting segment lists at crossings and classifying the runs in between.

use super::intersect::Intersection;
use super::segment::BezierSegment;
use crate::geometry::distance_bez_shape_point;
use crate::types::{BezPoint, Point};

/// Which input path a set of splits belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    One,
    Two,
}

/// A cut in one path, and the run of segments that starts there.
#[derive(Clone, Debug)]
pub(crate) struct Split {
    /// Segment index; unique once `split_segments` has run
    pub seg: usize,
    /// 0..1 along the original segment
    pub split: f64,
    /// Consumed during reassembly
    pub used: bool,
    /// The run lies outside the other path
    pub outside: bool,
    /// Segments up to the next split
    pub path: Vec<BezierSegment>,
}

impl Split {
    pub fn start(&self) -> Option<Point> {
        self.path.first().map(|s| s.p0)
    }

    pub fn end(&self) -> Option<Point> {
        self.path.last().map(|s| s.p3)
    }
}

/// The splits one side of the crossings implies
pub(crate) fn extract_splits(crossings: &[Intersection], side: Side) -> Vec<Split> {
    crossings
        .iter()
        .map(|is| {
            let (seg, split) = match side {
                Side::One => (is.seg_one, is.split_one),
                Side::Two => (is.seg_two, is.split_two),
            };
            Split {
                seg,
                split,
                used: false,
                outside: false,
                path: Vec::new(),
            }
        })
        .collect()
}

/// Apply every split to `segs`, then fill in each split's run and whether
/// that run lies outside `other`.
///
/// Runs wrap around the end of the segment list. A move-to inside a run
/// ends it early; the remainder is carried over to the run that wraps.
pub(crate) fn split_segments(segs: &mut Vec<BezierSegment>, splits: &mut [Split], other: &[BezPoint]) {
    if splits.is_empty() {
        return;
    }
    splits.sort_by(|a, b| a.seg.cmp(&b.seg).then(a.split.total_cmp(&b.split)));

    // every split inserts one segment, shifting the ones behind it
    let mut sofs = 0;
    let mut i = 0;
    while i < splits.len() {
        let from = i;
        let from_seg = splits[i].seg;
        while i + 1 < splits.len() && splits[i + 1].seg == from_seg {
            i += 1;
        }
        let Some(&original) = segs.get(from_seg + sofs) else {
            debug_assert!(false, "split references segment {} out of range", from_seg);
            return;
        };

        let mut rest = original;
        let mut t = 0.0;
        for split in &mut splits[from..=i] {
            // rescale to the part that is left of the segment
            let t_left = split.split;
            let t_right = (t_left - t) / (1.0 - t);
            let (left, right) = rest.split_at(t_right);
            rest = right;
            t = t_left;

            segs[from_seg + sofs] = left;
            sofs += 1;
            segs.insert(from_seg + sofs, right);
            split.seg = from_seg + sofs;
        }
        i += 1;
    }

    let mut pending: Vec<BezierSegment> = Vec::new();
    let count = splits.len();
    for i in 0..count {
        let seg = splits[i].seg;
        if i == 0 && seg > 0 {
            pending.extend_from_slice(&segs[..seg]);
        }

        let to = splits[(i + 1) % count].seg;
        let mut path = Vec::new();
        if to < seg {
            path.extend_from_slice(&segs[seg..]);
            path.append(&mut pending);
        } else {
            let mut j = seg;
            while j < to {
                if segs[j].is_move_to() {
                    path.append(&mut pending);
                    break;
                }
                path.push(segs[j]);
                j += 1;
            }
            pending.extend_from_slice(&segs[j..to]);
        }
        splits[i].outside = run_is_outside(&path, segs[seg], other);
        splits[i].path = path;
    }
}

/// Test a run against `other` at the middle of its longest segment.
///
/// A crossing close to a vertex leaves a sliver segment that lies on the
/// other outline, so the first segment is only used for empty runs.
fn run_is_outside(run: &[BezierSegment], first: BezierSegment, other: &[BezPoint]) -> bool {
    let sample = run
        .iter()
        .filter(|s| !s.is_move_to())
        .max_by(|a, b| a.hull_length().total_cmp(&b.hull_length()))
        .copied()
        .unwrap_or(first);
    let (_, right) = sample.split();
    distance_bez_shape_point(other, 0.0, right.p0) > 0.0
}
