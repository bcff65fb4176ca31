//! Turning classified runs back into a BezPoint path.

use super::segment::BezierSegment;
use super::split::{Side, Split};
use super::PathCombineMode;
use crate::defaults::{DIAGONAL_EPSILON, EPSILON};
use crate::types::{BezPoint, Point};

/// Append `segs` to `path`, joining at whichever end touches the current
/// pen position. Returns the new pen position.
///
/// When neither end touches, a move-to starts a new sub-path.
pub(crate) fn append_segments(path: &mut Vec<BezPoint>, segs: &[BezierSegment]) -> Point {
    let (Some(first), Some(last)) = (segs.first(), segs.last()) else {
        return path.last().map(BezPoint::end_point).unwrap_or_default();
    };
    let pen = path.last().map(BezPoint::end_point);

    let flip = match pen {
        Some(pen) if first.p0.distance(pen) < EPSILON => false,
        Some(pen) if last.p3.distance(pen) < EPSILON => true,
        _ => {
            path.push(BezPoint::MoveTo(first.p0));
            false
        }
    };

    let converted = segs.iter().map(|seg| seg.to_bez_point(flip));
    let elements: Vec<BezPoint> = if flip {
        converted.rev().filter(|bp| !bp.is_move_to()).collect()
    } else {
        converted.filter(|bp| !bp.is_move_to()).collect()
    };
    path.extend(elements);

    path.last().map(BezPoint::end_point).unwrap_or(first.p0)
}

/// Both segment lists back to back, each starting with a move-to.
///
/// With splits given, every run additionally starts a new sub-path.
pub(crate) fn make_path0(
    one: &[BezierSegment],
    one_splits: Option<&[Split]>,
    two: &[BezierSegment],
    two_splits: Option<&[Split]>,
) -> Vec<BezPoint> {
    let mut result = Vec::with_capacity(one.len() + two.len() + 2);
    for (segs, splits) in [(one, one_splits), (two, two_splits)] {
        let Some(first) = segs.first() else {
            continue;
        };
        result.push(BezPoint::MoveTo(first.p0));
        let mut isp = 0;
        for (i, seg) in segs.iter().enumerate() {
            if let Some(splits) = splits {
                let at_split = splits.get(isp).is_some_and(|sp| sp.seg == i);
                let after_move = result.last().is_some_and(BezPoint::is_move_to);
                if at_split && !after_move {
                    result.push(BezPoint::MoveTo(seg.p0));
                    isp += 1;
                }
            }
            result.push(seg.to_bez_point(false));
        }
    }
    result
}

/// Next unused run with the wanted classification that starts at `pt`,
/// or failing that, ends at `pt`. Marks it used.
pub(crate) fn find_split(splits: &mut [Split], pt: Point, outside: bool) -> Option<usize> {
    let eligible = |sp: &Split| !sp.used && sp.outside == outside;
    let found = splits
        .iter()
        .position(|sp| eligible(sp) && sp.start().is_some_and(|p| p.distance(pt) < DIAGONAL_EPSILON))
        .or_else(|| {
            splits
                .iter()
                .position(|sp| eligible(sp) && sp.end().is_some_and(|p| p.distance(pt) < DIAGONAL_EPSILON))
        })?;
    splits[found].used = true;
    Some(found)
}

fn first_unused(splits: &[Split], outside: bool) -> Option<usize> {
    splits
        .iter()
        .position(|sp| !sp.used && sp.outside == outside && !sp.path.is_empty())
}

/// Walk the runs of both paths into a single outline for `mode`.
///
/// Starts with a run of `one` (an inside run for intersection, outside
/// otherwise), then alternates between the paths, following whichever run
/// connects to the pen. Difference flips the wanted classification on
/// every hop. When nothing connects, an unused run of `one` starts a new
/// sub-path. Exclusion is composed by the caller.
pub(crate) fn make_path(
    one: &[BezierSegment],
    one_splits: &mut [Split],
    two_splits: &mut [Split],
    mode: PathCombineMode,
) -> Option<Vec<BezPoint>> {
    debug_assert!(mode != PathCombineMode::Exclusion);
    let initial_outside = mode != PathCombineMode::Intersection;
    let mut outside = initial_outside;

    let start = first_unused(one_splits, outside)?;
    one_splits[start].used = true;
    let mut result = vec![BezPoint::MoveTo(one.get(one_splits[start].seg)?.p0)];

    let mut current = (Side::One, start);
    let mut hops = 0usize;
    loop {
        let run = match current.0 {
            Side::One => &one_splits[current.1].path,
            Side::Two => &two_splits[current.1].path,
        };
        let pen = append_segments(&mut result, run);
        hops += 1;
        if mode == PathCombineMode::Difference {
            outside = hops % 2 == 0;
        }

        let side = if hops % 2 == 0 { Side::One } else { Side::Two };
        let splits = match side {
            Side::One => &mut *one_splits,
            Side::Two => &mut *two_splits,
        };
        if let Some(next) = find_split(splits, pen, outside) {
            current = (side, next);
            continue;
        }

        outside = initial_outside;
        match first_unused(one_splits, outside) {
            Some(next) => {
                one_splits[next].used = true;
                if let Some(p) = one_splits[next].start() {
                    result.push(BezPoint::MoveTo(p));
                }
                current = (Side::One, next);
            }
            None => break,
        }
    }

    Some(result)
}
