//! Core value types: points, rectangles, path elements and colors.

use std::fmt;
use std::ops::Deref;

use glam::DAffine2;

use crate::bbox::{PolyBBExtras, polybezier_bbox};
use crate::errors::PathError;

/// A 2D coordinate. Screen space, y grows downwards.
pub type Point = glam::DVec2;

/// Axis-aligned box with `left <= right` and `top <= bottom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rectangle {
    /// Inverted box that any `add_point` or `union` replaces.
    pub const EMPTY: Rectangle = Rectangle {
        left: f64::INFINITY,
        top: f64::INFINITY,
        right: f64::NEG_INFINITY,
        bottom: f64::NEG_INFINITY,
    };

    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box spanning two corners given in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Zero-sized box at a point
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// True for the inverted sentinel (nothing added yet)
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// Grow to include a point
    pub fn add_point(&mut self, p: Point) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.top = self.top.min(p.y);
        self.bottom = self.bottom.max(p.y);
    }

    /// Grow to include another rectangle
    pub fn union_with(&mut self, other: &Rectangle) {
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }

    pub fn union(mut self, other: &Rectangle) -> Rectangle {
        self.union_with(other);
        self
    }

    /// Overlap test; boxes that only touch count as intersecting.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.top > other.bottom
            || self.bottom < other.top)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// True if `other` lies completely inside this box
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Grow every side by `border` (shrinks for negative values)
    pub fn inflate(mut self, border: f64) -> Rectangle {
        self.left -= border;
        self.top -= border;
        self.right += border;
        self.bottom += border;
        self
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }
}

/// Discriminant of a [`BezPoint`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BezPointKind {
    MoveTo,
    LineTo,
    CurveTo,
}

impl BezPointKind {
    pub fn name(self) -> &'static str {
        match self {
            BezPointKind::MoveTo => "move-to",
            BezPointKind::LineTo => "line-to",
            BezPointKind::CurveTo => "curve-to",
        }
    }
}

/// One path element.
///
/// Move and line carry their destination only. A curve carries two control
/// points followed by its end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BezPoint {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
}

impl BezPoint {
    pub fn kind(&self) -> BezPointKind {
        match self {
            BezPoint::MoveTo(_) => BezPointKind::MoveTo,
            BezPoint::LineTo(_) => BezPointKind::LineTo,
            BezPoint::CurveTo(..) => BezPointKind::CurveTo,
        }
    }

    /// Where the pen is after this element
    pub fn end_point(&self) -> Point {
        match *self {
            BezPoint::MoveTo(p) | BezPoint::LineTo(p) => p,
            BezPoint::CurveTo(_, _, p3) => p3,
        }
    }

    /// The primary point: destination for move/line, first control for curves
    pub fn p1(&self) -> Point {
        match *self {
            BezPoint::MoveTo(p) | BezPoint::LineTo(p) => p,
            BezPoint::CurveTo(p1, _, _) => p1,
        }
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            BezPoint::MoveTo(p) | BezPoint::LineTo(p) => p.is_finite(),
            BezPoint::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
        }
    }

    pub fn is_move_to(&self) -> bool {
        matches!(self, BezPoint::MoveTo(_))
    }

    /// Apply `f` to every point of the element
    pub fn map(self, mut f: impl FnMut(Point) -> Point) -> BezPoint {
        match self {
            BezPoint::MoveTo(p) => BezPoint::MoveTo(f(p)),
            BezPoint::LineTo(p) => BezPoint::LineTo(f(p)),
            BezPoint::CurveTo(p1, p2, p3) => BezPoint::CurveTo(f(p1), f(p2), f(p3)),
        }
    }

    pub fn transform(self, m: &DAffine2) -> BezPoint {
        self.map(|p| m.transform_point2(p))
    }
}

/// Check a point sequence starts with a move-to and has finite coordinates
pub fn validate_points(points: &[BezPoint]) -> Result<(), PathError> {
    let first = points.first().ok_or(PathError::Empty)?;
    if !first.is_move_to() {
        return Err(PathError::MissingMoveTo {
            found: first.kind().name(),
        });
    }
    for (index, bp) in points.iter().enumerate() {
        if !bp.is_finite() {
            return Err(PathError::NonFinite { index });
        }
    }
    Ok(())
}

/// An owned, ordered sequence of [`BezPoint`]s.
///
/// A well-formed path starts with a move-to. Further move-tos start
/// sub-paths, which only consumers with hole support can represent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BezPath {
    points: Vec<BezPoint>,
}

impl BezPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Closed polygon through `corners` (move-to, line-tos, and a closing line-to)
    pub fn polygon(corners: &[Point]) -> Self {
        let mut path = Self::with_capacity(corners.len() + 1);
        if let Some((&first, rest)) = corners.split_first() {
            path.push(BezPoint::MoveTo(first));
            path.extend(rest.iter().map(|&p| BezPoint::LineTo(p)));
            path.push(BezPoint::LineTo(first));
        }
        path
    }

    pub fn push(&mut self, bp: BezPoint) {
        self.points.push(bp);
    }

    pub fn as_slice(&self) -> &[BezPoint] {
        &self.points
    }

    pub fn into_vec(self) -> Vec<BezPoint> {
        self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<BezPoint> {
        &mut self.points
    }

    /// Check the path is usable as an outline
    pub fn validate(&self) -> Result<(), PathError> {
        validate_points(&self.points)
    }

    /// Same outline, opposite travel direction.
    ///
    /// Sub-path boundaries are kept: each element takes the type of its
    /// mirror and ends where the mirror started.
    pub fn invert(&self) -> BezPath {
        let n = self.points.len();
        let Some(last) = self.points.last() else {
            return BezPath::new();
        };
        let mut inverted = Vec::with_capacity(n);
        inverted.push(BezPoint::MoveTo(last.end_point()));
        for i in 1..n {
            let start = self.points[n - i - 1].end_point();
            inverted.push(match self.points[n - i] {
                BezPoint::MoveTo(_) => BezPoint::MoveTo(start),
                BezPoint::LineTo(_) => BezPoint::LineTo(start),
                BezPoint::CurveTo(p1, p2, _) => BezPoint::CurveTo(p2, p1, start),
            });
        }
        BezPath { points: inverted }
    }

    pub fn transform(&mut self, m: &DAffine2) {
        for bp in &mut self.points {
            *bp = bp.transform(m);
        }
    }

    /// Split at every move-to into single-contour paths
    pub fn subpaths(&self) -> Vec<BezPath> {
        let mut out: Vec<BezPath> = Vec::new();
        for bp in &self.points {
            match out.last_mut() {
                Some(current) if !bp.is_move_to() => current.push(*bp),
                _ => out.push(BezPath { points: vec![*bp] }),
            }
        }
        out
    }

    pub fn subpath_count(&self) -> usize {
        self.points.iter().filter(|bp| bp.is_move_to()).count()
    }

    pub fn bounding_box(&self, extra: &PolyBBExtras, closed: bool) -> Rectangle {
        polybezier_bbox(&self.points, extra, closed)
    }
}

impl Deref for BezPath {
    type Target = [BezPoint];

    fn deref(&self) -> &[BezPoint] {
        &self.points
    }
}

impl From<Vec<BezPoint>> for BezPath {
    fn from(points: Vec<BezPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<BezPoint> for BezPath {
    fn from_iter<I: IntoIterator<Item = BezPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<BezPoint> for BezPath {
    fn extend<I: IntoIterator<Item = BezPoint>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = &'a BezPoint;
    type IntoIter = std::slice::Iter<'a, BezPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Formats as SVG path data with absolute commands
impl fmt::Display for BezPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bp) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match *bp {
                BezPoint::MoveTo(p) => write!(f, "M {} {}", Num(p.x), Num(p.y))?,
                BezPoint::LineTo(p) => write!(f, "L {} {}", Num(p.x), Num(p.y))?,
                BezPoint::CurveTo(p1, p2, p3) => write!(
                    f,
                    "C {} {} {} {} {} {}",
                    Num(p1.x),
                    Num(p1.y),
                    Num(p2.x),
                    Num(p2.y),
                    Num(p3.x),
                    Num(p3.y)
                )?,
            }
        }
        Ok(())
    }
}

/// Coordinate rounded to 4 decimals, without trailing zeros or `-0`
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 10000.0).round() / 10000.0;
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        write!(f, "{}", rounded)
    }
}

/// RGBA color, components in 0..=1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// `#rrggbb` form, alpha dropped
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", c(self.red), c(self.green), c(self.blue))
    }
}
