//! Affine transformations on top of any renderer.

use glam::{DAffine2, dvec2};

use super::geometry::{path_build_arc, path_build_ellipse, rounded_rect_outline};
use super::{Capability, FillStyle, LineCaps, LineJoin, LineStyle, Renderer, TextOutline};
use crate::object::Drawable;
use crate::types::{BezPoint, Color, Point, Rectangle};

/// Forwards every call to `worker` after applying the current matrix.
///
/// Matrices nest: [`Renderer::draw_object`] with a matrix pushes it on top
/// of the current one for the duration of the call. Shapes that do not
/// survive a general affine map (arcs, ellipses, rounded rectangles) are
/// converted to beziers first.
pub struct TransformRenderer<'w> {
    worker: &'w mut dyn Renderer,
    matrices: Vec<DAffine2>,
}

impl<'w> TransformRenderer<'w> {
    pub fn new(worker: &'w mut dyn Renderer) -> Self {
        Self {
            worker,
            matrices: Vec::new(),
        }
    }

    /// Start with `matrix` already on the stack
    pub fn with_matrix(worker: &'w mut dyn Renderer, matrix: DAffine2) -> Self {
        Self {
            worker,
            matrices: vec![matrix],
        }
    }

    /// Combine `matrix` with the current one and make it current
    pub fn push(&mut self, matrix: DAffine2) {
        let combined = match self.matrices.last() {
            Some(current) => *current * matrix,
            None => matrix,
        };
        self.matrices.push(combined);
    }

    pub fn pop(&mut self) -> Option<DAffine2> {
        self.matrices.pop()
    }

    pub fn current(&self) -> Option<&DAffine2> {
        self.matrices.last()
    }

    fn point(&self, p: Point) -> Point {
        match self.current() {
            Some(m) => m.transform_point2(p),
            None => p,
        }
    }

    fn points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.point(p)).collect()
    }

    fn bez_points(&self, points: &[BezPoint]) -> Vec<BezPoint> {
        match self.current() {
            Some(m) => points.iter().map(|bp| bp.transform(m)).collect(),
            None => points.to_vec(),
        }
    }

    /// Length of `(len, 0)` under the linear part of the matrix
    fn length(&self, len: f64) -> f64 {
        match self.current() {
            Some(m) => m.transform_vector2(dvec2(len, 0.0)).length(),
            None => len,
        }
    }
}

impl Renderer for TransformRenderer<'_> {
    fn is_capable_to(&self, cap: Capability) -> bool {
        cap == Capability::Affine || self.worker.is_capable_to(cap)
    }

    fn set_linewidth(&mut self, width: f64) {
        let width = self.length(width);
        self.worker.set_linewidth(width);
    }

    fn set_linecaps(&mut self, caps: LineCaps) {
        self.worker.set_linecaps(caps);
    }

    fn set_linejoin(&mut self, join: LineJoin) {
        self.worker.set_linejoin(join);
    }

    fn set_linestyle(&mut self, style: LineStyle, dash_length: f64) {
        let dash_length = self.length(dash_length);
        self.worker.set_linestyle(style, dash_length);
    }

    fn set_fillstyle(&mut self, style: FillStyle) {
        self.worker.set_fillstyle(style);
    }

    fn draw_line(&mut self, start: Point, end: Point, color: Color) {
        let (start, end) = (self.point(start), self.point(end));
        self.worker.draw_line(start, end, color);
    }

    fn draw_polyline(&mut self, points: &[Point], color: Color) {
        let points = self.points(points);
        self.worker.draw_polyline(&points, color);
    }

    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<Color>) {
        let points = self.points(points);
        self.worker.draw_polygon(&points, fill, stroke);
    }

    fn draw_rect(&mut self, ul: Point, lr: Point, fill: Option<Color>, stroke: Option<Color>) {
        if self.current().is_none() {
            self.worker.draw_rect(ul, lr, fill, stroke);
            return;
        }
        // a rotated rectangle is no longer axis aligned
        let corners = self.points(&[ul, dvec2(lr.x, ul.y), lr, dvec2(ul.x, lr.y)]);
        self.worker.draw_polygon(&corners, fill, stroke);
    }

    fn draw_rounded_rect(
        &mut self,
        ul: Point,
        lr: Point,
        fill: Option<Color>,
        stroke: Option<Color>,
        radius: f64,
    ) {
        let outline = self.bez_points(&rounded_rect_outline(ul, lr, radius));
        self.worker.draw_beziergon(&outline, fill, stroke);
    }

    fn draw_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color) {
        let mut path = Vec::new();
        path_build_arc(&mut path, center, width, height, angle1, angle2, false);
        let path = self.bez_points(&path);
        self.worker.draw_bezier(&path, color);
    }

    fn fill_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color) {
        let mut path = Vec::new();
        path_build_arc(&mut path, center, width, height, angle1, angle2, true);
        let path = self.bez_points(&path);
        self.worker.draw_beziergon(&path, Some(color), None);
    }

    fn draw_ellipse(&mut self, center: Point, width: f64, height: f64, fill: Option<Color>, stroke: Option<Color>) {
        let mut path = Vec::new();
        path_build_ellipse(&mut path, center, width, height);
        let path = self.bez_points(&path);
        self.worker.draw_beziergon(&path, fill, stroke);
    }

    fn draw_bezier(&mut self, points: &[BezPoint], color: Color) {
        let points = self.bez_points(points);
        self.worker.draw_bezier(&points, color);
    }

    fn draw_beziergon(&mut self, points: &[BezPoint], fill: Option<Color>, stroke: Option<Color>) {
        let points = self.bez_points(points);
        self.worker.draw_beziergon(&points, fill, stroke);
    }

    fn draw_text(&mut self, text: &dyn TextOutline) {
        match self.current().copied() {
            Some(matrix) => self.worker.draw_text(&TransformedText { text, matrix }),
            None => self.worker.draw_text(text),
        }
    }

    fn draw_image(&mut self, point: Point, width: f64, height: f64) {
        // only the placement moves, the image keeps its size
        let half = dvec2(width, height) / 2.0;
        let center = self.point(point + half);
        self.worker.draw_image(center - half, width, height);
    }

    fn draw_object(&mut self, object: &dyn Drawable, matrix: Option<&DAffine2>) {
        if let Some(m) = matrix {
            self.push(*m);
        }
        object.draw(self);
        if matrix.is_some() {
            self.pop();
        }
    }
}

/// Text whose outline and layout box come back transformed
struct TransformedText<'t> {
    text: &'t dyn TextOutline,
    matrix: DAffine2,
}

impl TextOutline for TransformedText<'_> {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn color(&self) -> Color {
        self.text.color()
    }

    fn outline(&self, path: &mut Vec<BezPoint>) -> bool {
        let n0 = path.len();
        if !self.text.outline(path) {
            return false;
        }
        for bp in &mut path[n0..] {
            *bp = bp.transform(&self.matrix);
        }
        true
    }

    fn bounding_box(&self) -> Rectangle {
        let bb = self.text.bounding_box();
        if bb.is_empty() {
            return bb;
        }
        let corners = [
            dvec2(bb.left, bb.top),
            dvec2(bb.right, bb.top),
            dvec2(bb.right, bb.bottom),
            dvec2(bb.left, bb.bottom),
        ];
        corners.iter().fold(Rectangle::EMPTY, |mut acc, &p| {
            acc.add_point(self.matrix.transform_point2(p));
            acc
        })
    }
}
