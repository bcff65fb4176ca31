//! A renderer that records geometry instead of painting it.
//!
//! Every draw call appends to the current path. A new path starts when
//! the stroke or fill color changes, or when drawing switches between
//! stroking and filling. Connected calls are stitched into one contour.

use glam::{DAffine2, dvec2};

use super::geometry::{path_append, path_build_arc, path_build_ellipse};
use super::transform_renderer::TransformRenderer;
use super::{
    Capability, FillStyle, LineCaps, LineJoin, LineStyle, Renderer, TextOutline, walk_rounded_rect,
};
use crate::bbox::{PolyBBExtras, polybezier_bbox};
use crate::defaults::{DEGENERATE_EPSILON, STITCH_EPSILON};
use crate::object::{Drawable, PathShape};
use crate::types::{BezPath, BezPoint, Color, Point, Rectangle};

/// Placeholder colors for images, which have no outline
const IMAGE_STROKE: Color = Color::rgba(1.0, 0.0, 0.0, 0.75);
const IMAGE_FILL: Color = Color::rgba(1.0, 1.0, 0.0, 0.5);

/// Starting state of a [`PathRenderer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathRendererOptions {
    /// Initial stroke color
    pub foreground: Color,
    /// Initial fill color
    pub background: Color,
}

impl Default for PathRendererOptions {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Stroke,
    Fill,
    StrokeAndFill,
}

impl Operation {
    fn of(stroke: Option<Color>, fill: Option<Color>) -> Self {
        match (stroke.is_some(), fill.is_some()) {
            (true, true) => Operation::StrokeAndFill,
            (false, true) => Operation::Fill,
            _ => Operation::Stroke,
        }
    }
}

/// Turns draw calls into a list of paths
#[derive(Clone, Debug)]
pub struct PathRenderer {
    paths: Vec<BezPath>,
    stroke: Color,
    fill: Color,
    last_op: Option<Operation>,
    /// The last call started a stroke path straight after a fill
    stroke_after_fill: bool,
}

impl Default for PathRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRenderer {
    pub fn new() -> Self {
        Self::with_options(PathRendererOptions::default())
    }

    pub fn with_options(options: PathRendererOptions) -> Self {
        Self {
            paths: Vec::new(),
            stroke: options.foreground,
            fill: options.background,
            last_op: None,
            stroke_after_fill: false,
        }
    }

    /// Everything recorded so far, in drawing order
    pub fn paths(&self) -> &[BezPath] {
        &self.paths
    }

    pub fn into_paths(self) -> Vec<BezPath> {
        self.paths
    }

    /// The recorded geometry as one shape.
    ///
    /// Paths with fewer than two points are dropped. Returns `None` when
    /// nothing is left.
    pub fn into_shape(self) -> Option<PathShape> {
        let mut usable: Vec<BezPath> = self.paths.into_iter().filter(|p| p.len() >= 2).collect();
        match usable.len() {
            0 => None,
            1 => usable.pop().map(PathShape::Single),
            _ => Some(PathShape::Group(usable)),
        }
    }

    /// The path to append to for a call with these colors
    fn current_path(&mut self, stroke: Option<Color>, fill: Option<Color>) -> &mut Vec<BezPoint> {
        let mut new_path = false;
        if let Some(stroke) = stroke
            && stroke != self.stroke
        {
            self.stroke = stroke;
            new_path = true;
        }
        if let Some(fill) = fill
            && fill != self.fill
        {
            self.fill = fill;
            new_path = true;
        }
        let op = Operation::of(stroke, fill);
        let previous = self.last_op.replace(op);
        if previous.is_some_and(|last| last != op) {
            new_path = true;
        }

        let start = new_path || self.paths.is_empty();
        self.stroke_after_fill = start && op == Operation::Stroke && previous == Some(Operation::Fill);
        if start {
            crate::log::debug!(index = self.paths.len(), ?op, "starting path");
            self.paths.push(BezPath::new());
        }
        let last = self.paths.len() - 1;
        self.paths[last].points_mut()
    }

    /// Drop the last path if it repeats the one before.
    ///
    /// Only a stroke path started right after a fill is compared. A fill
    /// and a stroke of one outline record it twice, whether they come from
    /// one call or from two.
    fn remove_duplicated_path(&mut self) {
        if !self.stroke_after_fill {
            return;
        }
        let n = self.paths.len();
        if n >= 2 && self.paths[n - 1] == self.paths[n - 2] {
            crate::log::debug!(index = n - 1, "dropping duplicated path");
            self.paths.pop();
        }
    }

    fn polyline(&mut self, points: &[Point], stroke: Option<Color>, fill: Option<Color>, closed: bool) {
        debug_assert!(points.len() > 1, "polyline needs at least two points");
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let path = self.current_path(stroke, fill);
        if stroke.is_some() {
            path_append(path, first);
        } else {
            path.push(BezPoint::MoveTo(first));
        }
        path.extend(rest.iter().map(|&p| BezPoint::LineTo(p)));
        if closed {
            path.push(BezPoint::LineTo(first));
        }
    }

    fn rect(&mut self, ul: Point, lr: Point, stroke: Option<Color>, fill: Option<Color>) {
        let path = self.current_path(stroke, fill);
        path.push(BezPoint::MoveTo(ul));
        // clockwise from the top-right corner
        path.push(BezPoint::LineTo(dvec2(lr.x, ul.y)));
        path.push(BezPoint::LineTo(lr));
        path.push(BezPoint::LineTo(dvec2(ul.x, lr.y)));
        path.push(BezPoint::LineTo(ul));
    }

    fn bezier(&mut self, points: &[BezPoint], stroke: Option<Color>, fill: Option<Color>, closed: bool) {
        let Some(first) = points.first() else {
            return;
        };
        let start = first.p1();
        let path = self.current_path(stroke, fill);

        // the leading move-to is redundant when we continue from its target
        let attached = path
            .last()
            .is_some_and(|last| last.end_point().distance(start) < STITCH_EPSILON);
        let skip = usize::from(attached && first.is_move_to());
        path.extend_from_slice(&points[skip..]);

        if closed {
            let end = path.last().map(BezPoint::end_point).unwrap_or(start);
            if end.distance(start) >= STITCH_EPSILON {
                path.push(BezPoint::LineTo(start));
            }
        }
    }

    /// Run `draw` for the fill, then for the stroke, dropping the stroke
    /// outline when it repeats the fill before it.
    fn fill_then_stroke(
        &mut self,
        fill: Option<Color>,
        stroke: Option<Color>,
        mut draw: impl FnMut(&mut Self, Option<Color>, Option<Color>),
    ) {
        if let Some(fill) = fill {
            draw(self, None, Some(fill));
        }
        if let Some(stroke) = stroke {
            draw(self, Some(stroke), None);
            self.remove_duplicated_path();
        }
    }
}

impl Renderer for PathRenderer {
    fn is_capable_to(&self, cap: Capability) -> bool {
        matches!(cap, Capability::Holes | Capability::Alpha)
    }

    // line attributes do not change the outline
    fn set_linewidth(&mut self, _width: f64) {}
    fn set_linecaps(&mut self, _caps: LineCaps) {}
    fn set_linejoin(&mut self, _join: LineJoin) {}
    fn set_linestyle(&mut self, _style: LineStyle, _dash_length: f64) {}
    fn set_fillstyle(&mut self, _style: FillStyle) {}

    fn draw_line(&mut self, start: Point, end: Point, color: Color) {
        let path = self.current_path(Some(color), None);
        path_append(path, start);
        path.push(BezPoint::LineTo(end));
    }

    fn draw_polyline(&mut self, points: &[Point], color: Color) {
        self.polyline(points, Some(color), None, false);
    }

    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<Color>) {
        self.fill_then_stroke(fill, stroke, |r, stroke, fill| {
            r.polyline(points, stroke, fill, true)
        });
    }

    fn draw_rect(&mut self, ul: Point, lr: Point, fill: Option<Color>, stroke: Option<Color>) {
        self.fill_then_stroke(fill, stroke, |r, stroke, fill| r.rect(ul, lr, stroke, fill));
    }

    fn draw_rounded_rect(
        &mut self,
        ul: Point,
        lr: Point,
        fill: Option<Color>,
        stroke: Option<Color>,
        radius: f64,
    ) {
        // one outline is enough: the stroke if there is one, else the fill
        if stroke.is_some() {
            walk_rounded_rect(self, ul, lr, None, stroke, radius);
        } else {
            walk_rounded_rect(self, ul, lr, fill, None, radius);
        }
        if let Some(fill) = fill {
            self.fill = fill;
        }
    }

    fn draw_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color) {
        let path = self.current_path(Some(color), None);
        path_build_arc(path, center, width, height, angle1, angle2, false);
    }

    fn fill_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color) {
        let path = self.current_path(None, Some(color));
        path_build_arc(path, center, width, height, angle1, angle2, true);
    }

    fn draw_ellipse(&mut self, center: Point, width: f64, height: f64, fill: Option<Color>, stroke: Option<Color>) {
        self.fill_then_stroke(fill, stroke, |r, stroke, fill| {
            let path = r.current_path(stroke, fill);
            path_build_ellipse(path, center, width, height);
        });
    }

    fn draw_bezier(&mut self, points: &[BezPoint], color: Color) {
        self.bezier(points, Some(color), None, false);
        self.remove_duplicated_path();
    }

    fn draw_beziergon(&mut self, points: &[BezPoint], fill: Option<Color>, stroke: Option<Color>) {
        self.fill_then_stroke(fill, stroke, |r, stroke, fill| {
            r.bezier(points, stroke, fill, true)
        });
    }

    /// The glyph outline, rescaled onto the layout box
    fn draw_text(&mut self, text: &dyn TextOutline) {
        let color = text.color();
        let path = self.current_path(None, Some(color));
        if text.is_empty() {
            return;
        }
        let n0 = path.len();
        if !text.outline(path) || path.len() == n0 {
            crate::log::warn!("text has no outline");
            return;
        }

        let glyphs = polybezier_bbox(&path[n0..], &PolyBBExtras::default(), true);
        let layout = text.bounding_box();
        let fit = fit_box(&glyphs, &layout);
        for bp in &mut path[n0..] {
            *bp = bp.transform(&fit);
        }
    }

    fn draw_image(&mut self, point: Point, width: f64, height: f64) {
        crate::log::warn!(x = point.x, y = point.y, width, height, "image rendered as placeholder");
        let path = self.current_path(Some(IMAGE_STROKE), Some(IMAGE_FILL));
        path.push(BezPoint::MoveTo(point));
        path.push(BezPoint::LineTo(point + dvec2(width, 0.0)));
        path.push(BezPoint::LineTo(point + dvec2(width, height)));
        path.push(BezPoint::LineTo(point + dvec2(0.0, height)));
        path.push(BezPoint::LineTo(point));
        // crossed out
        path.push(BezPoint::LineTo(point + dvec2(width, height)));
    }

    fn draw_object(&mut self, object: &dyn Drawable, matrix: Option<&DAffine2>) {
        match matrix {
            Some(m) => {
                let mut transformed = TransformRenderer::new(self);
                transformed.draw_object(object, Some(m));
            }
            None => object.draw(self),
        }
    }
}

/// Per-axis scale and offset mapping `from` onto `to`.
///
/// A degenerate axis is only moved, never scaled.
fn fit_box(from: &Rectangle, to: &Rectangle) -> DAffine2 {
    let axis = |from_lo: f64, from_size: f64, to_lo: f64, to_size: f64| {
        if from_size.abs() < DEGENERATE_EPSILON {
            (1.0, to_lo - from_lo)
        } else {
            let scale = to_size / from_size;
            (scale, to_lo - from_lo * scale)
        }
    };
    let (sx, dx) = axis(from.left, from.width(), to.left, to.width());
    let (sy, dy) = axis(from.top, from.height(), to.top, to.height());
    DAffine2::from_translation(dvec2(dx, dy)) * DAffine2::from_scale(dvec2(sx, sy))
}
