//! The renderer interface and its backends.
//!
//! Drawables describe themselves as a sequence of draw calls on a
//! [`Renderer`]. This module is organized into:
//! - `geometry`: bezier approximations shared by the backends
//! - `path_renderer`: a backend that records the calls as paths
//! - `transform_renderer`: a backend that applies a matrix stack and
//!   forwards to another renderer

pub mod geometry;
mod path_renderer;
mod transform_renderer;

pub use path_renderer::{PathRenderer, PathRendererOptions};
pub use transform_renderer::TransformRenderer;

use glam::{DAffine2, dvec2};

use crate::object::Drawable;
use crate::types::{BezPoint, Color, Point, Rectangle};

/// Optional renderer features a drawable may rely on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Several sub-paths in one path, filled even-odd
    Holes,
    /// Colors with alpha
    Alpha,
    /// Drawing with a transformation matrix
    Affine,
    /// Pattern fills
    Pattern,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCaps {
    #[default]
    Butt,
    Round,
    Projecting,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    DashDotDot,
    Dotted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillStyle {
    #[default]
    Solid,
}

/// Text that can be turned into an outline.
///
/// Glyph shaping lives outside this crate; the renderer only needs the
/// outline and the box the text layout claims for it.
pub trait TextOutline {
    fn is_empty(&self) -> bool;

    fn color(&self) -> Color;

    /// Append the glyph outlines to `path`. Returns false if there is none.
    fn outline(&self, path: &mut Vec<BezPoint>) -> bool;

    /// The layout box, which usually differs a little from the outline's
    fn bounding_box(&self) -> Rectangle;
}

/// A drawing surface.
///
/// Angles are in degrees, counter-clockwise. Colors passed as `Option`
/// select fill and stroke; `None` skips that part.
pub trait Renderer {
    /// Start of a rendering run
    fn begin_render(&mut self, _update: Option<&Rectangle>) {}

    /// End of a rendering run
    fn end_render(&mut self) {}

    fn is_capable_to(&self, cap: Capability) -> bool;

    /// Zero means hairline
    fn set_linewidth(&mut self, width: f64);
    fn set_linecaps(&mut self, caps: LineCaps);
    fn set_linejoin(&mut self, join: LineJoin);
    fn set_linestyle(&mut self, style: LineStyle, dash_length: f64);
    fn set_fillstyle(&mut self, style: FillStyle);

    fn draw_line(&mut self, start: Point, end: Point, color: Color);
    fn draw_polyline(&mut self, points: &[Point], color: Color);
    fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<Color>);
    fn draw_rect(&mut self, ul: Point, lr: Point, fill: Option<Color>, stroke: Option<Color>);

    /// Walks the outline as lines and quarter arcs.
    fn draw_rounded_rect(
        &mut self,
        ul: Point,
        lr: Point,
        fill: Option<Color>,
        stroke: Option<Color>,
        radius: f64,
    ) {
        walk_rounded_rect(self, ul, lr, fill, stroke, radius);
    }

    fn draw_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color);

    /// Pie wedge from `angle1` to `angle2`
    fn fill_arc(&mut self, center: Point, width: f64, height: f64, angle1: f64, angle2: f64, color: Color);

    fn draw_ellipse(&mut self, center: Point, width: f64, height: f64, fill: Option<Color>, stroke: Option<Color>);

    /// Open bezier chain, starting with a move-to
    fn draw_bezier(&mut self, points: &[BezPoint], color: Color);

    /// Closed bezier shape, starting with a move-to
    fn draw_beziergon(&mut self, points: &[BezPoint], fill: Option<Color>, stroke: Option<Color>);

    fn draw_text(&mut self, text: &dyn TextOutline);

    /// Only the placement is known here, never the pixels
    fn draw_image(&mut self, point: Point, width: f64, height: f64);

    /// Let `object` draw itself, optionally under `matrix`
    fn draw_object(&mut self, object: &dyn Drawable, matrix: Option<&DAffine2>);
}

/// Rounded rectangle in terms of simpler calls.
///
/// The fill goes out as one beziergon. The stroke is walked clockwise
/// from the top edge as alternating lines and quarter arcs, so a renderer
/// that stitches connected calls sees a single contour. A radius that
/// clamps to zero or less draws a plain rectangle.
pub fn walk_rounded_rect<R: Renderer + ?Sized>(
    renderer: &mut R,
    ul: Point,
    lr: Point,
    fill: Option<Color>,
    stroke: Option<Color>,
    radius: f64,
) {
    let r = geometry::clamp_corner_radius(ul, lr, radius);
    if r <= 0.0 {
        renderer.draw_rect(ul, lr, fill, stroke);
        return;
    }

    if fill.is_some() {
        let outline = geometry::rounded_rect_outline(ul, lr, r);
        renderer.draw_beziergon(&outline, fill, None);
    }

    if let Some(color) = stroke {
        let d = 2.0 * r;
        renderer.draw_line(dvec2(ul.x + r, ul.y), dvec2(lr.x - r, ul.y), color);
        renderer.draw_arc(dvec2(lr.x - r, ul.y + r), d, d, 0.0, 90.0, color);
        renderer.draw_line(dvec2(lr.x, ul.y + r), dvec2(lr.x, lr.y - r), color);
        renderer.draw_arc(dvec2(lr.x - r, lr.y - r), d, d, 270.0, 360.0, color);
        renderer.draw_line(dvec2(lr.x - r, lr.y), dvec2(ul.x + r, lr.y), color);
        renderer.draw_arc(dvec2(ul.x + r, lr.y - r), d, d, 180.0, 270.0, color);
        renderer.draw_line(dvec2(ul.x, lr.y - r), dvec2(ul.x, ul.y + r), color);
        renderer.draw_arc(dvec2(ul.x + r, ul.y + r), d, d, 90.0, 180.0, color);
    }
}
