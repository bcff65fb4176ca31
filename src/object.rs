//! Drawable objects and their conversion into paths.
//!
//! Anything that can describe itself to a [`Renderer`] can be turned into
//! outlines by drawing it into a [`PathRenderer`]. The [`Primitive`] enum
//! covers the plain shapes; [`StandardPath`] is the object holding such an
//! outline afterwards.

use enum_dispatch::enum_dispatch;
use glam::DAffine2;

use crate::bbox::{PolyBBExtras, polybezier_bbox};
use crate::combine::{PathCombineMode, path_combine};
use crate::render::{Capability, PathRenderer, Renderer, TextOutline};
use crate::types::{BezPath, BezPoint, Color, Point, Rectangle};

/// Something that can draw itself
#[enum_dispatch]
pub trait Drawable {
    fn draw(&self, renderer: &mut dyn Renderer);
}

/// The plain shapes, replayable into any renderer
#[enum_dispatch(Drawable)]
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line(Line),
    Polyline(Polyline),
    Polygon(Polygon),
    Rect(Rect),
    RoundedRect(RoundedRect),
    Arc(Arc),
    Ellipse(Ellipse),
    Bezier(Bezier),
    Beziergon(Beziergon),
    Text(Text),
    Image(Image),
    StandardPath(StandardPath),
    Group(Group),
}

// ============================================================================
// Primitives
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub line_width: f64,
}

impl Drawable for Line {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_line(self.start, self.end, self.color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub color: Color,
    pub line_width: f64,
}

impl Drawable for Polyline {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_polyline(&self.points, self.color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Drawable for Polygon {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_polygon(&self.points, self.fill, self.stroke);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub ul: Point,
    pub lr: Point,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Rect {
    /// Filled, unstroked
    pub fn filled(ul: Point, lr: Point, fill: Color) -> Self {
        Self {
            ul,
            lr,
            fill: Some(fill),
            stroke: None,
            line_width: 0.0,
        }
    }
}

impl Drawable for Rect {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_rect(self.ul, self.lr, self.fill, self.stroke);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundedRect {
    pub ul: Point,
    pub lr: Point,
    pub radius: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Drawable for RoundedRect {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_rounded_rect(self.ul, self.lr, self.fill, self.stroke, self.radius);
    }
}

/// Elliptical arc, angles in degrees
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub angle1: f64,
    pub angle2: f64,
    pub color: Color,
    pub line_width: f64,
    /// Draw as a filled pie wedge
    pub filled: bool,
}

impl Drawable for Arc {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        if self.filled {
            renderer.fill_arc(self.center, self.width, self.height, self.angle1, self.angle2, self.color);
        } else {
            renderer.draw_arc(self.center, self.width, self.height, self.angle1, self.angle2, self.color);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Drawable for Ellipse {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_ellipse(self.center, self.width, self.height, self.fill, self.stroke);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bezier {
    pub points: BezPath,
    pub color: Color,
    pub line_width: f64,
}

impl Drawable for Bezier {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_bezier(&self.points, self.color);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Beziergon {
    pub points: BezPath,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f64,
}

impl Drawable for Beziergon {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        renderer.draw_beziergon(&self.points, self.fill, self.stroke);
    }
}

/// Text already shaped into glyph outlines
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub outline: BezPath,
    /// The box the layout reserves for the text
    pub layout: Rectangle,
    pub color: Color,
}

impl TextOutline for Text {
    fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    fn color(&self) -> Color {
        self.color
    }

    fn outline(&self, path: &mut Vec<BezPoint>) -> bool {
        path.extend_from_slice(&self.outline);
        !self.outline.is_empty()
    }

    fn bounding_box(&self) -> Rectangle {
        self.layout
    }
}

impl Drawable for Text {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_text(self);
    }
}

/// A raster image; only its placement is known
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub point: Point,
    pub width: f64,
    pub height: f64,
}

impl Drawable for Image {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_image(self.point, self.width, self.height);
    }
}

/// Children drawn in order, optionally under a transformation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub children: Vec<Primitive>,
    pub matrix: Option<DAffine2>,
}

impl Drawable for Group {
    fn draw(&self, renderer: &mut dyn Renderer) {
        for child in &self.children {
            renderer.draw_object(child, self.matrix.as_ref());
        }
    }
}

// ============================================================================
// Standard Path
// ============================================================================

/// Which parts of a [`StandardPath`] are painted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StdPathStyle {
    #[default]
    Stroke,
    Fill,
    StrokeAndFill,
}

impl StdPathStyle {
    pub fn strokes(self) -> bool {
        matches!(self, StdPathStyle::Stroke | StdPathStyle::StrokeAndFill)
    }

    pub fn fills(self) -> bool {
        matches!(self, StdPathStyle::Fill | StdPathStyle::StrokeAndFill)
    }
}

/// An object made of one free-form bezier path
#[derive(Clone, Debug, PartialEq)]
pub struct StandardPath {
    pub points: BezPath,
    pub style: StdPathStyle,
    pub line_width: f64,
    pub stroke: Color,
    pub fill: Color,
}

impl StandardPath {
    pub fn new(points: BezPath) -> Self {
        Self {
            points,
            style: StdPathStyle::default(),
            line_width: 0.1,
            stroke: Color::BLACK,
            fill: Color::WHITE,
        }
    }

    pub fn with_style(mut self, style: StdPathStyle) -> Self {
        self.style = style;
        self
    }

    /// Box around the path and, when stroked, half the line width
    pub fn bounding_box(&self) -> Rectangle {
        let half = if self.style.strokes() {
            self.line_width / 2.0
        } else {
            0.0
        };
        polybezier_bbox(&self.points, &PolyBBExtras::with_line_width(2.0 * half), false)
    }

    /// Reverse the travel direction
    pub fn invert(&mut self) {
        self.points = self.points.invert();
    }

    pub fn transform(&mut self, m: &DAffine2) {
        self.points.transform(m);
    }

    fn draw_outline(&self, renderer: &mut dyn Renderer, points: &[BezPoint]) {
        let fill = self.style.fills().then_some(self.fill);
        let stroke = self.style.strokes().then_some(self.stroke);
        match (fill, stroke) {
            (Some(_), _) => renderer.draw_beziergon(points, fill, stroke),
            (None, Some(stroke)) => renderer.draw_bezier(points, stroke),
            (None, None) => {}
        }
    }
}

impl Drawable for StandardPath {
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.set_linewidth(self.line_width);
        if renderer.is_capable_to(Capability::Holes) {
            self.draw_outline(renderer, &self.points);
        } else {
            for sub in self.points.subpaths() {
                self.draw_outline(renderer, &sub);
            }
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// What an object looks like as paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathShape {
    Single(BezPath),
    Group(Vec<BezPath>),
}

impl PathShape {
    pub fn paths(&self) -> &[BezPath] {
        match self {
            PathShape::Single(path) => std::slice::from_ref(path),
            PathShape::Group(paths) => paths,
        }
    }

    /// As standard path objects with the given style
    pub fn into_primitive(self, style: StdPathStyle) -> Primitive {
        let make = |points| Primitive::from(StandardPath::new(points).with_style(style));
        match self {
            PathShape::Single(path) => make(path),
            PathShape::Group(paths) => Primitive::from(Group {
                children: paths.into_iter().map(make).collect(),
                matrix: None,
            }),
        }
    }
}

/// Draw `object` into a fresh [`PathRenderer`] and collect the outlines
pub fn create_standard_path_from_object(object: &dyn Drawable) -> Option<PathShape> {
    let mut renderer = PathRenderer::new();
    object.draw(&mut renderer);
    renderer.into_shape()
}

/// Combine the outlines of two objects.
///
/// Each object has to come out as a single path.
pub fn combine_objects(a: &dyn Drawable, b: &dyn Drawable, mode: PathCombineMode) -> Option<BezPath> {
    let PathShape::Single(one) = create_standard_path_from_object(a)? else {
        crate::log::debug!("first object does not convert to a single path");
        return None;
    };
    let PathShape::Single(two) = create_standard_path_from_object(b)? else {
        crate::log::debug!("second object does not convert to a single path");
        return None;
    };
    path_combine(&one, &two, mode)
}
