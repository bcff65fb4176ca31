//! SVG path data import
//!
//! Turns the text of a `d` attribute into a [`BezPath`]. Quadratic
//! segments are raised to cubics and every coordinate comes out absolute.
//! Elliptical arcs are refused.

use glam::dvec2;
use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::defaults::EPSILON;
use crate::errors::{PathDataError, SourceContext};
use crate::types::{BezPath, BezPoint, Point};

#[derive(Parser)]
#[grammar = "pathdata.pest"]
struct PathDataParser;

/// Parse SVG path data. `name` labels the source in diagnostics.
///
/// Empty input gives an empty path.
pub fn parse_path_data(name: &str, source: &str) -> Result<BezPath, PathDataError> {
    let ctx = SourceContext::new(name, source);
    let pairs = PathDataParser::parse(Rule::path_data, source).map_err(|e| syntax_error(&ctx, e))?;

    let mut builder = PathBuilder::default();
    for pair in pairs {
        if pair.as_rule() == Rule::path_data {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::command {
                    builder.command(&ctx, inner)?;
                }
            }
        }
    }
    Ok(builder.path)
}

fn syntax_error(ctx: &SourceContext, err: pest::error::Error<Rule>) -> PathDataError {
    let (start, end) = match err.location {
        InputLocation::Pos(pos) => (pos, pos),
        InputLocation::Span((start, end)) => (start, end),
    };
    PathDataError::Syntax {
        message: err.variant.message().into_owned(),
        src: ctx.named_source(),
        span: (start, end - start).into(),
    }
}

/// Numbers per repetition of a command
fn arity(command: char) -> Option<usize> {
    match command.to_ascii_uppercase() {
        'Z' => Some(0),
        'H' | 'V' => Some(1),
        'M' | 'L' | 'T' => Some(2),
        'S' | 'Q' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        _ => None,
    }
}

/// Pen state while walking the commands
#[derive(Default)]
struct PathBuilder {
    path: BezPath,
    current: Point,
    /// Start of the current sub-path, where Z returns to
    start: Point,
    /// Second control point of the previous cubic, for S
    last_cubic: Option<Point>,
    /// Control point of the previous quadratic, for T
    last_quad: Option<Point>,
}

impl PathBuilder {
    fn command(&mut self, ctx: &SourceContext, pair: Pair<Rule>) -> Result<(), PathDataError> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let Some(letter) = inner.next() else {
            return Ok(());
        };
        let letter_span: SourceSpan = (letter.as_span().start(), letter.as_str().len()).into();
        let command = letter.as_str().chars().next().unwrap_or_default();

        let mut args = Vec::new();
        for number in inner {
            let value = number
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PathDataError::InvalidNumber {
                    src: ctx.named_source(),
                    span: (number.as_span().start(), number.as_str().len()).into(),
                })?;
            args.push(value);
        }

        let Some(arity) = arity(command) else {
            return Err(PathDataError::Syntax {
                message: format!("unknown command `{command}`"),
                src: ctx.named_source(),
                span: letter_span,
            });
        };
        if command.eq_ignore_ascii_case(&'A') {
            return Err(PathDataError::UnsupportedCommand {
                command,
                src: ctx.named_source(),
                span: letter_span,
            });
        }
        if self.path.is_empty() && !command.eq_ignore_ascii_case(&'M') {
            return Err(PathDataError::MissingMoveTo {
                src: ctx.named_source(),
                span: letter_span,
            });
        }

        let count_ok = if arity == 0 {
            args.is_empty()
        } else {
            !args.is_empty() && args.len() % arity == 0
        };
        if !count_ok {
            let message = if arity == 0 {
                format!("`{command}` takes no numbers, found {}", args.len())
            } else {
                format!("`{command}` takes numbers in groups of {arity}, found {}", args.len())
            };
            return Err(PathDataError::Syntax {
                message,
                src: ctx.named_source(),
                span: (span.start(), span.end() - span.start()).into(),
            });
        }

        if arity == 0 {
            self.close();
            return Ok(());
        }
        let relative = command.is_ascii_lowercase();
        for (i, chunk) in args.chunks(arity).enumerate() {
            self.segment(command.to_ascii_uppercase(), relative, i == 0, chunk);
        }
        Ok(())
    }

    fn segment(&mut self, command: char, relative: bool, first: bool, n: &[f64]) {
        let origin = if relative { self.current } else { Point::ZERO };
        let at = |k: usize| origin + dvec2(n[k], n[k + 1]);
        match command {
            'M' if first => self.move_to(at(0)),
            // pairs after the first are implicit line-tos
            'M' | 'L' => self.line_to(at(0)),
            'H' => {
                let x = if relative { self.current.x + n[0] } else { n[0] };
                self.line_to(dvec2(x, self.current.y));
            }
            'V' => {
                let y = if relative { self.current.y + n[0] } else { n[0] };
                self.line_to(dvec2(self.current.x, y));
            }
            'C' => self.curve_to(at(0), at(2), at(4)),
            'S' => {
                let c1 = reflect(self.current, self.last_cubic);
                self.curve_to(c1, at(0), at(2));
            }
            'Q' => self.quad_to(at(0), at(2)),
            'T' => {
                let q = reflect(self.current, self.last_quad);
                self.quad_to(q, at(0));
            }
            _ => {}
        }
    }

    fn move_to(&mut self, p: Point) {
        // consecutive move-tos collapse into the last one
        if let Some(last) = self.path.points_mut().last_mut()
            && last.is_move_to()
        {
            *last = BezPoint::MoveTo(p);
        } else {
            self.path.push(BezPoint::MoveTo(p));
        }
        self.current = p;
        self.start = p;
        self.last_cubic = None;
        self.last_quad = None;
    }

    fn line_to(&mut self, p: Point) {
        self.path.push(BezPoint::LineTo(p));
        self.current = p;
        self.last_cubic = None;
        self.last_quad = None;
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.path.push(BezPoint::CurveTo(c1, c2, p));
        self.current = p;
        self.last_cubic = Some(c2);
        self.last_quad = None;
    }

    /// Raise the quadratic with control `q` to a cubic
    fn quad_to(&mut self, q: Point, p: Point) {
        let p0 = self.current;
        let c1 = p0 + (q - p0) * (2.0 / 3.0);
        let c2 = p + (q - p) * (2.0 / 3.0);
        self.path.push(BezPoint::CurveTo(c1, c2, p));
        self.current = p;
        self.last_cubic = None;
        self.last_quad = Some(q);
    }

    fn close(&mut self) {
        if self.current.distance(self.start) >= EPSILON {
            self.path.push(BezPoint::LineTo(self.start));
        }
        self.current = self.start;
        self.last_cubic = None;
        self.last_quad = None;
    }
}

/// Mirror the previous control point through the pen, or the pen itself
fn reflect(current: Point, control: Option<Point>) -> Point {
    match control {
        Some(c) => 2.0 * current - c,
        None => current,
    }
}
