//! Error types with rich diagnostics using miette
//!
//! Geometry operations never fail; they answer with sentinels. These errors
//! cover the input surfaces: structural path validation and path-data text.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Path Errors
// ============================================================================

/// Structural problems with a BezPoint sequence
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("path is empty")]
    #[diagnostic(code(diapath::path::empty))]
    Empty,

    #[error("path must start with a move-to, found {found}")]
    #[diagnostic(
        code(diapath::path::missing_move_to),
        help("prepend a move-to to the first point of the outline")
    )]
    MissingMoveTo { found: &'static str },

    #[error("path has {len} points, at least {min} are required")]
    #[diagnostic(code(diapath::path::too_short))]
    TooShort { len: usize, min: usize },

    #[error("path contains a non-finite coordinate at element {index}")]
    #[diagnostic(code(diapath::path::non_finite))]
    NonFinite { index: usize },
}

// ============================================================================
// Path Data Errors
// ============================================================================

/// Errors that occur while parsing SVG path data
#[derive(Error, Diagnostic, Debug)]
pub enum PathDataError {
    #[error("invalid path data")]
    #[diagnostic(code(diapath::pathdata::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
    },

    #[error("unsupported path command `{command}`")]
    #[diagnostic(
        code(diapath::pathdata::unsupported_command),
        help("convert elliptical arcs to cubic curves before importing")
    )]
    UnsupportedCommand {
        command: char,
        #[source_code]
        src: NamedSource<String>,
        #[label("not supported")]
        span: SourceSpan,
    },

    #[error("path data must start with a move-to")]
    #[diagnostic(code(diapath::pathdata::missing_move_to))]
    MissingMoveTo {
        #[source_code]
        src: NamedSource<String>,
        #[label("first command")]
        span: SourceSpan,
    },

    #[error("invalid number")]
    #[diagnostic(code(diapath::pathdata::invalid_number))]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,
        #[label("not a number")]
        span: SourceSpan,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_error_messages() {
        assert_eq!(PathError::Empty.to_string(), "path is empty");
        assert_eq!(
            PathError::TooShort { len: 1, min: 2 }.to_string(),
            "path has 1 points, at least 2 are required"
        );
        assert_eq!(
            PathError::MissingMoveTo { found: "line-to" }.to_string(),
            "path must start with a move-to, found line-to"
        );
    }

    #[test]
    fn path_data_error_has_code() {
        let ctx = SourceContext::new("<input>", "M 0 0 A 1 1 0 0 0 2 2");
        let err = PathDataError::UnsupportedCommand {
            command: 'A',
            src: ctx.named_source(),
            span: (6, 1).into(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("diapath::pathdata::unsupported_command"));
        assert_eq!(err.to_string(), "unsupported path command `A`");
    }
}
