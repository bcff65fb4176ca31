//! Logging for the geometry code.
//!
//! With the `tracing` feature the macros are the `tracing` ones and every
//! path combination runs inside a `path_combine` span. Without it the
//! macros expand to nothing and the span is a unit guard.

use crate::combine::PathCombineMode;

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

/// Held for the duration of one combination
#[cfg(feature = "tracing")]
pub(crate) type CombineSpan = tracing::span::EnteredSpan;

#[cfg(not(feature = "tracing"))]
pub(crate) struct CombineSpan;

/// Enter the span that tags crossing and run events with the mode and
/// the input sizes.
#[cfg(feature = "tracing")]
pub(crate) fn enter_combine(mode: PathCombineMode, one: usize, two: usize) -> CombineSpan {
    tracing::debug_span!("path_combine", %mode, one, two).entered()
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn enter_combine(_mode: PathCombineMode, _one: usize, _two: usize) -> CombineSpan {
    CombineSpan
}
