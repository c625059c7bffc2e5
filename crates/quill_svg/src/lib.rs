//! SVG path-data interpretation for the Quill path model
//!
//! This crate interprets the SVG `d` attribute mini-language (command
//! letters `M, L, H, V, C, S, Q, T, A, Z` in either case) and converts it
//! into a deterministic sequence of operations against a
//! [`PathSink`](quill_core::PathSink):
//!
//! - relative coordinates resolve against the sink's current point
//! - smooth curves (`S`, `T`) reflect the previous command's control point
//! - elliptical arcs are converted from endpoint to center
//!   parameterization, with degenerate cases degrading to a line or a no-op
//!
//! # Example
//!
//! ```rust
//! use quill_svg::path_from_data;
//!
//! let path = path_from_data("M 0 0 L 10 0 L 10 10 Z").unwrap();
//! assert_eq!(path.commands().len(), 4);
//! ```

mod arc;
mod command;
mod error;
mod interpreter;
mod lexer;

pub use arc::{endpoint_to_center, ArcParameterization};
pub use command::{lookup, CommandInstance, CoordBuffer, Directionality, PathCommandKind};
pub use error::PathDataError;
pub use interpreter::{ExecutedCommand, PathInterpreter};
pub use lexer::{tokenize, Token};

use quill_core::{Path, PathSink};
use tracing::debug;

/// Interpret a path-data string against a sink
///
/// Tokenizes `data` and executes every command. On error the sink keeps
/// everything executed up to that point; no partial command reaches it.
pub fn parse_path_data(data: &str, sink: &mut impl PathSink) -> Result<(), PathDataError> {
    debug!(len = data.len(), "parsing path data");
    let mut interpreter = PathInterpreter::new(sink);
    for token in tokenize(data)? {
        interpreter.token(token)?;
    }
    interpreter.finish()
}

/// Interpret a path-data string into a recorded [`Path`]
pub fn path_from_data(data: &str) -> Result<Path, PathDataError> {
    let mut path = Path::new();
    parse_path_data(data, &mut path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use quill_core::{PathCommand, Point};

    use super::*;

    #[test]
    fn heart_shape_parses() {
        // Mixed absolute/relative commands with smooth continuation
        let d = "M 10,30 A 20,20 0,0,1 50,30 A 20,20 0,0,1 90,30 Q 90,60 50,90 Q 10,60 10,30 z";
        let path = path_from_data(d).unwrap();
        assert_eq!(path.commands().len(), 6);
        assert!(matches!(path.commands()[1], PathCommand::Arc { .. }));
        assert!(matches!(path.commands()[5], PathCommand::Close));
    }

    #[test]
    fn error_keeps_prefix_operations() {
        let mut path = quill_core::Path::new();
        let result = parse_path_data("M 0 0 L 10 0 L 10", &mut path);
        assert!(matches!(
            result,
            Err(PathDataError::InsufficientParameters { .. })
        ));
        // The complete commands before the truncation survive
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 0.0)),
            ]
        );
    }

    #[test]
    fn empty_data_is_an_empty_path() {
        let path = path_from_data("").unwrap();
        assert!(path.is_empty());
    }
}
