//! Path-data error types

use thiserror::Error;

use crate::command::PathCommandKind;

/// Errors surfaced while interpreting SVG path data
///
/// Degenerate geometry (zero radii, coincident arc endpoints) is not an
/// error; those cases have defined fallbacks and never reach this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathDataError {
    /// A command letter outside the path grammar
    #[error("unsupported path command '{0}'")]
    UnsupportedCommand(char),

    /// A command's coordinate buffer ended mid parameter group
    #[error("incomplete parameters for {kind:?}: expected a multiple of {expected}, got {got}")]
    InsufficientParameters {
        kind: PathCommandKind,
        expected: usize,
        got: usize,
    },

    /// Malformed numeric literal in the path data
    #[error("invalid number in path data at byte {offset}")]
    InvalidNumber { offset: usize },

    /// A numeric literal before any command letter
    #[error("number {0} before any command letter")]
    UnexpectedNumber(f64),
}
