//! Command registry and coordinate accumulation
//!
//! The registry maps a command letter to its kind and directionality.
//! `CommandInstance` buffers numeric tokens for the command currently being
//! assembled and hands them out one parameter group at a time, so that
//! implicit repetition (`L 10 10 20 20` meaning two line-to operations)
//! never drops coordinate groups.

use smallvec::SmallVec;
use tracing::warn;

use crate::error::PathDataError;

/// How a command's raw coordinates resolve against the current point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directionality {
    /// Coordinates pass through unchanged
    Absolute,
    /// Coordinates are offsets from the current point
    Relative,
}

/// The closed set of path command kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathCommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CubicCurveTo,
    SmoothCubicCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticCurveTo,
    EllipticalArc,
    ClosePath,
}

impl PathCommandKind {
    /// Size of one parameter group for this kind
    pub fn required_params(&self) -> usize {
        match self {
            PathCommandKind::MoveTo => 2,
            PathCommandKind::LineTo => 2,
            PathCommandKind::HorizontalLineTo => 1,
            PathCommandKind::VerticalLineTo => 1,
            PathCommandKind::CubicCurveTo => 6,
            PathCommandKind::SmoothCubicCurveTo => 4,
            PathCommandKind::QuadraticCurveTo => 4,
            PathCommandKind::SmoothQuadraticCurveTo => 2,
            PathCommandKind::EllipticalArc => 7,
            PathCommandKind::ClosePath => 0,
        }
    }
}

/// Look up a command letter
///
/// Uppercase letters are absolute, lowercase relative. `Z`/`z` both close
/// the path; close has no coordinates so its directionality never matters.
pub fn lookup(letter: char) -> Result<(PathCommandKind, Directionality), PathDataError> {
    let kind = match letter.to_ascii_uppercase() {
        'M' => PathCommandKind::MoveTo,
        'L' => PathCommandKind::LineTo,
        'H' => PathCommandKind::HorizontalLineTo,
        'V' => PathCommandKind::VerticalLineTo,
        'C' => PathCommandKind::CubicCurveTo,
        'S' => PathCommandKind::SmoothCubicCurveTo,
        'Q' => PathCommandKind::QuadraticCurveTo,
        'T' => PathCommandKind::SmoothQuadraticCurveTo,
        'A' => PathCommandKind::EllipticalArc,
        'Z' => PathCommandKind::ClosePath,
        _ => {
            warn!(%letter, "unsupported path command");
            return Err(PathDataError::UnsupportedCommand(letter));
        }
    };
    let directionality = if letter.is_ascii_uppercase() {
        Directionality::Absolute
    } else {
        Directionality::Relative
    };
    Ok((kind, directionality))
}

/// Coordinate buffer, at most one arc group before draining
pub type CoordBuffer = SmallVec<[f64; 8]>;

/// The command currently being assembled from the token stream
///
/// Owns its coordinate buffer; nothing outside the instance mutates it.
#[derive(Clone, Debug)]
pub struct CommandInstance {
    kind: PathCommandKind,
    directionality: Directionality,
    buffer: CoordBuffer,
}

impl CommandInstance {
    pub fn new(kind: PathCommandKind, directionality: Directionality) -> Self {
        Self {
            kind,
            directionality,
            buffer: CoordBuffer::new(),
        }
    }

    pub fn kind(&self) -> PathCommandKind {
        self.kind
    }

    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    /// Append one numeric token
    pub fn push(&mut self, value: f64) {
        self.buffer.push(value);
    }

    /// Ready iff the buffer holds a positive whole number of parameter
    /// groups, or the kind takes no parameters
    pub fn is_ready(&self) -> bool {
        let required = self.kind.required_params();
        required == 0 || (!self.buffer.is_empty() && self.buffer.len() % required == 0)
    }

    /// Consume exactly one parameter group from the front of the buffer
    /// (everything, for kinds with no required count)
    ///
    /// Remaining groups stay buffered for the next drain; surplus
    /// coordinates are never discarded.
    pub fn drain_group(&mut self) -> CoordBuffer {
        let required = self.kind.required_params();
        if required == 0 {
            return std::mem::take(&mut self.buffer);
        }
        self.buffer.drain(..required).collect()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
