//! Quill Core
//!
//! Foundational types for the Quill vector-path toolkit:
//!
//! - **Geometry**: `Point`, `Vec2`, `Rect`, and 2D affine transforms
//! - **Path Model**: recorded vector paths built from move/line/curve/arc
//!   commands
//! - **Path Sink Contract**: the `PathSink` trait consumed by path
//!   producers such as the SVG path-data interpreter in `quill_svg`
//!
//! # Example
//!
//! ```rust
//! use quill_core::{Path, PathSink, Point};
//!
//! let mut path = Path::new();
//! path.move_to(Point::new(0.0, 0.0));
//! path.line_to(Point::new(10.0, 0.0));
//! path.close_subpath();
//!
//! assert_eq!(path.current_point(), Point::new(0.0, 0.0));
//! ```

pub mod geometry;
pub mod path;

pub use geometry::{Affine2D, Point, Rect, Size, Vec2};
pub use path::{Path, PathCommand, PathSink};
