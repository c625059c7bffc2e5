//! Path model and the path sink contract
//!
//! `PathSink` is the abstract destination for path-construction operations.
//! Producers (such as the SVG path interpreter in `quill_svg`) only ever
//! read the sink's current point and issue drawing operations; the sink owns
//! the current point and updates it after every operation.
//!
//! `Path` is the recording implementation: it stores each operation as a
//! `PathCommand` and tracks the cursor, including the subpath start so that
//! closing a subpath returns the cursor to where the subpath began.

use crate::geometry::{Affine2D, Point, Rect};

// ─────────────────────────────────────────────────────────────────────────────
// Path Sink Contract
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for path-construction operations
///
/// The sink is the single source of truth for the current point. Every
/// drawing operation moves it: to the operation's end point for moves,
/// lines, and curves; to the point at `end_angle` for arcs; and back to the
/// subpath start on close (sink's choice, see `Path`).
pub trait PathSink {
    /// Begin a new subpath at `point`
    fn move_to(&mut self, point: Point);

    /// Straight line from the current point to `point`
    fn line_to(&mut self, point: Point);

    /// Cubic Bézier curve to `end` with two control points
    fn curve_to(&mut self, end: Point, control1: Point, control2: Point);

    /// Quadratic Bézier curve to `end` with one control point
    fn quad_curve_to(&mut self, end: Point, control: Point);

    /// Circular arc of `radius` around `center`, swept from `start_angle`
    /// to `end_angle`, drawn under `transform`
    ///
    /// The transform carries the translation to the ellipse center, the
    /// x-axis rotation, and the axis-ratio scale, so that the point at
    /// angle `t` is `transform * (radius * cos t, radius * sin t)`. An
    /// ellipse of any axis ratio renders as one transformed circular arc.
    fn add_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
        transform: Affine2D,
    );

    /// Close the current subpath
    fn close_subpath(&mut self);

    /// The cursor position after the most recent operation
    fn current_point(&self) -> Point;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Path
// ─────────────────────────────────────────────────────────────────────────────

/// Path command recorded by `Path`
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Transformed circular arc (center parameterization)
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
        transform: Affine2D,
    },
    /// Close the current subpath
    Close,
}

/// A recorded vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
    current: Point,
    subpath_start: Point,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from a vector of commands
    ///
    /// The cursor is replayed from the commands so that further sink
    /// operations continue from the right place.
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        let mut path = Self::new();
        for cmd in commands {
            path.apply(cmd);
        }
        path
    }

    /// Get the recorded commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Create a rectangle path
    pub fn rect(rect: Rect) -> Self {
        let mut path = Self::new();
        path.move_to(Point::new(rect.x(), rect.y()));
        path.line_to(Point::new(rect.x() + rect.width(), rect.y()));
        path.line_to(Point::new(rect.x() + rect.width(), rect.y() + rect.height()));
        path.line_to(Point::new(rect.x(), rect.y() + rect.height()));
        path.close_subpath();
        path
    }

    /// Create a line path
    pub fn line(from: Point, to: Point) -> Self {
        let mut path = Self::new();
        path.move_to(from);
        path.line_to(to);
        path
    }

    /// Create a circle path
    pub fn circle(center: Point, radius: f64) -> Self {
        // Magic number for cubic Bézier circle approximation
        let k = 0.552_284_749_830_793_4;
        let r = radius;
        let cx = center.x;
        let cy = center.y;

        let mut path = Self::new();
        path.move_to(Point::new(cx + r, cy));
        path.curve_to(
            Point::new(cx, cy + r),
            Point::new(cx + r, cy + r * k),
            Point::new(cx + r * k, cy + r),
        );
        path.curve_to(
            Point::new(cx - r, cy),
            Point::new(cx - r * k, cy + r),
            Point::new(cx - r, cy + r * k),
        );
        path.curve_to(
            Point::new(cx, cy - r),
            Point::new(cx - r, cy - r * k),
            Point::new(cx - r * k, cy - r),
        );
        path.curve_to(
            Point::new(cx + r, cy),
            Point::new(cx + r * k, cy - r),
            Point::new(cx + r, cy - r * k),
        );
        path.close_subpath();
        path
    }

    /// Calculate the bounding rectangle of this path
    ///
    /// Curve control points are included (a conservative hull); arcs are
    /// sampled at their endpoints and at the axis-aligned extremes inside
    /// the sweep.
    pub fn bounds(&self) -> Rect {
        if self.commands.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let mut include = |p: Point| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        };

        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => include(*p),
                PathCommand::QuadTo { control, end } => {
                    include(*control);
                    include(*end);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    include(*control1);
                    include(*control2);
                    include(*end);
                }
                PathCommand::Arc {
                    radius,
                    start_angle,
                    end_angle,
                    transform,
                    ..
                } => {
                    for angle in arc_sample_angles(*start_angle, *end_angle) {
                        include(transform.transform_point(Point::new(
                            radius * angle.cos(),
                            radius * angle.sin(),
                        )));
                    }
                }
                PathCommand::Close => {}
            }
        }

        if min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite() {
            Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
        } else {
            Rect::ZERO
        }
    }

    fn apply(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) => self.move_to(p),
            PathCommand::LineTo(p) => self.line_to(p),
            PathCommand::QuadTo { control, end } => self.quad_curve_to(end, control),
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => self.curve_to(end, control1, control2),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
                transform,
            } => self.add_arc(center, radius, start_angle, end_angle, clockwise, transform),
            PathCommand::Close => self.close_subpath(),
        }
    }
}

/// Endpoint and quadrant-extreme angles within a sweep, for bounds sampling
fn arc_sample_angles(start: f64, end: f64) -> Vec<f64> {
    use std::f64::consts::FRAC_PI_2;

    let mut angles = vec![start, end];
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let mut a = (lo / FRAC_PI_2).ceil() * FRAC_PI_2;
    while a < hi {
        angles.push(a);
        a += FRAC_PI_2;
    }
    angles
}

impl PathSink for Path {
    fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
        self.current = point;
        self.subpath_start = point;
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
        self.current = point;
    }

    fn curve_to(&mut self, end: Point, control1: Point, control2: Point) {
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            end,
        });
        self.current = end;
    }

    fn quad_curve_to(&mut self, end: Point, control: Point) {
        self.commands.push(PathCommand::QuadTo { control, end });
        self.current = end;
    }

    fn add_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
        transform: Affine2D,
    ) {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
            transform,
        });
        // Cursor lands on the arc's end point
        self.current = transform.transform_point(Point::new(
            radius * end_angle.cos(),
            radius * end_angle.sin(),
        ));
    }

    fn close_subpath(&mut self) {
        self.commands.push(PathCommand::Close);
        self.current = self.subpath_start;
    }

    fn current_point(&self) -> Point {
        self.current
    }
}
