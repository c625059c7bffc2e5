//! Path command execution
//!
//! `PathInterpreter` drives a stream of path-data tokens into calls on a
//! `PathSink`. Commands assemble in a `CommandInstance`; whenever the
//! instance holds a full parameter group the group is drained and executed,
//! so implicit repetition (`L 10 10 20 20`) yields one operation per group
//! with nothing dropped.
//!
//! The last executed command is kept as a read-only `ExecutedCommand` so
//! the smooth curve commands (`S`, `T`) can reflect its control point, and
//! so a move-to following a move-to becomes the implicit line-to the SVG
//! grammar prescribes.

use quill_core::{PathSink, Point, Vec2};
use tracing::warn;

use crate::arc::{endpoint_to_center, ArcParameterization};
use crate::command::{lookup, CommandInstance, CoordBuffer, Directionality, PathCommandKind};
use crate::error::PathDataError;
use crate::lexer::Token;

/// Read-only view of the most recently executed command
///
/// Holds the parameter group exactly as drained, which is what reflection
/// needs: for a relative predecessor the absolute control point is
/// reconstructed from the raw offsets and the command's own end-point
/// delta.
#[derive(Clone, Debug)]
pub struct ExecutedCommand {
    kind: PathCommandKind,
    directionality: Directionality,
    params: CoordBuffer,
}

impl ExecutedCommand {
    pub fn kind(&self) -> PathCommandKind {
        self.kind
    }

    pub fn directionality(&self) -> Directionality {
        self.directionality
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }
}

/// Interprets path-data tokens against a path sink
pub struct PathInterpreter<'a, S: PathSink> {
    sink: &'a mut S,
    pending: Option<CommandInstance>,
    previous: Option<ExecutedCommand>,
}

impl<'a, S: PathSink> PathInterpreter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            pending: None,
            previous: None,
        }
    }

    /// Feed one token
    ///
    /// A command letter finishes the previous instance and starts a new
    /// one; a number accumulates into the current instance. Full parameter
    /// groups execute as soon as they are complete.
    pub fn token(&mut self, token: Token) -> Result<(), PathDataError> {
        match token {
            Token::Command(letter) => {
                let (kind, directionality) = lookup(letter)?;
                self.abandon_pending()?;
                self.pending = Some(CommandInstance::new(kind, directionality));

                // Close has no parameters and executes on the letter itself
                if kind.required_params() == 0 {
                    self.execute(kind, directionality, CoordBuffer::new());
                }
                Ok(())
            }
            Token::Number(value) => {
                let Some(pending) = self.pending.as_mut() else {
                    return Err(PathDataError::UnexpectedNumber(value));
                };
                pending.push(value);
                self.execute_ready();
                Ok(())
            }
        }
    }

    /// Finish the stream
    ///
    /// A trailing partial parameter group is discarded and reported; every
    /// operation already executed stands.
    pub fn finish(mut self) -> Result<(), PathDataError> {
        self.abandon_pending()
    }

    /// Discard the pending instance, surfacing a partial parameter group
    fn abandon_pending(&mut self) -> Result<(), PathDataError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let leftover = pending.buffered();
        if leftover > 0 {
            let kind = pending.kind();
            let expected = kind.required_params();
            warn!(?kind, expected, got = leftover, "discarding partial parameter group");
            return Err(PathDataError::InsufficientParameters {
                kind,
                expected,
                got: leftover,
            });
        }
        Ok(())
    }

    /// Execute complete parameter groups until the buffer is exhausted
    fn execute_ready(&mut self) {
        loop {
            let Some(pending) = self.pending.as_mut() else {
                return;
            };
            if pending.kind().required_params() == 0 || !pending.is_ready() {
                return;
            }
            let kind = pending.kind();
            let directionality = pending.directionality();
            let group = pending.drain_group();
            self.execute(kind, directionality, group);
        }
    }

    /// Execute one drained parameter group
    ///
    /// Readiness has already been verified; groups always hold exactly the
    /// required number of coordinates.
    fn execute(&mut self, kind: PathCommandKind, directionality: Directionality, params: CoordBuffer) {
        let current = self.sink.current_point();

        match kind {
            PathCommandKind::MoveTo => {
                let point = self.resolve(params[0], params[1], directionality);
                // Consecutive move-to coordinate pairs after the first are
                // line-to operations
                let follows_move = self
                    .previous
                    .as_ref()
                    .is_some_and(|prev| prev.kind() == PathCommandKind::MoveTo);
                if follows_move {
                    self.sink.line_to(point);
                } else {
                    self.sink.move_to(point);
                }
            }
            PathCommandKind::LineTo => {
                let point = self.resolve(params[0], params[1], directionality);
                self.sink.line_to(point);
            }
            PathCommandKind::HorizontalLineTo => {
                let x = match directionality {
                    Directionality::Absolute => params[0],
                    Directionality::Relative => current.x + params[0],
                };
                self.sink.line_to(Point::new(x, current.y));
            }
            PathCommandKind::VerticalLineTo => {
                let y = match directionality {
                    Directionality::Absolute => params[0],
                    Directionality::Relative => current.y + params[0],
                };
                self.sink.line_to(Point::new(current.x, y));
            }
            PathCommandKind::CubicCurveTo => {
                let control1 = self.resolve(params[0], params[1], directionality);
                let control2 = self.resolve(params[2], params[3], directionality);
                let end = self.resolve(params[4], params[5], directionality);
                self.sink.curve_to(end, control1, control2);
            }
            PathCommandKind::SmoothCubicCurveTo => {
                let control1 = self.reflected_cubic_control().unwrap_or(current);
                let control2 = self.resolve(params[0], params[1], directionality);
                let end = self.resolve(params[2], params[3], directionality);
                self.sink.curve_to(end, control1, control2);
            }
            PathCommandKind::QuadraticCurveTo => {
                let control = self.resolve(params[0], params[1], directionality);
                let end = self.resolve(params[2], params[3], directionality);
                self.sink.quad_curve_to(end, control);
            }
            PathCommandKind::SmoothQuadraticCurveTo => {
                let control = self.reflected_quad_control().unwrap_or(current);
                let end = self.resolve(params[0], params[1], directionality);
                self.sink.quad_curve_to(end, control);
            }
            PathCommandKind::EllipticalArc => {
                let end = self.resolve(params[5], params[6], directionality);
                // Nonzero flag values count as set
                let large_arc = params[3] != 0.0;
                let sweep = params[4] != 0.0;

                match endpoint_to_center(current, params[0], params[1], params[2], large_arc, sweep, end)
                {
                    ArcParameterization::Center {
                        center,
                        radius,
                        start_angle,
                        end_angle,
                        clockwise,
                        transform,
                    } => {
                        self.sink
                            .add_arc(center, radius, start_angle, end_angle, clockwise, transform);
                    }
                    ArcParameterization::LineTo => self.sink.line_to(end),
                    ArcParameterization::Omit => {}
                }
            }
            PathCommandKind::ClosePath => {
                self.sink.close_subpath();
            }
        }

        self.previous = Some(ExecutedCommand {
            kind,
            directionality,
            params,
        });
    }

    /// Resolve a raw coordinate pair against the current point
    fn resolve(&self, x: f64, y: f64, directionality: Directionality) -> Point {
        match directionality {
            Directionality::Absolute => Point::new(x, y),
            Directionality::Relative => self.sink.current_point() + Vec2::new(x, y),
        }
    }

    /// Reflection of the previous cubic command's second control point
    /// through the current point, when there is an eligible predecessor
    fn reflected_cubic_control(&self) -> Option<Point> {
        let prev = self.previous.as_ref()?;
        let (control_at, end_at) = match prev.kind() {
            PathCommandKind::CubicCurveTo => (2, 4),
            PathCommandKind::SmoothCubicCurveTo => (0, 2),
            _ => return None,
        };
        Some(self.reflect_previous_control(prev, control_at, end_at))
    }

    /// Reflection of the previous quadratic command's control point;
    /// smooth quadratics carry no control of their own and do not chain
    fn reflected_quad_control(&self) -> Option<Point> {
        let prev = self.previous.as_ref()?;
        if prev.kind() != PathCommandKind::QuadraticCurveTo {
            return None;
        }
        Some(self.reflect_previous_control(prev, 0, 2))
    }

    /// Mirror the predecessor's control point through the current point
    ///
    /// For a relative predecessor the stored offsets are measured from the
    /// point the path was at *before* that command ran; subtracting its
    /// end-point delta from the current point recovers that origin.
    fn reflect_previous_control(&self, prev: &ExecutedCommand, control_at: usize, end_at: usize) -> Point {
        let current = self.sink.current_point();
        let raw = Vec2::new(prev.params()[control_at], prev.params()[control_at + 1]);

        let control = match prev.directionality() {
            Directionality::Absolute => Point::new(raw.x, raw.y),
            Directionality::Relative => {
                let end_delta = Vec2::new(prev.params()[end_at], prev.params()[end_at + 1]);
                current - end_delta + raw
            }
        };

        // control1 = 2 * current - control
        current + (current - control)
    }
}

#[cfg(test)]
mod tests {
    use quill_core::{Path, PathCommand};

    use super::*;
    use crate::lexer::tokenize;

    fn parse(data: &str) -> Path {
        try_parse(data).unwrap()
    }

    fn try_parse(data: &str) -> Result<Path, PathDataError> {
        let mut path = Path::new();
        let mut interpreter = PathInterpreter::new(&mut path);
        for token in tokenize(data)? {
            interpreter.token(token)?;
        }
        interpreter.finish()?;
        Ok(path)
    }

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn end_to_end_triangle() {
        let path = parse("M 0 0 L 10 0 L 10 10 Z");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn implicit_repetition_keeps_every_group() {
        // Two coordinate groups under one letter: two line-to operations
        let path = parse("M 0 0 L 10 10 20 20");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
                PathCommand::LineTo(Point::new(20.0, 20.0)),
            ]
        );
    }

    #[test]
    fn repeated_groups_execute_in_input_order() {
        let path = parse("M 0 0 l 1 0 1 0 1 0 1 0");
        let expected = [1.0, 2.0, 3.0, 4.0];
        let lines: Vec<_> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), expected.len());
        for (p, x) in lines.iter().zip(expected) {
            assert_point(*p, x, 0.0);
        }
    }

    #[test]
    fn move_to_repetition_is_line_to() {
        // Subsequent move-to pairs under one M are line-to operations
        let path = parse("M 0 0 5 5");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(5.0, 5.0)),
            ]
        );
    }

    #[test]
    fn relative_matches_absolute() {
        let absolute = parse("M 1 1 L 4 5 C 5 6 6 7 7 8 Q 8 9 9 10");
        let relative = parse("M 1 1 l 3 4 c 1 1 2 2 3 3 q 1 1 2 2");
        assert_eq!(absolute.commands(), relative.commands());
    }

    #[test]
    fn horizontal_and_vertical_lines() {
        let path = parse("M 2 3 H 10 v 4 h -2 V 0");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(2.0, 3.0)),
                PathCommand::LineTo(Point::new(10.0, 3.0)),
                PathCommand::LineTo(Point::new(10.0, 7.0)),
                PathCommand::LineTo(Point::new(8.0, 7.0)),
                PathCommand::LineTo(Point::new(8.0, 0.0)),
            ]
        );
    }

    #[test]
    fn smooth_cubic_reflects_absolute_predecessor() {
        // control1 = 2 * (10, 0) - (10, 10) = (10, -10)
        let path = parse("M0,0 C0,10 10,10 10,0 S20,-10 20,0");
        let cubics: Vec<_> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => Some((*control1, *control2, *end)),
                _ => None,
            })
            .collect();
        assert_eq!(cubics.len(), 2);

        let (c1, c2, end) = cubics[0];
        assert_point(c1, 0.0, 10.0);
        assert_point(c2, 10.0, 10.0);
        assert_point(end, 10.0, 0.0);

        let (c1, c2, end) = cubics[1];
        assert_point(c1, 10.0, -10.0);
        assert_point(c2, 20.0, -10.0);
        assert_point(end, 20.0, 0.0);
    }

    #[test]
    fn smooth_cubic_reflects_relative_predecessor() {
        // Same geometry as the absolute case, written relatively; the
        // reflected control point must come out identical
        let absolute = parse("M0,0 C0,10 10,10 10,0 S20,-10 20,0");
        let relative = parse("M0,0 c0,10 10,10 10,0 s10,-10 10,0");
        assert_eq!(absolute.commands(), relative.commands());
    }

    #[test]
    fn smooth_cubic_chains_through_smooth_cubic() {
        let path = parse("M0,0 C0,10 10,10 10,0 S20,-10 20,0 S30,10 30,0");
        let controls: Vec<_> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::CubicTo { control1, .. } => Some(*control1),
                _ => None,
            })
            .collect();
        assert_eq!(controls.len(), 3);
        // Third command reflects the second's control2 (20,-10) through (20,0)
        assert_point(controls[2], 20.0, 10.0);
    }

    #[test]
    fn smooth_cubic_without_predecessor_uses_current_point() {
        let path = parse("M 5 5 S 10 10 15 5");
        match path.commands()[1] {
            PathCommand::CubicTo { control1, .. } => assert_point(control1, 5.0, 5.0),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn smooth_cubic_after_line_uses_current_point() {
        let path = parse("M 0 0 L 5 0 S 10 10 15 0");
        match path.commands()[2] {
            PathCommand::CubicTo { control1, .. } => assert_point(control1, 5.0, 0.0),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn smooth_quad_reflects_quad_predecessor() {
        let path = parse("M 0 0 Q 5 10 10 0 T 20 0");
        let quads: Vec<_> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::QuadTo { control, end } => Some((*control, *end)),
                _ => None,
            })
            .collect();
        assert_eq!(quads.len(), 2);
        // control = 2 * (10, 0) - (5, 10) = (15, -10)
        assert_point(quads[1].0, 15.0, -10.0);
        assert_point(quads[1].1, 20.0, 0.0);
    }

    #[test]
    fn smooth_quad_reflects_relative_quad_predecessor() {
        let absolute = parse("M 0 0 Q 5 10 10 0 T 20 0");
        let relative = parse("M 0 0 q 5 10 10 0 T 20 0");
        assert_eq!(absolute.commands(), relative.commands());
    }

    #[test]
    fn smooth_quad_without_quad_predecessor_uses_current_point() {
        let path = parse("M 0 0 L 10 0 T 20 0");
        match path.commands()[2] {
            PathCommand::QuadTo { control, .. } => assert_point(control, 10.0, 0.0),
            ref other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn arc_with_coincident_endpoints_emits_nothing() {
        let path = parse("M 5 5 A 3 3 0 0 1 5 5");
        assert_eq!(
            path.commands(),
            &[PathCommand::MoveTo(Point::new(5.0, 5.0))]
        );
    }

    #[test]
    fn arc_with_zero_radius_is_a_line() {
        let path = parse("M 0 0 A 0 5 0 0 1 10 0");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 0.0)),
            ]
        );
    }

    #[test]
    fn arc_end_point_becomes_current_point() {
        let path = parse("M 0 0 A 5 5 0 0 1 10 0");
        assert!(matches!(path.commands()[1], PathCommand::Arc { .. }));
        assert_point(path.current_point(), 10.0, 0.0);
    }

    #[test]
    fn relative_arc_resolves_end_point() {
        let path = parse("M 10 10 a 5 5 0 0 1 10 0");
        assert_point(path.current_point(), 20.0, 10.0);
    }

    #[test]
    fn nonzero_arc_flags_count_as_set() {
        let strict = parse("M 0 0 A 1 1 0 1 1 1 1");
        let loose = parse("M 0 0 A 1 1 0 2 7 1 1");
        assert_eq!(strict.commands(), loose.commands());
    }

    #[test]
    fn unsupported_letter_is_an_error() {
        assert_eq!(
            try_parse("M 0 0 X 1 1"),
            Err(PathDataError::UnsupportedCommand('X'))
        );
    }

    #[test]
    fn trailing_partial_group_is_discarded_and_reported() {
        let result = try_parse("M 0 0 L 10");
        assert_eq!(
            result,
            Err(PathDataError::InsufficientParameters {
                kind: PathCommandKind::LineTo,
                expected: 2,
                got: 1,
            })
        );
    }

    #[test]
    fn partial_group_before_next_letter_is_reported() {
        let result = try_parse("M 0 0 C 1 2 3 L 5 5");
        assert_eq!(
            result,
            Err(PathDataError::InsufficientParameters {
                kind: PathCommandKind::CubicCurveTo,
                expected: 6,
                got: 3,
            })
        );
    }

    #[test]
    fn number_before_any_command_is_an_error() {
        assert_eq!(
            try_parse("10 10 M 0 0"),
            Err(PathDataError::UnexpectedNumber(10.0))
        );
    }

    #[test]
    fn close_then_move_starts_a_fresh_subpath() {
        let path = parse("M 0 0 L 10 0 Z M 20 20 L 30 20");
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 0.0)),
                PathCommand::Close,
                PathCommand::MoveTo(Point::new(20.0, 20.0)),
                PathCommand::LineTo(Point::new(30.0, 20.0)),
            ]
        );
    }

    #[test]
    fn relative_move_after_close_starts_from_subpath_start() {
        // Close resets the cursor to the subpath start, so a relative
        // move resolves against it
        let path = parse("m 2 2 l 4 0 z m 1 1");
        assert_point(path.current_point(), 3.0, 3.0);
    }
}
