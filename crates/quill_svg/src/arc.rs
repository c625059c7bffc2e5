//! Elliptical arc endpoint-to-center conversion
//!
//! SVG specifies arcs by their endpoints plus radii and flags; sinks want a
//! center, angles, and a direction. This module implements the W3C
//! conversion (SVG 2 implementation notes, B.2.4) with the out-of-range
//! corrections those notes call for: radii are made positive, scaled up when
//! no ellipse fits, and degenerate inputs fall back to a line or nothing.
//!
//! The result describes a *circular* arc of radius `max(rx, ry)` under an
//! affine transform (translate to center, rotate by the x-axis rotation,
//! scale the minor axis down), so one transformed unit arc renders an
//! ellipse of any axis ratio.

use std::f64::consts::PI;

use quill_core::{Affine2D, Point, Vec2};

/// Residual floating error allowance for the second radius correction
const RADIUS_NUDGE: f64 = 1e-9;

/// Outcome of converting an arc's endpoint parameterization
#[derive(Clone, Debug, PartialEq)]
pub enum ArcParameterization {
    /// Center parameterization of the arc
    Center {
        center: Point,
        /// The larger of the two (corrected) radii
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        /// Angular direction; the opposite of the sweep flag
        clockwise: bool,
        /// Maps `(radius * cos t, radius * sin t)` onto the ellipse
        transform: Affine2D,
    },
    /// Degenerate radius; treat the arc as a line to the end point
    LineTo,
    /// Coincident endpoints; emit nothing
    Omit,
}

/// Convert an arc from endpoint to center parameterization
///
/// `rotation_deg` is the ellipse's x-axis rotation in degrees; `large_arc`
/// and `sweep` are the SVG flags.
pub fn endpoint_to_center(
    from: Point,
    rx: f64,
    ry: f64,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> ArcParameterization {
    // Coincident endpoints draw nothing
    if from == to {
        return ArcParameterization::Omit;
    }

    // A zero radius degrades the arc to a straight line
    if rx == 0.0 || ry == 0.0 {
        return ArcParameterization::LineTo;
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();
    let phi = (rotation_deg % 360.0).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Rotate the midpoint-relative displacement into the ellipse's frame
    let mid_x = (from.x - to.x) / 2.0;
    let mid_y = (from.y - to.y) / 2.0;
    let x1 = cos_phi * mid_x + sin_phi * mid_y;
    let y1 = -sin_phi * mid_x + cos_phi * mid_y;

    // Scale the radii up until the local-frame point can lie on the
    // ellipse. One pass suffices in exact arithmetic; a second pass with a
    // small nudge absorbs the floating-point residue.
    let lambda = (x1 / rx).powi(2) + (y1 / ry).powi(2);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;

        let lambda = (x1 / rx).powi(2) + (y1 / ry).powi(2);
        if lambda > 1.0 {
            let s = lambda.sqrt() + RADIUS_NUDGE;
            rx *= s;
            ry *= s;
        }
    }

    // Closed-form local center; the radicand can only dip below zero
    // through rounding, in which case the center sits on the midpoint
    let num = (rx * ry).powi(2) - (rx * y1).powi(2) - (ry * x1).powi(2);
    let den = (rx * y1).powi(2) + (ry * x1).powi(2);
    let mut k = (num / den).sqrt();
    if k.is_nan() {
        k = 0.0;
    }
    if sweep == large_arc {
        k = -k;
    }
    let cx1 = k * rx * y1 / ry;
    let cy1 = -k * ry * x1 / rx;

    // Rotate the local center back into the global frame
    let center = Point::new(
        cos_phi * cx1 - sin_phi * cy1 + (from.x + to.x) / 2.0,
        sin_phi * cx1 + cos_phi * cy1 + (from.y + to.y) / 2.0,
    );

    // Angles in the ellipse's unit-circle frame
    let u = Vec2::new((x1 - cx1) / rx, (y1 - cy1) / ry);
    let v = Vec2::new((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let start_angle = vector_angle(Vec2::new(1.0, 0.0), u);
    let mut delta = vector_angle(u, v);

    // Match the angular span to the sweep direction
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    // Unit-arc description: the larger radius maps to 1, the smaller to
    // its ratio, so the sink draws one transformed circular arc
    let (radius, axis_scale) = if rx >= ry {
        (rx, Affine2D::scale(1.0, ry / rx))
    } else {
        (ry, Affine2D::scale(rx / ry, 1.0))
    };
    let transform = Affine2D::translation(center.x, center.y)
        .then(&Affine2D::rotation(phi))
        .then(&axis_scale);

    ArcParameterization::Center {
        center,
        radius,
        start_angle,
        end_angle: start_angle + delta,
        clockwise: !sweep,
        transform,
    }
}

/// Signed angle from `u` to `v`, with the cosine snapped at its bounds so
/// rounding never produces NaN from `acos`
fn vector_angle(u: Vec2, v: Vec2) -> f64 {
    let ratio = u.dot(v) / (u.length() * v.length());
    let angle = if ratio <= -1.0 {
        PI
    } else if ratio >= 1.0 {
        0.0
    } else {
        ratio.acos()
    };
    if u.cross(v) < 0.0 {
        -angle
    } else {
        angle
    }
}
