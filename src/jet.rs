//! Horizontal water jet leaving the orifice.
//!
//! Without drag the jet is a horizontal projectile: x = v·t, y = -½·g·t²,
//! which gives the drop y(x) = -g·x² / (2·v²) below the orifice.

use crate::constants::{G_ACCEL_MPS2, MIN_VELOCITY_THRESHOLD};
use crate::curves::CurvePoint;
use crate::sampling::linspace;

/// Vertical drop (m, negative downwards) at horizontal distance `x_m` for exit speed `velocity_mps`.
///
/// Not finite for a zero speed; use `jet_curve` when the speed may be zero.
pub fn jet_drop(x_m: f64, velocity_mps: f64) -> f64 {
    -(G_ACCEL_MPS2 * x_m * x_m) / (2.0 * velocity_mps * velocity_mps)
}

/// Horizontal distance covered before hitting the ground
pub fn jet_range(velocity_mps: f64, impact_time_s: f64) -> f64 {
    velocity_mps * impact_time_s
}

/// Sample the jet from the orifice (x = 0) out to `range_m`.
///
/// Heights are absolute: `launch_height_m` plus the drop. Returns `None` when
/// the speed is too small for the jet to exist.
pub fn jet_curve(
    launch_height_m: f64,
    velocity_mps: f64,
    range_m: f64,
    points: usize,
) -> Option<Vec<CurvePoint>> {
    if !(velocity_mps > MIN_VELOCITY_THRESHOLD) {
        return None;
    }

    let curve = linspace(0.0, range_m, points)
        .into_iter()
        .map(|x| CurvePoint::new(x, launch_height_m + jet_drop(x, velocity_mps)))
        .collect();
    Some(curve)
}
