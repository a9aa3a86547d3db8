//! Container draining under gravity.
//!
//! The water level follows h(t) = sqrt(max(h0² - 2·g·a·t/A, 0)) for a cylinder
//! of cross-section `A` emptying through an orifice of cross-section `a`.
//! Exit speed comes from Torricelli's law, v = sqrt(2·g·head), where the head
//! is the level above the orifice.

use std::f64::consts::PI;

use crate::constants::{G_ACCEL_MPS2, INITIAL_WATER_HEIGHT_M};

/// Area of a circle from its diameter
pub fn circle_area(diameter_m: f64) -> f64 {
    PI * (diameter_m / 2.0).powi(2)
}

/// Water level (m) at time `time_s` for a full container of area
/// `container_area` draining through an orifice of area `orifice_area`.
///
/// The radicand is clamped at zero before the square root, so the level reads
/// 0 once the container is empty instead of NaN.
pub fn water_height(time_s: f64, container_area: f64, orifice_area: f64) -> f64 {
    let radicand = INITIAL_WATER_HEIGHT_M * INITIAL_WATER_HEIGHT_M
        - 2.0 * G_ACCEL_MPS2 * orifice_area * time_s / container_area;
    radicand.max(0.0).sqrt()
}

/// Element-wise `water_height` over a series of instants
pub fn water_heights(times: &[f64], container_area: f64, orifice_area: f64) -> Vec<f64> {
    times
        .iter()
        .map(|&t| water_height(t, container_area, orifice_area))
        .collect()
}

/// Level above the orifice, never negative
pub fn head_above_orifice(water_height_m: f64, orifice_height_m: f64) -> f64 {
    (water_height_m - orifice_height_m).max(0.0)
}

/// Torricelli exit speed (m/s) for a given head
pub fn exit_velocity(head_m: f64) -> f64 {
    (2.0 * G_ACCEL_MPS2 * head_m.max(0.0)).sqrt()
}

/// Time (s) for water leaving the orifice horizontally to reach the ground
pub fn impact_time(orifice_height_m: f64) -> f64 {
    (2.0 * orifice_height_m.max(0.0) / G_ACCEL_MPS2).sqrt()
}

/// Instant from which `water_height` stays at zero: h0²·A / (2·g·a)
///
/// Infinite when the orifice area is zero.
pub fn time_to_empty(container_area: f64, orifice_area: f64) -> f64 {
    INITIAL_WATER_HEIGHT_M * INITIAL_WATER_HEIGHT_M * container_area
        / (2.0 * G_ACCEL_MPS2 * orifice_area)
}

/// Instant at which the level reaches the orifice and outflow stops.
///
/// `None` when the orifice sits at or above the initial level (no outflow at all).
pub fn outflow_end_time(container_area: f64, orifice_area: f64, orifice_height_m: f64) -> Option<f64> {
    if orifice_height_m >= INITIAL_WATER_HEIGHT_M {
        return None;
    }
    let h_o = orifice_height_m.max(0.0);
    Some(
        (INITIAL_WATER_HEIGHT_M * INITIAL_WATER_HEIGHT_M - h_o * h_o) * container_area
            / (2.0 * G_ACCEL_MPS2 * orifice_area),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::linspace;

    fn areas() -> (f64, f64) {
        (circle_area(0.5), circle_area(0.005))
    }

    #[test]
    fn test_circle_area() {
        assert!((circle_area(0.5) - 0.19634954).abs() < 1e-8);
        assert!((circle_area(0.005) - 1.9634954e-5).abs() < 1e-12);
    }

    #[test]
    fn test_water_height_starts_at_initial_level() {
        for (d_big, d_small) in [(0.1, 0.001), (0.5, 0.005), (1.0, 0.05)] {
            let h = water_height(0.0, circle_area(d_big), circle_area(d_small));
            assert_eq!(h, INITIAL_WATER_HEIGHT_M);
        }
    }

    #[test]
    fn test_water_height_non_negative_and_non_increasing() {
        let (a_big, a_small) = (circle_area(0.1), circle_area(0.05));
        let t_empty = time_to_empty(a_big, a_small);
        let times = linspace(0.0, t_empty * 3.0, 500);
        let heights = water_heights(&times, a_big, a_small);

        assert!(heights.iter().all(|&h| h >= 0.0 && h.is_finite()));
        assert!(heights.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_water_height_zero_after_empty_time() {
        let (a_big, a_small) = areas();
        let t_empty = time_to_empty(a_big, a_small);
        // Rounding may leave a tiny positive radicand exactly at t_empty
        assert!(water_height(t_empty, a_big, a_small) < 1e-6);
        assert_eq!(water_height(t_empty * 1.5, a_big, a_small), 0.0);
        assert_eq!(water_height(t_empty * 100.0, a_big, a_small), 0.0);
        assert!(water_height(t_empty * 0.99, a_big, a_small) > 0.0);
    }

    #[test]
    fn test_water_height_zero_orifice_never_drains() {
        let a_big = circle_area(0.5);
        assert_eq!(water_height(1.0e6, a_big, 0.0), INITIAL_WATER_HEIGHT_M);
        assert!(time_to_empty(a_big, 0.0).is_infinite());
    }

    #[test]
    fn test_head_above_orifice_clamped() {
        assert!((head_above_orifice(10.0, 0.1) - 9.9).abs() < 1e-12);
        assert_eq!(head_above_orifice(2.5, 5.0), 0.0);
        assert_eq!(head_above_orifice(0.0, 0.1), 0.0);
    }

    #[test]
    fn test_exit_velocity_torricelli() {
        let v = exit_velocity(9.9);
        assert!((v - 13.937).abs() < 1e-3);
        assert_eq!(exit_velocity(0.0), 0.0);
        assert_eq!(exit_velocity(-1.0), 0.0);
    }

    #[test]
    fn test_impact_time() {
        assert!((impact_time(0.1) - 0.142784).abs() < 1e-5);
        assert_eq!(impact_time(0.0), 0.0);
    }

    #[test]
    fn test_outflow_end_time() {
        let (a_big, a_small) = areas();
        let t_end = outflow_end_time(a_big, a_small, 5.0).unwrap();
        let level = water_height(t_end, a_big, a_small);
        assert!((level - 5.0).abs() < 1e-6);

        assert!(outflow_end_time(a_big, a_small, 10.0).is_none());
        assert!(outflow_end_time(a_big, a_small, 12.0).is_none());
    }

    #[test]
    fn test_outflow_end_time_bounded_by_empty_time() {
        let (a_big, a_small) = areas();
        let t_end = outflow_end_time(a_big, a_small, 0.1).unwrap();
        assert!(t_end < time_to_empty(a_big, a_small));
    }
}
