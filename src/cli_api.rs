// CLI API module - scenario inputs, solver and results shared by the CLI and bindings
use crate::constants::*;
use crate::curves::{CurveDataset, CurveSeries, RectShape, ScenarioCurves};
use crate::draining::{
    circle_area, exit_velocity, head_above_orifice, impact_time, outflow_end_time, water_heights,
};
use crate::jet::{jet_curve, jet_range};
use crate::report::{CurveSink, ScalarReading, ScalarSink};
use crate::sampling::linspace;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use tracing::{debug, info_span, trace, warn};

// Error type for scenario operations
#[derive(Debug)]
pub struct TorricelliError {
    message: String,
}

impl TorricelliError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TorricelliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for TorricelliError {}

impl From<String> for TorricelliError {
    fn from(msg: String) -> Self {
        TorricelliError { message: msg }
    }
}

impl From<&str> for TorricelliError {
    fn from(msg: &str) -> Self {
        TorricelliError { message: msg.to_string() }
    }
}

impl From<std::io::Error> for TorricelliError {
    fn from(err: std::io::Error) -> Self {
        TorricelliError { message: format!("I/O error: {}", err) }
    }
}

impl From<serde_json::Error> for TorricelliError {
    fn from(err: serde_json::Error) -> Self {
        TorricelliError { message: format!("JSON error: {}", err) }
    }
}

// Scenario input parameters (SI units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInputs {
    pub container_diameter: f64, // m
    pub orifice_diameter: f64,   // m
    pub orifice_height: f64,     // m above the ground
    pub max_time: f64,           // s
}

impl Default for ScenarioInputs {
    fn default() -> Self {
        Self {
            container_diameter: DEFAULT_CONTAINER_DIAMETER_M,
            orifice_diameter: DEFAULT_ORIFICE_DIAMETER_M,
            orifice_height: DEFAULT_ORIFICE_HEIGHT_M,
            max_time: DEFAULT_MAX_TIME_S,
        }
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64), unit: &str) -> Result<(), TorricelliError> {
    if !(min..=max).contains(&value) {
        return Err(format!(
            "{} must be between {} and {} {}, got {}",
            name, min, max, unit, value
        )
        .into());
    }
    Ok(())
}

impl ScenarioInputs {
    /// Reject anything outside the ranges the input layer accepts.
    pub fn validate(&self) -> Result<(), TorricelliError> {
        check_range("container diameter", self.container_diameter, CONTAINER_DIAMETER_RANGE, "m")?;
        check_range("orifice diameter", self.orifice_diameter, ORIFICE_DIAMETER_RANGE, "m")?;
        check_range("orifice height", self.orifice_height, ORIFICE_HEIGHT_RANGE, "m")?;
        check_range("max time", self.max_time, MAX_TIME_RANGE, "s")?;

        if self.max_time.fract() != 0.0 {
            return Err(format!("max time must be a whole number of seconds, got {}", self.max_time).into());
        }
        if self.orifice_diameter >= self.container_diameter {
            return Err(format!(
                "orifice diameter ({} m) must be smaller than container diameter ({} m)",
                self.orifice_diameter, self.container_diameter
            )
            .into());
        }
        Ok(())
    }

    /// Load inputs from a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TorricelliError> {
        Ok(serde_json::from_str(json)?)
    }
}

// Scalar results of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub exit_velocity: f64,    // m/s at t = 0
    pub max_range: f64,        // m at t = 0
    pub flow_rate: f64,        // m³/s at t = 0
    pub total_liters: f64,     // nominal full capacity
    pub impact_time: f64,      // s
    pub container_area: f64,   // m²
    pub orifice_area: f64,     // m²
    pub outflow_end_time: Option<f64>, // s
}

impl ScenarioSummary {
    /// The four values shown next to the charts, in display order
    pub fn readings(&self) -> Vec<ScalarReading> {
        vec![
            ScalarReading::new("exit_velocity", "Exit velocity", self.exit_velocity, "m/s"),
            ScalarReading::new("max_range", "Max range", self.max_range, "m"),
            ScalarReading::new("flow_rate", "Orifice flow rate", self.flow_rate, "m³/s"),
            ScalarReading::new("total_liters", "Total container volume", self.total_liters, "l"),
        ]
    }
}

// Full scenario result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub inputs: ScenarioInputs,
    pub times: Vec<f64>,
    pub heads: Vec<f64>,
    pub exit_velocities: Vec<f64>,
    pub ranges: Vec<f64>,
    pub flow_rates: Vec<f64>,
    pub summary: ScenarioSummary,
    pub curves: ScenarioCurves,
}

impl ScenarioResult {
    /// Feed the summary readings and the four charts to the given sinks.
    pub fn publish<S, C>(&self, scalars: &mut S, curves: &mut C) -> Result<(), TorricelliError>
    where
        S: ScalarSink + ?Sized,
        C: CurveSink + ?Sized,
    {
        for reading in self.summary.readings() {
            scalars.scalar(&reading)?;
        }
        for dataset in self.curves.iter() {
            curves.curve(dataset)?;
        }
        Ok(())
    }

    /// `publish` for a report that is both a scalar and a curve sink.
    pub fn publish_report<R>(&self, report: &mut R) -> Result<(), TorricelliError>
    where
        R: ScalarSink + CurveSink + ?Sized,
    {
        for reading in self.summary.readings() {
            report.scalar(&reading)?;
        }
        for dataset in self.curves.iter() {
            report.curve(dataset)?;
        }
        Ok(())
    }
}

// Scenario solver
pub struct ScenarioSolver {
    inputs: ScenarioInputs,
    time_samples: usize,
}

impl ScenarioSolver {
    pub fn new(inputs: ScenarioInputs) -> Self {
        Self {
            inputs,
            time_samples: DEFAULT_TIME_SAMPLES,
        }
    }

    pub fn set_time_samples(&mut self, samples: usize) {
        self.time_samples = samples.max(2);
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn solve(&self) -> ScenarioResult {
        let _span = info_span!("solve_scenario").entered();
        let inputs = self.inputs;
        debug!(?inputs, samples = self.time_samples, "solving draining scenario");

        // Geometry
        let container_area = circle_area(inputs.container_diameter);
        let orifice_area = circle_area(inputs.orifice_diameter);

        // Level and head over time
        let times = linspace(0.0, inputs.max_time, self.time_samples);
        let heads: Vec<f64> = water_heights(&times, container_area, orifice_area)
            .into_iter()
            .map(|h| head_above_orifice(h, inputs.orifice_height))
            .collect();

        // Jet
        let exit_velocities: Vec<f64> = heads.iter().map(|&h| exit_velocity(h)).collect();
        let t_impact = impact_time(inputs.orifice_height);
        let ranges: Vec<f64> = exit_velocities.iter().map(|&v| jet_range(v, t_impact)).collect();
        let flow_rates: Vec<f64> = exit_velocities.iter().map(|&v| orifice_area * v).collect();

        let total_liters = container_area * INITIAL_WATER_HEIGHT_M * CUBIC_METERS_TO_LITERS;
        let outflow_end = outflow_end_time(container_area, orifice_area, inputs.orifice_height);
        match outflow_end {
            None => warn!(
                orifice_height = inputs.orifice_height,
                "orifice is at or above the initial water level, no outflow"
            ),
            Some(t_end) if t_end <= inputs.max_time => {
                debug!(t_end, "outflow stops within the simulated window")
            }
            Some(t_end) => trace!(t_end, "outflow continues past the simulated window"),
        }

        let summary = ScenarioSummary {
            exit_velocity: exit_velocities[0],
            max_range: ranges[0],
            flow_rate: flow_rates[0],
            total_liters,
            impact_time: t_impact,
            container_area,
            orifice_area,
            outflow_end_time: outflow_end,
        };

        let curves = ScenarioCurves {
            head_over_time: CurveDataset::new(
                "head_over_time",
                "Water height above the orifice over time",
                "Time (s)",
                "Height above orifice (m)",
            )
            .with_series(CurveSeries::from_samples("Height above orifice", &times, &heads)),
            range_over_time: CurveDataset::new(
                "range_over_time",
                "Jet range over time",
                "Time (s)",
                "Jet range (m)",
            )
            .with_series(CurveSeries::from_samples("Jet range", &times, &ranges)),
            container_snapshot: self.container_snapshot(&summary),
            checkpoint_trajectories: self.checkpoint_trajectories(t_impact),
        };

        ScenarioResult {
            inputs,
            times,
            heads,
            exit_velocities,
            ranges,
            flow_rates,
            summary,
            curves,
        }
    }

    // Tank outline at full level plus the jet at t = 0
    fn container_snapshot(&self, summary: &ScenarioSummary) -> CurveDataset {
        let mut dataset = CurveDataset::new(
            "container_snapshot",
            "Container with outflowing jet",
            "Horizontal distance (m)",
            "Height (m)",
        )
        .with_shape(RectShape {
            x0: -TANK_SNAPSHOT_WIDTH_M,
            y0: 0.0,
            x1: 0.0,
            y1: INITIAL_WATER_HEIGHT_M,
        })
        .with_y_range(0.0, INITIAL_WATER_HEIGHT_M);

        if let Some(points) = jet_curve(
            self.inputs.orifice_height,
            summary.exit_velocity,
            summary.max_range,
            SNAPSHOT_TRAJECTORY_POINTS,
        ) {
            dataset = dataset.with_series(CurveSeries::new("Jet trajectory", points));
        }
        dataset
    }

    // One jet curve per fill level still above the orifice
    fn checkpoint_trajectories(&self, t_impact: f64) -> CurveDataset {
        let mut dataset = CurveDataset::new(
            "checkpoint_trajectories",
            "Jet trajectory at different fill levels",
            "Horizontal distance (m)",
            "Water height (m)",
        )
        .with_y_range(0.0, INITIAL_WATER_HEIGHT_M);

        for fraction in CHECKPOINT_FILL_FRACTIONS {
            let level = INITIAL_WATER_HEIGHT_M * fraction;
            if level <= self.inputs.orifice_height {
                debug!(fraction, level, "fill level at or below the orifice, skipping checkpoint");
                continue;
            }

            let velocity = exit_velocity(level - self.inputs.orifice_height);
            let range = jet_range(velocity, t_impact);
            if let Some(points) = jet_curve(
                self.inputs.orifice_height,
                velocity,
                range,
                CHECKPOINT_TRAJECTORY_POINTS,
            ) {
                let label = format!("{:.0}% of initial height", fraction * 100.0);
                dataset = dataset.with_series(CurveSeries::new(label, points));
            }
        }
        dataset
    }
}

/// Validate the inputs and solve with the default sampling.
pub fn compute_scenario(inputs: ScenarioInputs) -> Result<ScenarioResult, TorricelliError> {
    inputs.validate()?;
    Ok(ScenarioSolver::new(inputs).solve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draining::{time_to_empty, water_height};
    use std::f64::consts::PI;

    fn inputs(d_big: f64, d_small: f64, h_orifice: f64, t_max: f64) -> ScenarioInputs {
        ScenarioInputs {
            container_diameter: d_big,
            orifice_diameter: d_small,
            orifice_height: h_orifice,
            max_time: t_max,
        }
    }

    #[test]
    fn test_default_scenario_summary() {
        let result = compute_scenario(ScenarioInputs::default()).unwrap();
        let s = result.summary;

        assert!((s.container_area - 0.19635).abs() < 1e-5);
        assert!((s.orifice_area - 1.9635e-5).abs() < 1e-9);

        let v0 = (2.0 * 9.81 * (10.0_f64 - 0.1)).sqrt();
        assert!((s.exit_velocity - v0).abs() < 1e-9);
        assert!((s.exit_velocity - 13.94).abs() < 0.01);

        let t_impact = (2.0 * 0.1 / 9.81_f64).sqrt();
        assert!((s.impact_time - t_impact).abs() < 1e-12);
        assert!((s.impact_time - 0.1428).abs() < 1e-4);

        assert!((s.max_range - v0 * t_impact).abs() < 1e-9);
        assert!((s.flow_rate - s.orifice_area * v0).abs() < 1e-12);
        assert!((s.total_liters - 1963.50).abs() < 0.01);
    }

    #[test]
    fn test_total_liters_independent_of_orifice_and_time() {
        let base = compute_scenario(inputs(0.8, 0.005, 0.1, 30.0)).unwrap();
        let other = compute_scenario(inputs(0.8, 0.05, 7.5, 900.0)).unwrap();
        let expected = PI * 0.4 * 0.4 * 10.0 * 1000.0;
        assert_eq!(base.summary.total_liters, other.summary.total_liters);
        assert!((base.summary.total_liters - expected).abs() < 1e-9);
    }

    #[test]
    fn test_series_lengths_and_time_grid() {
        let result = compute_scenario(ScenarioInputs::default()).unwrap();
        assert_eq!(result.times.len(), DEFAULT_TIME_SAMPLES);
        assert_eq!(result.heads.len(), DEFAULT_TIME_SAMPLES);
        assert_eq!(result.exit_velocities.len(), DEFAULT_TIME_SAMPLES);
        assert_eq!(result.ranges.len(), DEFAULT_TIME_SAMPLES);
        assert_eq!(result.flow_rates.len(), DEFAULT_TIME_SAMPLES);
        assert_eq!(result.times[0], 0.0);
        assert_eq!(*result.times.last().unwrap(), 30.0);
    }

    #[test]
    fn test_heads_clamped_and_non_increasing() {
        // Large orifice, long window: the level passes the orifice well before T
        let result = compute_scenario(inputs(0.1, 0.05, 2.0, 1000.0)).unwrap();
        assert!(result.heads.iter().all(|&h| h >= 0.0));
        assert!(result.heads.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*result.heads.last().unwrap(), 0.0);
        assert_eq!(*result.exit_velocities.last().unwrap(), 0.0);
        assert_eq!(*result.ranges.last().unwrap(), 0.0);
        assert!(result.summary.outflow_end_time.unwrap() < 1000.0);
    }

    #[test]
    fn test_no_quantity_negative() {
        let result = compute_scenario(inputs(0.1, 0.05, 9.0, 1000.0)).unwrap();
        for series in [&result.heads, &result.exit_velocities, &result.ranges, &result.flow_rates] {
            assert!(series.iter().all(|&v| v >= 0.0 && v.is_finite()));
        }
    }

    #[test]
    fn test_heads_follow_water_height() {
        let params = inputs(0.5, 0.005, 0.1, 30.0);
        let result = compute_scenario(params).unwrap();
        let (a_big, a_small) = (result.summary.container_area, result.summary.orifice_area);
        for (t, head) in result.times.iter().zip(&result.heads).step_by(97) {
            let expected = (water_height(*t, a_big, a_small) - 0.1).max(0.0);
            assert_eq!(*head, expected);
        }
        assert!(time_to_empty(a_big, a_small) > 30.0);
    }

    #[test]
    fn test_checkpoints_skip_levels_below_orifice() {
        let result = compute_scenario(inputs(0.5, 0.005, 4.9, 30.0)).unwrap();
        let checkpoints = &result.curves.checkpoint_trajectories;

        assert_eq!(checkpoints.series.len(), 3);
        for label in ["100% of initial height", "75% of initial height", "50% of initial height"] {
            let series = checkpoints.series_named(label).unwrap();
            assert_eq!(series.points.len(), CHECKPOINT_TRAJECTORY_POINTS);
        }
        assert!(checkpoints.series_named("25% of initial height").is_none());
    }

    #[test]
    fn test_checkpoints_with_orifice_at_half_height() {
        // The 50% level equals the orifice height exactly: no head, no curve
        let result = compute_scenario(inputs(0.5, 0.005, 5.0, 30.0)).unwrap();
        let checkpoints = &result.curves.checkpoint_trajectories;

        assert!(checkpoints.series_named("25% of initial height").is_none());
        assert!(checkpoints.series_named("50% of initial height").is_none());
        assert!(checkpoints.series_named("75% of initial height").is_some());
        assert!(checkpoints.series_named("100% of initial height").is_some());
        assert!(checkpoints.series.iter().all(|s| !s.points.is_empty()));
    }

    #[test]
    fn test_checkpoint_at_exact_orifice_level_is_skipped() {
        let result = compute_scenario(inputs(0.5, 0.005, 7.5, 30.0)).unwrap();
        let checkpoints = &result.curves.checkpoint_trajectories;
        assert_eq!(checkpoints.series.len(), 1);
        assert!(checkpoints.series_named("100% of initial height").is_some());
    }

    #[test]
    fn test_checkpoint_curves_land_at_their_range() {
        let result = compute_scenario(inputs(0.5, 0.005, 2.0, 30.0)).unwrap();
        let t_impact = result.summary.impact_time;
        let series = result
            .curves
            .checkpoint_trajectories
            .series_named("50% of initial height")
            .unwrap();
        let v = (2.0 * G_ACCEL_MPS2 * 3.0).sqrt();
        let last = series.points.last().unwrap();
        assert!((last.x - v * t_impact).abs() < 1e-9);
        assert!(last.y.abs() < 1e-9);
        assert_eq!(series.points[0].y, 2.0);
    }

    #[test]
    fn test_container_snapshot_contents() {
        let result = compute_scenario(ScenarioInputs::default()).unwrap();
        let snapshot = &result.curves.container_snapshot;

        assert_eq!(
            snapshot.shapes,
            vec![RectShape { x0: -1.0, y0: 0.0, x1: 0.0, y1: 10.0 }]
        );
        assert_eq!(snapshot.y_range, Some((0.0, 10.0)));
        assert_eq!(snapshot.series.len(), 1);

        let jet = &snapshot.series[0];
        assert_eq!(jet.points.len(), SNAPSHOT_TRAJECTORY_POINTS);
        assert_eq!(jet.points[0].y, 0.1);
        assert!((jet.points.last().unwrap().x - result.summary.max_range).abs() < 1e-12);
    }

    #[test]
    fn test_orifice_at_initial_level_has_no_jet() {
        let result = compute_scenario(inputs(0.5, 0.005, 10.0, 30.0)).unwrap();
        assert_eq!(result.summary.exit_velocity, 0.0);
        assert_eq!(result.summary.max_range, 0.0);
        assert_eq!(result.summary.flow_rate, 0.0);
        assert!(result.summary.outflow_end_time.is_none());
        assert!(result.curves.container_snapshot.series.is_empty());
        assert_eq!(result.curves.container_snapshot.shapes.len(), 1);
        assert!(result.curves.checkpoint_trajectories.series.is_empty());
    }

    #[test]
    fn test_time_curves_share_time_axis() {
        let result = compute_scenario(ScenarioInputs::default()).unwrap();
        let heads = &result.curves.head_over_time.series[0];
        let ranges = &result.curves.range_over_time.series[0];
        assert_eq!(heads.points.len(), result.times.len());
        assert_eq!(ranges.points[10].x, result.times[10]);
        assert_eq!(ranges.points[10].y, result.ranges[10]);
        assert_eq!(heads.points[10].y, result.heads[10]);
    }

    #[test]
    fn test_solve_is_idempotent() {
        let params = inputs(0.37, 0.013, 3.3, 250.0);
        let first = compute_scenario(params).unwrap();
        let second = compute_scenario(params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_time_samples() {
        let mut solver = ScenarioSolver::new(ScenarioInputs::default());
        solver.set_time_samples(11);
        let result = solver.solve();
        assert_eq!(result.times.len(), 11);
        assert_eq!(result.times[1], 3.0);

        solver.set_time_samples(0);
        assert_eq!(solver.solve().times.len(), 2);
    }

    #[test]
    fn test_validate_accepts_boundaries() {
        assert!(inputs(0.1, 0.001, 0.1, 5.0).validate().is_ok());
        assert!(inputs(1.0, 0.05, 10.0, 1000.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = inputs(0.05, 0.005, 0.1, 30.0).validate().unwrap_err();
        assert!(err.to_string().contains("container diameter"));

        assert!(inputs(0.5, 0.0, 0.1, 30.0).validate().is_err());
        assert!(inputs(0.5, 0.06, 0.1, 30.0).validate().is_err());
        assert!(inputs(0.5, 0.005, 0.0, 30.0).validate().is_err());
        assert!(inputs(0.5, 0.005, 10.5, 30.0).validate().is_err());
        assert!(inputs(0.5, 0.005, 0.1, 4.0).validate().is_err());
        assert!(inputs(0.5, 0.005, 0.1, 1001.0).validate().is_err());
        assert!(inputs(f64::NAN, 0.005, 0.1, 30.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_fractional_seconds() {
        let err = inputs(0.5, 0.005, 0.1, 30.5).validate().unwrap_err();
        assert!(err.message().contains("whole number"));
    }

    #[test]
    fn test_from_json_partial_config() {
        let parsed = ScenarioInputs::from_json(r#"{"orifice_height": 5.0, "max_time": 120}"#).unwrap();
        assert_eq!(parsed.orifice_height, 5.0);
        assert_eq!(parsed.max_time, 120.0);
        assert_eq!(parsed.container_diameter, DEFAULT_CONTAINER_DIAMETER_M);
        assert_eq!(parsed.orifice_diameter, DEFAULT_ORIFICE_DIAMETER_M);
    }

    #[test]
    fn test_from_json_invalid_document() {
        let err = ScenarioInputs::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_summary_readings_order_and_format() {
        let result = compute_scenario(ScenarioInputs::default()).unwrap();
        let readings = result.summary.readings();
        let keys: Vec<&str> = readings.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["exit_velocity", "max_range", "flow_rate", "total_liters"]);
        assert_eq!(readings[3].formatted(), "1963.50 l");
        assert_eq!(readings[2].formatted(), "0.00 m³/s");
    }
}
