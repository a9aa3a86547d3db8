//! # Torricelli Engine
//!
//! Draining of a cylindrical tank through a small orifice (Torricelli's law)
//! and the trajectory of the escaping water jet.
//!
//! ```
//! use torricelli_engine::{compute_scenario, ScenarioInputs};
//!
//! let result = compute_scenario(ScenarioInputs::default()).unwrap();
//! assert!(result.summary.exit_velocity > 13.0);
//! assert_eq!(result.curves.iter().count(), 4);
//! ```

// Re-export the main types and functions
pub use cli_api::{
    compute_scenario, ScenarioInputs, ScenarioResult, ScenarioSolver, ScenarioSummary,
    TorricelliError,
};
pub use curves::{CurveDataset, CurvePoint, CurveSeries, RectShape, ScenarioCurves};
pub use draining::{exit_velocity, impact_time, water_height, water_heights};
pub use jet::{jet_curve, jet_drop};
pub use plot::SvgChartSink;
pub use report::{CsvReport, CurveSink, JsonReport, ScalarReading, ScalarSink, TableReport};
pub use sweep::{run_sweep, sweep_values, SweepParameter, SweepRow};

// Module declarations
pub mod cli_api;
pub mod constants;
pub mod curves;
pub mod draining;
pub mod ffi;
pub mod jet;
pub mod plot;
pub mod report;
mod sampling;
pub mod sweep;

#[cfg(feature = "wasm")]
pub mod wasm;
