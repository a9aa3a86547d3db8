use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::constants::{
    CONTAINER_DIAMETER_RANGE, MAX_TIME_RANGE, ORIFICE_DIAMETER_RANGE, ORIFICE_HEIGHT_RANGE,
};
use crate::cli_api::{compute_scenario, ScenarioInputs, ScenarioSummary, TorricelliError};
use crate::sampling::linspace;

/// The scenario parameter varied by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParameter {
    ContainerDiameter,
    OrificeDiameter,
    OrificeHeight,
    MaxTime,
}

impl SweepParameter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "container-diameter" => Some(SweepParameter::ContainerDiameter),
            "orifice-diameter" => Some(SweepParameter::OrificeDiameter),
            "orifice-height" => Some(SweepParameter::OrificeHeight),
            "max-time" => Some(SweepParameter::MaxTime),
            _ => None,
        }
    }

    /// Range the input layer accepts for this parameter
    pub fn limits(&self) -> (f64, f64) {
        match self {
            SweepParameter::ContainerDiameter => CONTAINER_DIAMETER_RANGE,
            SweepParameter::OrificeDiameter => ORIFICE_DIAMETER_RANGE,
            SweepParameter::OrificeHeight => ORIFICE_HEIGHT_RANGE,
            SweepParameter::MaxTime => MAX_TIME_RANGE,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SweepParameter::MaxTime => "s",
            _ => "m",
        }
    }

    /// Copy of `base` with this parameter set to `value`
    pub fn apply(&self, base: &ScenarioInputs, value: f64) -> ScenarioInputs {
        let mut inputs = *base;
        match self {
            SweepParameter::ContainerDiameter => inputs.container_diameter = value,
            SweepParameter::OrificeDiameter => inputs.orifice_diameter = value,
            SweepParameter::OrificeHeight => inputs.orifice_height = value,
            SweepParameter::MaxTime => inputs.max_time = value,
        }
        inputs
    }
}

impl std::fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SweepParameter::ContainerDiameter => "container-diameter",
            SweepParameter::OrificeDiameter => "orifice-diameter",
            SweepParameter::OrificeHeight => "orifice-height",
            SweepParameter::MaxTime => "max-time",
        };
        write!(f, "{}", name)
    }
}

/// One sweep point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub value: f64,
    pub summary: ScenarioSummary,
}

/// `steps` evenly spaced values from `from` to `to`.
///
/// Max-time grids are rounded to whole seconds, matching what the input layer accepts.
pub fn sweep_values(parameter: SweepParameter, from: f64, to: f64, steps: usize) -> Vec<f64> {
    let values = linspace(from, to, steps);
    match parameter {
        SweepParameter::MaxTime => values.into_iter().map(f64::round).collect(),
        _ => values,
    }
}

/// Solve the scenario once per value, in parallel. Rows come back in input order.
pub fn run_sweep(
    base: &ScenarioInputs,
    parameter: SweepParameter,
    values: &[f64],
) -> Result<Vec<SweepRow>, TorricelliError> {
    if values.is_empty() {
        return Err("Sweep needs at least one value".into());
    }
    let _span = info_span!("run_sweep").entered();
    debug!(%parameter, count = values.len(), "running parameter sweep");

    values
        .par_iter()
        .map(|&value| -> Result<SweepRow, TorricelliError> {
            let inputs = parameter.apply(base, value);
            let result = compute_scenario(inputs).map_err(|e| {
                TorricelliError::from(format!("{} = {}: {}", parameter, value, e))
            })?;
            Ok(SweepRow {
                value,
                summary: result.summary,
            })
        })
        .collect()
}
