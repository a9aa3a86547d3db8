/// Physical and sampling constants used by the draining model

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.81;

/// Water level in a full container (m)
///
/// Every scenario starts from this height; only the container and orifice
/// geometry vary between runs.
pub const INITIAL_WATER_HEIGHT_M: f64 = 10.0;

/// Conversion factor: cubic meters to liters
pub const CUBIC_METERS_TO_LITERS: f64 = 1000.0;

/// Number of time samples across [0, T]
pub const DEFAULT_TIME_SAMPLES: usize = 1000;

/// Points on the t = 0 jet curve drawn next to the tank
pub const SNAPSHOT_TRAJECTORY_POINTS: usize = 400;

/// Points on each checkpoint jet curve
pub const CHECKPOINT_TRAJECTORY_POINTS: usize = 100;

/// Fill levels (fraction of the initial height) used to compare jet trajectories
pub const CHECKPOINT_FILL_FRACTIONS: [f64; 4] = [1.0, 0.75, 0.5, 0.25];

/// Width of the rectangle standing in for the tank in the snapshot chart (m)
pub const TANK_SNAPSHOT_WIDTH_M: f64 = 1.0;

/// Minimum exit velocity for which a jet curve is drawn
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-9;

// Parameter ranges accepted at the input boundary

/// Container diameter range (m)
pub const CONTAINER_DIAMETER_RANGE: (f64, f64) = (0.1, 1.0);

/// Orifice diameter range (m)
pub const ORIFICE_DIAMETER_RANGE: (f64, f64) = (0.001, 0.05);

/// Orifice height range (m)
pub const ORIFICE_HEIGHT_RANGE: (f64, f64) = (0.1, 10.0);

/// Simulated duration range (s), whole seconds only
pub const MAX_TIME_RANGE: (f64, f64) = (5.0, 1000.0);

// Defaults match the initial slider positions of the interactive tool

pub const DEFAULT_CONTAINER_DIAMETER_M: f64 = 0.5;
pub const DEFAULT_ORIFICE_DIAMETER_M: f64 = 0.005;
pub const DEFAULT_ORIFICE_HEIGHT_M: f64 = 0.1;
pub const DEFAULT_MAX_TIME_S: f64 = 30.0;
