//! Output sinks for scenario results.
//!
//! A result is published as a handful of labeled scalars followed by named
//! curve datasets. Anything that can show them implements [`ScalarSink`] and
//! [`CurveSink`]; the terminal table, CSV and JSON reports live here, SVG
//! charts live in [`crate::plot`].

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli_api::{compute_scenario, ScenarioInputs, TorricelliError};
use crate::curves::CurveDataset;
use crate::sampling::decimated_indices;

/// Rows printed per series in non-full table mode
const TABLE_ROWS_PER_SERIES: usize = 10;

/// A labeled scalar with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarReading {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub unit: String,
}

impl ScalarReading {
    pub fn new(key: &str, label: &str, value: f64, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value,
            unit: unit.to_string(),
        }
    }

    /// Value with two decimals followed by the unit
    pub fn formatted(&self) -> String {
        format!("{:.2} {}", self.value, self.unit)
    }
}

/// Accepts labeled scalar values
pub trait ScalarSink {
    fn scalar(&mut self, reading: &ScalarReading) -> Result<(), TorricelliError>;
}

/// Accepts named curve datasets
pub trait CurveSink {
    fn curve(&mut self, dataset: &CurveDataset) -> Result<(), TorricelliError>;
}

/// Boxed terminal report
pub struct TableReport<W: Write> {
    out: W,
    full: bool,
    summary_open: bool,
}

impl<W: Write> TableReport<W> {
    pub fn new(out: W, full: bool) -> Self {
        Self {
            out,
            full,
            summary_open: false,
        }
    }

    fn close_summary(&mut self) -> Result<(), TorricelliError> {
        if self.summary_open {
            writeln!(self.out, "╚════════════════════════════════════════════════╝")?;
            self.summary_open = false;
        }
        Ok(())
    }

    /// Close any open box and hand back the writer
    pub fn finish(mut self) -> Result<W, TorricelliError> {
        self.close_summary()?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ScalarSink for TableReport<W> {
    fn scalar(&mut self, reading: &ScalarReading) -> Result<(), TorricelliError> {
        if !self.summary_open {
            writeln!(self.out, "╔════════════════════════════════════════════════╗")?;
            writeln!(self.out, "║            TORRICELLI DRAINING RESULTS         ║")?;
            writeln!(self.out, "╠════════════════════════════════════════════════╣")?;
            self.summary_open = true;
        }
        writeln!(
            self.out,
            "║ {:<24} {:>14} {:<6} ║",
            format!("{}:", reading.label),
            format!("{:.2}", reading.value),
            reading.unit
        )?;
        Ok(())
    }
}

impl<W: Write> CurveSink for TableReport<W> {
    fn curve(&mut self, dataset: &CurveDataset) -> Result<(), TorricelliError> {
        self.close_summary()?;

        writeln!(self.out)?;
        writeln!(self.out, "{}", dataset.title)?;
        if dataset.series.is_empty() {
            writeln!(self.out, "  (no curve to draw)")?;
            return Ok(());
        }

        for series in &dataset.series {
            writeln!(self.out, "  {} ({} points)", series.label, series.points.len())?;
            writeln!(self.out, "  ┌────────────────┬────────────────┐")?;
            writeln!(
                self.out,
                "  │ {:>14} │ {:>14} │",
                short_label(&dataset.x_label),
                short_label(&dataset.y_label)
            )?;
            writeln!(self.out, "  ├────────────────┼────────────────┤")?;

            let indices: Vec<usize> = if self.full {
                (0..series.points.len()).collect()
            } else {
                decimated_indices(series.points.len(), TABLE_ROWS_PER_SERIES)
            };
            for i in indices {
                let p = series.points[i];
                writeln!(self.out, "  │ {:>14.3} │ {:>14.3} │", p.x, p.y)?;
            }
            writeln!(self.out, "  └────────────────┴────────────────┘")?;
        }
        Ok(())
    }
}

// Axis labels are long; keep the unit and the first word so columns stay aligned
fn short_label(label: &str) -> String {
    let first = label.split_whitespace().next().unwrap_or("");
    let unit = label.rfind('(').map(|i| &label[i..]).unwrap_or("");
    let short = format!("{} {}", first, unit);
    short.trim().chars().take(14).collect()
}

/// Comma-separated report: `metric,value,unit` rows then `dataset,series,x,y` rows
pub struct CsvReport<W: Write> {
    out: W,
    scalar_header: bool,
    curve_header: bool,
}

impl<W: Write> CsvReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            scalar_header: false,
            curve_header: false,
        }
    }

    pub fn finish(mut self) -> Result<W, TorricelliError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ScalarSink for CsvReport<W> {
    fn scalar(&mut self, reading: &ScalarReading) -> Result<(), TorricelliError> {
        if !self.scalar_header {
            writeln!(self.out, "metric,value,unit")?;
            self.scalar_header = true;
        }
        writeln!(self.out, "{},{:.6e},{}", reading.key, reading.value, reading.unit)?;
        Ok(())
    }
}

impl<W: Write> CurveSink for CsvReport<W> {
    fn curve(&mut self, dataset: &CurveDataset) -> Result<(), TorricelliError> {
        if !self.curve_header {
            if self.scalar_header {
                writeln!(self.out)?;
            }
            writeln!(self.out, "dataset,series,x,y")?;
            self.curve_header = true;
        }
        for series in &dataset.series {
            for p in &series.points {
                writeln!(self.out, "{},{},{:.6},{:.6}", dataset.name, series.label, p.x, p.y)?;
            }
        }
        Ok(())
    }
}

/// Collects everything and renders a single JSON document
#[derive(Debug, Default, Serialize)]
pub struct JsonReport {
    pub summary: Vec<ScalarReading>,
    pub curves: Vec<CurveDataset>,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json_pretty(&self) -> Result<String, TorricelliError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate, solve and render the full report for one set of inputs
    pub fn for_inputs(inputs: ScenarioInputs) -> Result<String, TorricelliError> {
        let result = compute_scenario(inputs)?;
        let mut report = Self::new();
        result.publish_report(&mut report)?;
        report.to_json_pretty()
    }
}

impl ScalarSink for JsonReport {
    fn scalar(&mut self, reading: &ScalarReading) -> Result<(), TorricelliError> {
        self.summary.push(reading.clone());
        Ok(())
    }
}

impl CurveSink for JsonReport {
    fn curve(&mut self, dataset: &CurveDataset) -> Result<(), TorricelliError> {
        self.curves.push(dataset.clone());
        Ok(())
    }
}
