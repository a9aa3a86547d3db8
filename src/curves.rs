//! Chart-ready datasets produced by a scenario.

use serde::{Deserialize, Serialize};

/// One (x, y) pair of a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A labeled line within a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSeries {
    pub label: String,
    pub points: Vec<CurvePoint>,
}

impl CurveSeries {
    pub fn new(label: impl Into<String>, points: Vec<CurvePoint>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Zip two equally long sample vectors into a series
    pub fn from_samples(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| CurvePoint::new(x, y))
            .collect();
        Self::new(label, points)
    }
}

/// Filled axis-aligned rectangle drawn behind the series (the tank outline)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Everything a chart needs: title, axis labels, series and shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDataset {
    /// Stable identifier, also used as file stem by file-based sinks
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<CurveSeries>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<RectShape>,
    /// Fixed vertical axis range; sinks fit the data when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<(f64, f64)>,
}

impl CurveDataset {
    pub fn new(name: &str, title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
            shapes: Vec::new(),
            y_range: None,
        }
    }

    pub fn with_series(mut self, series: CurveSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_shape(mut self, shape: RectShape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn series_named(&self, label: &str) -> Option<&CurveSeries> {
        self.series.iter().find(|s| s.label == label)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Bounds over every series point and shape: ((x_min, x_max), (y_min, y_max))
    ///
    /// `None` for an empty dataset. Non-finite coordinates are ignored.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let xs = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| (p.x, p.y)))
            .chain(self.shapes.iter().flat_map(|r| [(r.x0, r.y0), (r.x1, r.y1)]))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        xs.fold(None, |acc, (x, y)| match acc {
            None => Some(((x, x), (y, y))),
            Some(((x_min, x_max), (y_min, y_max))) => {
                Some(((x_min.min(x), x_max.max(x)), (y_min.min(y), y_max.max(y))))
            }
        })
    }
}

/// The four charts of a scenario, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCurves {
    pub head_over_time: CurveDataset,
    pub range_over_time: CurveDataset,
    pub container_snapshot: CurveDataset,
    pub checkpoint_trajectories: CurveDataset,
}

impl ScenarioCurves {
    pub fn iter(&self) -> impl Iterator<Item = &CurveDataset> {
        [
            &self.head_over_time,
            &self.range_over_time,
            &self.container_snapshot,
            &self.checkpoint_trajectories,
        ]
        .into_iter()
    }
}
