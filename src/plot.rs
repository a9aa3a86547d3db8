//! SVG charts of scenario datasets.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::element::{PathElement, Rectangle};
use plotters::prelude::{
    ChartBuilder, Color, IntoDrawingArea, Palette, Palette99, SVGBackend, BLACK, BLUE, WHITE,
};
use plotters::series::LineSeries;
use tracing::debug;

use crate::cli_api::TorricelliError;
use crate::curves::CurveDataset;
use crate::report::CurveSink;

const CHART_SIZE: (u32, u32) = (800, 600);

fn chart_err<E: std::fmt::Display>(err: E) -> TorricelliError {
    format!("Chart rendering failed: {}", err).into()
}

// Widen a degenerate interval so the chart still has a drawable span
fn padded(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// Writes each dataset to `<dir>/<name>.svg`
pub struct SvgChartSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SvgChartSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, TorricelliError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Render one dataset to an SVG file
    pub fn render(&self, dataset: &CurveDataset) -> Result<PathBuf, TorricelliError> {
        let path = self.dir.join(format!("{}.svg", dataset.name));
        draw_chart(dataset, &path)?;
        debug!(path = %path.display(), "chart written");
        Ok(path)
    }
}

fn draw_chart(dataset: &CurveDataset, path: &Path) -> Result<(), TorricelliError> {
    let ((x_min, x_max), (y_min, y_max)) = dataset.bounds().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
    let (x_min, x_max) = padded(x_min, x_max);
    let (y_min, y_max) = match dataset.y_range {
        Some(range) => range,
        None => padded(y_min, y_max),
    };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&dataset.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(dataset.x_label.as_str())
        .y_desc(dataset.y_label.as_str())
        .draw()
        .map_err(chart_err)?;

    for rect in &dataset.shapes {
        let corners = [(rect.x0, rect.y0), (rect.x1, rect.y1)];
        chart
            .draw_series(std::iter::once(Rectangle::new(corners, BLUE.mix(0.5).filled())))
            .map_err(chart_err)?;
        chart
            .draw_series(std::iter::once(Rectangle::new(corners, BLACK.stroke_width(1))))
            .map_err(chart_err)?;
    }

    for (i, series) in dataset.series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(|p| (p.x, p.y)),
                color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new([(x, y), (x + 20, y)], color));
    }

    if dataset.series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

impl CurveSink for SvgChartSink {
    fn curve(&mut self, dataset: &CurveDataset) -> Result<(), TorricelliError> {
        let path = self.render(dataset)?;
        self.written.push(path);
        Ok(())
    }
}
