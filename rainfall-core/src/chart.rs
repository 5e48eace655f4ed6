//! Chart rendering for aggregated samples.
//!
//! Renders the per-key means as a line chart, mirroring the chart options
//! block of the hosted platform (title, axis titles, tick positions, legend
//! visibility).

use crate::errors::{RainfallError, RainfallResult};
use crate::table::SampleTable;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chart options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    /// Explicit x-axis tick positions; when absent a default count is used.
    pub x_ticks: Option<Vec<u32>>,
    pub show_legend: bool,
}

impl ChartConfig {
    pub fn new(
        title: impl Into<String>,
        x_title: impl Into<String>,
        y_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_title: x_title.into(),
            y_title: y_title.into(),
            x_ticks: None,
            show_legend: false,
        }
    }

    pub fn with_x_ticks(mut self, ticks: Vec<u32>) -> Self {
        self.x_ticks = Some(ticks);
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }
}

/// Render group key against aggregated value as a line chart PNG.
pub fn render_line_chart(
    table: &SampleTable,
    config: &ChartConfig,
    path: &Path,
) -> RainfallResult<()> {
    if table.is_empty() {
        return Err(RainfallError::Chart("cannot chart an empty table".to_string()));
    }

    let points: Vec<(f64, f64)> = table
        .iter()
        .map(|s| (s.key.value() as f64, s.value))
        .collect();
    let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    // Leave headroom above the tallest value; degenerate flat-zero tables
    // still get a visible axis.
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    let x_label_count = config.x_ticks.as_ref().map(|t| t.len()).unwrap_or(10);

    let root = BitMapBackend::new(path, (900, 500)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| RainfallError::Chart(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(config.title.clone(), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0..y_top)
        .map_err(|e| RainfallError::Chart(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(config.x_title.clone())
        .y_desc(config.y_title.clone())
        .x_labels(x_label_count)
        .draw()
        .map_err(|e| RainfallError::Chart(e.to_string()))?;

    let series = chart
        .draw_series(LineSeries::new(points, &BLUE))
        .map_err(|e| RainfallError::Chart(e.to_string()))?;

    if config.show_legend {
        series
            .label(config.y_title.clone())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.5))
            .draw()
            .map_err(|e| RainfallError::Chart(e.to_string()))?;
    }

    root.present()
        .map_err(|e| RainfallError::Chart(e.to_string()))?;
    log::info!("rendered chart '{}' to {:?}", config.title, path);
    Ok(())
}
