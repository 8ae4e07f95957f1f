use std::fmt;
use std::str::FromStr;

use plotters::prelude::*;
use thiserror::Error;

use crate::domain::metric::Metric;
use crate::services::result_table::CUMULATIVE_EARNINGS_COLUMN;
use crate::services::result_types::{PercentileBand, ResultSet};

#[derive(Error, Debug)]
pub enum BandPlotError {
    #[error("result set has no months to plot")]
    EmptyResult,
    #[error("failed to render band chart: {0}")]
    Render(String),
}

/// Which band a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSeries {
    Metric(Metric),
    CumulativeEarnings,
}

impl Default for BandSeries {
    fn default() -> Self {
        BandSeries::Metric(Metric::NetEarnings)
    }
}

impl fmt::Display for BandSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandSeries::Metric(metric) => write!(f, "{metric}"),
            BandSeries::CumulativeEarnings => f.write_str(CUMULATIVE_EARNINGS_COLUMN),
        }
    }
}

impl FromStr for BandSeries {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case(CUMULATIVE_EARNINGS_COLUMN) {
            return Ok(BandSeries::CumulativeEarnings);
        }
        value.parse::<Metric>().map(BandSeries::Metric)
    }
}

impl BandSeries {
    fn band<'a>(&self, result: &'a ResultSet, month_index: usize) -> Option<&'a PercentileBand> {
        let month = result.months.get(month_index)?;
        match self {
            BandSeries::Metric(metric) => month.band(*metric),
            BandSeries::CumulativeEarnings => Some(&month.cumulative_earnings),
        }
    }
}

struct BandLines {
    low: Vec<(f64, f64)>,
    median: Vec<(f64, f64)>,
    high: Vec<(f64, f64)>,
}

fn band_lines(result: &ResultSet, series: BandSeries) -> BandLines {
    let mut lines = BandLines {
        low: Vec::with_capacity(result.horizon()),
        median: Vec::with_capacity(result.horizon()),
        high: Vec::with_capacity(result.horizon()),
    };
    for month_index in 0..result.horizon() {
        if let Some(band) = series.band(result, month_index) {
            let x = (month_index + 1) as f64;
            lines.low.push((x, band.low()));
            lines.median.push((x, band.median));
            lines.high.push((x, band.high()));
        }
    }
    lines
}

/// Renders the outer percentile band of `series` as a filled area with the
/// median drawn on top.
pub fn write_band_chart_png(
    output_path: &str,
    result: &ResultSet,
    series: BandSeries,
) -> Result<(), BandPlotError> {
    let lines = band_lines(result, series);
    if lines.median.is_empty() {
        return Err(BandPlotError::EmptyResult);
    }

    let (mut min_y, mut max_y) = lines
        .low
        .iter()
        .chain(lines.high.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), (_, y)| {
            (min.min(*y), max.max(*y))
        });
    let padding = ((max_y - min_y) * 0.05).max(1.0);
    min_y -= padding;
    max_y += padding;
    let max_x = (lines.median.len() as f64).max(2.0);

    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| BandPlotError::Render(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(format!("{series} by month"), ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(90)
        .build_cartesian_2d(1.0..max_x, min_y..max_y)
        .map_err(|e| BandPlotError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Month")
        .y_desc(series.to_string())
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_label_formatter(&|value| format!("{value:.0}"))
        .y_label_formatter(&|value| format!("{value:.0}"))
        .draw()
        .map_err(|e| BandPlotError::Render(e.to_string()))?;

    let band_color = RGBColor(30, 122, 204);
    let area: Vec<(f64, f64)> = lines
        .low
        .iter()
        .chain(lines.high.iter().rev())
        .copied()
        .collect();
    chart
        .draw_series(std::iter::once(Polygon::new(area, band_color.mix(0.25))))
        .map_err(|e| BandPlotError::Render(e.to_string()))?;
    for outer in [&lines.low, &lines.high] {
        chart
            .draw_series(LineSeries::new(
                outer.iter().copied(),
                ShapeStyle::from(&band_color).stroke_width(1),
            ))
            .map_err(|e| BandPlotError::Render(e.to_string()))?;
    }
    chart
        .draw_series(LineSeries::new(
            lines.median.iter().copied(),
            ShapeStyle::from(&band_color).stroke_width(3),
        ))
        .map_err(|e| BandPlotError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| BandPlotError::Render(e.to_string()))?;
    Ok(())
}
