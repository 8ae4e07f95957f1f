use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::domain::metric::Metric;
use crate::services::result_types::{PercentileBand, ResultSet};

pub const CUMULATIVE_EARNINGS_COLUMN: &str = "cumulative-earnings";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TableRow {
    pub month: usize,
    pub label: String,
    pub values: Vec<f64>,
}

/// Tabular view of a [`ResultSet`]: one row per month and one column per
/// (metric, percentile) pair, followed by the cumulative earnings band.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn from_result_set(result: &ResultSet) -> Self {
        let mut columns = Vec::new();
        for metric in Metric::ALL {
            columns.extend(percentile_columns(metric.name(), &result.percentiles));
        }
        columns.extend(percentile_columns(
            CUMULATIVE_EARNINGS_COLUMN,
            &result.percentiles,
        ));

        let rows = result
            .months
            .iter()
            .map(|month| {
                let mut values = Vec::with_capacity(columns.len());
                for metric in Metric::ALL {
                    if let Some(band) = month.band(metric) {
                        values.extend(band_values(band));
                    }
                }
                values.extend(band_values(&month.cumulative_earnings));
                TableRow {
                    month: month.month,
                    label: month.label.clone(),
                    values,
                }
            })
            .collect();

        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// Column name of a metric at a percentile, e.g. `net-earnings_p50`.
pub fn column_name(metric: &str, percentile: f64) -> String {
    format!("{metric}_p{percentile}")
}

fn percentile_columns<'a>(
    metric: &'a str,
    percentiles: &'a [f64],
) -> impl Iterator<Item = String> + 'a {
    percentiles
        .iter()
        .map(move |percentile| column_name(metric, *percentile))
}

fn band_values(band: &PercentileBand) -> impl Iterator<Item = f64> + '_ {
    band.points.iter().map(|point| point.value)
}

/// Serializes `value` as JSON when `path` ends in `.json`, YAML otherwise.
pub fn write_serialized<T: Serialize>(path: &str, value: &T) -> Result<(), ExportError> {
    let contents = if is_json_path(path) {
        serde_json::to_string_pretty(value)?
    } else {
        serde_yaml::to_string(value)?
    };
    std::fs::write(path, contents)?;
    Ok(())
}

fn is_json_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
