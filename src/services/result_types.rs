use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::metric::Metric;
use crate::domain::trajectory::TrialDiagnostic;
use crate::services::summary_metrics::SummaryMetrics;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BandPoint {
    pub percentile: f64,
    pub value: f64,
}

/// Requested percentiles of one metric in one month, across the ensemble.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PercentileBand {
    pub points: Vec<BandPoint>,
    pub median: f64,
}

impl PercentileBand {
    pub fn low(&self) -> f64 {
        self.points.first().map_or(self.median, |point| point.value)
    }

    pub fn high(&self) -> f64 {
        self.points.last().map_or(self.median, |point| point.value)
    }

    pub fn value_at(&self, percentile: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.percentile == percentile)
            .map(|point| point.value)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonthSummary {
    /// One based month number.
    pub month: usize,
    pub label: String,
    pub quarter: String,
    pub metrics: BTreeMap<Metric, PercentileBand>,
    /// Band of each trial's earnings summed up to this month.
    pub cumulative_earnings: PercentileBand,
}

impl MonthSummary {
    pub fn band(&self, metric: Metric) -> Option<&PercentileBand> {
        self.metrics.get(&metric)
    }

    pub fn median(&self, metric: Metric) -> Option<f64> {
        self.band(metric).map(|band| band.median)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub seed: Option<u64>,
    pub percentiles: Vec<f64>,
    pub trials: usize,
    pub degenerate_trials: usize,
    pub diagnostics: Vec<TrialDiagnostic>,
    /// First month where the running sum of median earnings is non-negative.
    pub break_even_month: Option<usize>,
    pub final_month: MonthSummary,
    pub summary: SummaryMetrics,
    pub months: Vec<MonthSummary>,
}

impl ResultSet {
    pub fn horizon(&self) -> usize {
        self.months.len()
    }
}
