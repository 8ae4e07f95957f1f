use serde::Serialize;

use crate::domain::metric::Metric;

pub type MonthValues = [f64; Metric::COUNT];

/// The monthly values of every metric for one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub months: Vec<MonthValues>,
}

impl Trajectory {
    pub fn with_capacity(horizon: usize) -> Self {
        Self {
            months: Vec::with_capacity(horizon),
        }
    }

    pub fn value(&self, month_index: usize, metric: Metric) -> f64 {
        self.months[month_index][metric.index()]
    }

    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.months
            .iter()
            .map(|values| values[metric.index()])
            .collect()
    }

    /// Running total of net earnings.
    pub fn cumulative_earnings(&self) -> Vec<f64> {
        self.months
            .iter()
            .scan(0.0, |total, values| {
                *total += values[Metric::NetEarnings.index()];
                Some(*total)
            })
            .collect()
    }
}

/// Why a trial was left out of the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialDiagnostic {
    pub trial: usize,
    pub month: usize,
    pub reason: String,
}

/// All surviving trials of one engine run, indexed `[trial][month][metric]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialMatrix {
    /// Base seed the per-trial generators were derived from.
    pub seed: Option<u64>,
    pub horizon: usize,
    pub trials: Vec<Trajectory>,
    pub degenerate: Vec<TrialDiagnostic>,
}

impl TrialMatrix {
    pub fn new(horizon: usize, trials: Vec<Trajectory>) -> Self {
        Self {
            seed: None,
            horizon,
            trials,
            degenerate: Vec::new(),
        }
    }

    /// Values of `metric` in `month_index` across all trials, in trial order.
    pub fn column(&self, month_index: usize, metric: Metric) -> Vec<f64> {
        self.trials
            .iter()
            .map(|trial| trial.value(month_index, metric))
            .collect()
    }
}
