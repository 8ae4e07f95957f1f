use serde::Serialize;

use crate::domain::metric::Metric;
use crate::domain::trajectory::{TrialMatrix, Trajectory};
use crate::services::percentiles::median;

/// Headline numbers of an ensemble. Every value is computed per trial first
/// and then reduced to the median across trials.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct SummaryMetrics {
    pub final_customers: f64,
    pub final_headcount: f64,
    pub final_revenue: f64,
    pub final_costs: f64,
    pub final_monthly_earnings: f64,
    pub final_cumulative_earnings: f64,
    pub revenue_per_employee: f64,
    pub earnings_per_employee: f64,
    pub cost_per_employee: f64,
    /// Final month earnings over revenue; trials without revenue are skipped.
    pub final_profit_margin: Option<f64>,
    pub salary_share_of_costs: Option<f64>,
    /// Final month total costs over first month total costs.
    pub cost_growth_multiple: Option<f64>,
    pub profitable_months: f64,
    /// Lowest point of the cumulative earnings curve.
    pub max_drawdown: f64,
    pub trials_breaking_even: usize,
    /// Median break-even month of the trials that break even at all.
    pub median_trial_break_even_month: Option<f64>,
}

pub fn summarize(matrix: &TrialMatrix) -> SummaryMetrics {
    let trials = &matrix.trials;
    if trials.is_empty() || matrix.horizon == 0 {
        return SummaryMetrics::default();
    }
    let last = matrix.horizon - 1;
    let final_value = |trial: &Trajectory, metric: Metric| trial.value(last, metric);
    let employees = |trial: &Trajectory| final_value(trial, Metric::Headcount).max(1.0);

    let cumulative: Vec<Vec<f64>> = trials.iter().map(Trajectory::cumulative_earnings).collect();
    let mut break_even_months: Vec<f64> = cumulative
        .iter()
        .filter_map(|series| first_non_negative_month(series))
        .map(|month| month as f64)
        .collect();
    let trials_breaking_even = break_even_months.len();

    SummaryMetrics {
        final_customers: median_of(trials, |trial| final_value(trial, Metric::Customers)),
        final_headcount: median_of(trials, |trial| final_value(trial, Metric::Headcount)),
        final_revenue: median_of(trials, |trial| final_value(trial, Metric::TotalRevenue)),
        final_costs: median_of(trials, |trial| final_value(trial, Metric::TotalCosts)),
        final_monthly_earnings: median_of(trials, |trial| {
            final_value(trial, Metric::NetEarnings)
        }),
        final_cumulative_earnings: median_of(&cumulative, |series| series[last]),
        revenue_per_employee: median_of(trials, |trial| {
            final_value(trial, Metric::TotalRevenue) / employees(trial)
        }),
        earnings_per_employee: median_of(trials, |trial| {
            final_value(trial, Metric::NetEarnings) / employees(trial)
        }),
        cost_per_employee: median_of(trials, |trial| {
            final_value(trial, Metric::TotalCosts) / employees(trial)
        }),
        final_profit_margin: median_of_ratios(trials, |trial| {
            ratio(
                final_value(trial, Metric::NetEarnings),
                final_value(trial, Metric::TotalRevenue),
            )
        }),
        salary_share_of_costs: median_of_ratios(trials, |trial| {
            ratio(
                final_value(trial, Metric::Salary),
                final_value(trial, Metric::TotalCosts),
            )
        }),
        cost_growth_multiple: median_of_ratios(trials, |trial| {
            ratio(
                final_value(trial, Metric::TotalCosts),
                trial.value(0, Metric::TotalCosts),
            )
        }),
        profitable_months: median_of(trials, |trial| {
            trial
                .series(Metric::NetEarnings)
                .iter()
                .filter(|earnings| **earnings > 0.0)
                .count() as f64
        }),
        max_drawdown: median_of(&cumulative, |series| {
            series.iter().copied().fold(f64::INFINITY, f64::min)
        }),
        trials_breaking_even,
        median_trial_break_even_month: median(&mut break_even_months),
    }
}

/// One based month where a running total first becomes non-negative.
pub fn first_non_negative_month(cumulative: &[f64]) -> Option<usize> {
    cumulative
        .iter()
        .position(|total| *total >= 0.0)
        .map(|index| index + 1)
}

fn median_of<T>(items: &[T], value: impl Fn(&T) -> f64) -> f64 {
    let mut values: Vec<f64> = items.iter().map(value).collect();
    median(&mut values).unwrap_or_default()
}

fn median_of_ratios<T>(items: &[T], value: impl Fn(&T) -> Option<f64>) -> Option<f64> {
    let mut values: Vec<f64> = items.iter().filter_map(value).collect();
    median(&mut values)
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}
