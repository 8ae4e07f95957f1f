use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::metric::Metric;
use crate::domain::simulation_config::{validate_percentiles, MonthLabel};
use crate::domain::trajectory::{TrialMatrix, Trajectory};
use crate::services::monte_carlo::EngineError;
use crate::services::percentiles::{value_sorted, values_at};
use crate::services::result_types::{BandPoint, MonthSummary, PercentileBand, ResultSet};
use crate::services::summary_metrics::{first_non_negative_month, summarize};

/// Reduces the ensemble into per-month percentile bands.
///
/// Percentiles use linear interpolation between order statistics. The
/// cumulative earnings band sums each trial's earnings first and takes
/// percentiles of those sums afterwards. The break-even month is read from the
/// running sum of the monthly median earnings.
pub fn aggregate(
    matrix: &TrialMatrix,
    percentiles: &[f64],
    labels: &[MonthLabel],
) -> Result<ResultSet, EngineError> {
    validate_percentiles(percentiles)?;
    if matrix.horizon == 0 {
        return Err(EngineError::ZeroHorizon);
    }
    if matrix.trials.is_empty() {
        return Err(EngineError::EmptyEnsemble {
            configured: matrix.degenerate.len(),
            degenerate: matrix.degenerate.len(),
        });
    }

    let cumulative: Vec<Vec<f64>> = matrix
        .trials
        .iter()
        .map(Trajectory::cumulative_earnings)
        .collect();

    let months: Vec<MonthSummary> = (0..matrix.horizon)
        .map(|month_index| {
            let metrics: BTreeMap<Metric, PercentileBand> = Metric::ALL
                .into_iter()
                .map(|metric| {
                    let column = matrix.column(month_index, metric);
                    (metric, percentile_band(column, percentiles))
                })
                .collect();
            let cumulative_column = cumulative.iter().map(|series| series[month_index]).collect();
            let (label, quarter) = labels
                .get(month_index)
                .map(|label| (label.month.clone(), label.quarter.clone()))
                .unwrap_or_else(|| (format!("M{}", month_index + 1), String::new()));

            MonthSummary {
                month: month_index + 1,
                label,
                quarter,
                metrics,
                cumulative_earnings: percentile_band(cumulative_column, percentiles),
            }
        })
        .collect();

    let median_running_total: Vec<f64> = months
        .iter()
        .scan(0.0, |total, month| {
            *total += month.median(Metric::NetEarnings).unwrap_or_default();
            Some(*total)
        })
        .collect();
    let break_even_month = first_non_negative_month(&median_running_total);
    debug!(
        trials = matrix.trials.len(),
        horizon = matrix.horizon,
        ?break_even_month,
        "aggregated ensemble"
    );

    let final_month = months[months.len() - 1].clone();
    Ok(ResultSet {
        seed: matrix.seed,
        percentiles: percentiles.to_vec(),
        trials: matrix.trials.len(),
        degenerate_trials: matrix.degenerate.len(),
        diagnostics: matrix.degenerate.clone(),
        break_even_month,
        final_month,
        summary: summarize(matrix),
        months,
    })
}

fn percentile_band(mut values: Vec<f64>, percentiles: &[f64]) -> PercentileBand {
    let band_values = values_at(&mut values, percentiles).unwrap_or_default();
    let points = percentiles
        .iter()
        .zip(band_values)
        .map(|(percentile, value)| BandPoint {
            percentile: *percentile,
            value,
        })
        .collect();
    PercentileBand {
        points,
        median: value_sorted(&values, 50.0).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::{CostParameters, RevenueParameters};
    use crate::domain::simulation_config::{SimulationConfig, DEFAULT_PERCENTILES};
    use crate::domain::trajectory::TrialDiagnostic;
    use crate::services::monte_carlo::{run_forecast, run_trials};
    use crate::test_support::{on_date, trajectory_from_earnings};

    fn default_config(simulations: u32) -> SimulationConfig {
        SimulationConfig {
            months: 24,
            simulations,
            seed: Some(77),
            start_month: on_date(2026, 1, 1),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn aggregating_the_same_matrix_twice_is_identical() {
        let config = default_config(200);
        let matrix = run_trials(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &config,
        )
        .unwrap();

        let first = aggregate(&matrix, &DEFAULT_PERCENTILES, &config.month_labels()).unwrap();
        let second = aggregate(&matrix, &DEFAULT_PERCENTILES, &config.month_labels()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn bands_are_ordered_for_every_month_and_metric() {
        let config = default_config(300);
        let result = run_forecast(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &config,
        )
        .unwrap();

        for month in &result.months {
            for (metric, band) in &month.metrics {
                let p10 = band.value_at(10.0).unwrap();
                let p50 = band.value_at(50.0).unwrap();
                let p90 = band.value_at(90.0).unwrap();
                assert!(p10 <= p50 && p50 <= p90, "{metric} in month {}", month.month);
                assert_eq!(p50, band.median);
            }
            let cumulative = &month.cumulative_earnings;
            assert!(cumulative.low() <= cumulative.median);
            assert!(cumulative.median <= cumulative.high());
        }
    }

    #[test]
    fn cumulative_band_is_percentile_of_cumulative_sums() {
        // Two crossing trajectories: A earns early, B earns late.
        let matrix = TrialMatrix::new(
            2,
            vec![
                trajectory_from_earnings(&[10.0, -10.0]),
                trajectory_from_earnings(&[-10.0, 10.0]),
            ],
        );

        let result = aggregate(&matrix, &[0.0, 100.0], &[]).unwrap();

        // Cumulative sums are [10, 0] and [-10, 0]: both trials end at zero.
        let final_cumulative = &result.months[1].cumulative_earnings;
        assert_eq!(final_cumulative.low(), 0.0);
        assert_eq!(final_cumulative.high(), 0.0);

        // Summing the monthly band instead would give 10 + 10 = 20 at the top.
        let monthly = &result.months[1].metrics[&Metric::NetEarnings];
        let first = &result.months[0].metrics[&Metric::NetEarnings];
        assert_eq!(first.high() + monthly.high(), 20.0);
        assert_ne!(final_cumulative.high(), first.high() + monthly.high());
    }

    #[test]
    fn break_even_uses_running_sum_of_median_earnings() {
        // Medians per month: -10, 0, 15 => running sum -10, -10, 5.
        let matrix = TrialMatrix::new(
            3,
            vec![
                trajectory_from_earnings(&[-20.0, -5.0, 10.0]),
                trajectory_from_earnings(&[-10.0, 0.0, 15.0]),
                trajectory_from_earnings(&[0.0, 5.0, 20.0]),
            ],
        );

        let result = aggregate(&matrix, &DEFAULT_PERCENTILES, &[]).unwrap();

        assert_eq!(result.break_even_month, Some(3));
        assert_eq!(result.months[2].label, "M3");
    }

    #[test]
    fn break_even_is_none_when_never_reached() {
        let matrix = TrialMatrix::new(2, vec![trajectory_from_earnings(&[-1.0, -1.0])]);

        let result = aggregate(&matrix, &DEFAULT_PERCENTILES, &[]).unwrap();

        assert_eq!(result.break_even_month, None);
    }

    #[test]
    fn single_trial_collapses_every_band_to_its_trajectory() {
        let config = SimulationConfig {
            simulations: 1,
            ..default_config(1)
        };
        let matrix = run_trials(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &config,
        )
        .unwrap();
        let trajectory = matrix.trials[0].clone();

        let result = aggregate(&matrix, &DEFAULT_PERCENTILES, &config.month_labels()).unwrap();

        for (month_index, month) in result.months.iter().enumerate() {
            for metric in Metric::ALL {
                let band = &month.metrics[&metric];
                let expected = trajectory.value(month_index, metric);
                assert!(band.points.iter().all(|point| point.value == expected));
                assert_eq!(band.median, expected);
            }
        }
    }

    #[test]
    fn result_set_reports_degenerate_trials_and_final_month() {
        let mut matrix = TrialMatrix::new(2, vec![trajectory_from_earnings(&[1.0, 2.0])]);
        matrix.degenerate.push(TrialDiagnostic {
            trial: 4,
            month: 2,
            reason: "customers exceed the population ceiling".to_string(),
        });

        let result = aggregate(&matrix, &DEFAULT_PERCENTILES, &[]).unwrap();

        assert_eq!(result.trials, 1);
        assert_eq!(result.degenerate_trials, 1);
        assert_eq!(result.diagnostics[0].trial, 4);
        assert_eq!(result.final_month, result.months[1]);
        assert_eq!(result.final_month.month, 2);
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let matrix = TrialMatrix::new(12, Vec::new());
        assert!(matches!(
            aggregate(&matrix, &DEFAULT_PERCENTILES, &[]),
            Err(EngineError::EmptyEnsemble { .. })
        ));
    }

    #[test]
    fn invalid_percentiles_are_rejected() {
        let matrix = TrialMatrix::new(1, vec![trajectory_from_earnings(&[1.0])]);
        assert!(matches!(
            aggregate(&matrix, &[90.0, 10.0], &[]),
            Err(EngineError::InvalidPercentiles(_))
        ));
    }

    #[test]
    fn month_labels_are_attached() {
        let config = default_config(100);
        let result = run_forecast(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &config,
        )
        .unwrap();

        assert_eq!(result.horizon(), 24);
        assert_eq!(result.months[0].label, "2026-01");
        assert_eq!(result.months[0].quarter, "2026Q1");
        assert_eq!(result.months[23].label, "2027-12");
    }
}
