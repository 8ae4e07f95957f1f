use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::parameters::{CostParameters, ParameterError, RevenueParameters};
use crate::domain::simulation_config::SimulationConfig;
use crate::domain::trajectory::{TrialMatrix, Trajectory};
use crate::services::aggregation::aggregate;
use crate::services::result_types::ResultSet;
use crate::services::trial_simulator::TrialSimulator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("ensemble is empty: {configured} trials configured, {degenerate} degenerate")]
    EmptyEnsemble { configured: usize, degenerate: usize },
    #[error("horizon must be at least one month")]
    ZeroHorizon,
    #[error("invalid percentiles: {0}")]
    InvalidPercentiles(#[from] ParameterError),
}

/// Runs the full pipeline: trials, then percentile aggregation.
pub fn run_forecast(
    revenue: &RevenueParameters,
    costs: &CostParameters,
    config: &SimulationConfig,
) -> Result<ResultSet, EngineError> {
    let matrix = run_trials(revenue, costs, config)?;
    aggregate(&matrix, &config.percentiles, &config.month_labels())
}

/// Runs `config.simulations` trials seeded from `config.seed`, or from a fresh
/// random seed when none is configured.
pub fn run_trials(
    revenue: &RevenueParameters,
    costs: &CostParameters,
    config: &SimulationConfig,
) -> Result<TrialMatrix, EngineError> {
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
    run_trials_with_seed(revenue, costs, config, base_seed)
}

pub fn run_trials_with_seed(
    revenue: &RevenueParameters,
    costs: &CostParameters,
    config: &SimulationConfig,
    base_seed: u64,
) -> Result<TrialMatrix, EngineError> {
    let simulations = config.simulations as usize;
    if simulations == 0 {
        return Err(EngineError::EmptyEnsemble {
            configured: 0,
            degenerate: 0,
        });
    }
    if config.months == 0 {
        return Err(EngineError::ZeroHorizon);
    }

    info!(
        simulations,
        months = config.months,
        seed = base_seed,
        "running monte carlo trials"
    );
    let started = Instant::now();
    let simulator = TrialSimulator::from_config(revenue, costs, config);

    let outcomes: Vec<Result<Trajectory, _>> = (0..simulations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(derive_trial_seed(base_seed, trial as u64));
            simulator.simulate(trial, config.months, &mut rng)
        })
        .collect();

    let mut matrix = TrialMatrix::new(config.months as usize, Vec::with_capacity(simulations));
    matrix.seed = Some(base_seed);
    for outcome in outcomes {
        match outcome {
            Ok(trajectory) => matrix.trials.push(trajectory),
            Err(diagnostic) => {
                warn!(
                    trial = diagnostic.trial,
                    month = diagnostic.month,
                    reason = %diagnostic.reason,
                    "excluding degenerate trial"
                );
                matrix.degenerate.push(diagnostic);
            }
        }
    }
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        kept = matrix.trials.len(),
        "trials finished"
    );

    if matrix.trials.is_empty() {
        return Err(EngineError::EmptyEnsemble {
            configured: simulations,
            degenerate: matrix.degenerate.len(),
        });
    }
    Ok(matrix)
}

/// Independent seed for `trial`, mixed from the run's base seed.
pub fn derive_trial_seed(base_seed: u64, trial: u64) -> u64 {
    splitmix64(base_seed ^ trial.wrapping_mul(0xD1B5_4A32_D192_ED03))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric::Metric;
    use crate::test_support::{deterministic_costs, deterministic_revenue, on_date};
    use std::collections::HashSet;

    fn scenario_config(simulations: u32) -> SimulationConfig {
        SimulationConfig {
            months: 24,
            simulations,
            seed: Some(1234),
            start_month: on_date(2026, 1, 1),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn zero_simulations_is_an_empty_ensemble() {
        let config = SimulationConfig {
            simulations: 0,
            ..scenario_config(0)
        };

        let error = run_trials(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &config,
        )
        .unwrap_err();

        assert_eq!(
            error,
            EngineError::EmptyEnsemble {
                configured: 0,
                degenerate: 0
            }
        );
    }

    #[test]
    fn matrix_has_one_trajectory_per_trial_and_month() {
        let matrix = run_trials(
            &RevenueParameters::default(),
            &CostParameters::default(),
            &scenario_config(120),
        )
        .unwrap();

        assert_eq!(matrix.seed, Some(1234));
        assert_eq!(matrix.horizon, 24);
        assert_eq!(matrix.trials.len(), 120);
        assert!(matrix.degenerate.is_empty());
        assert!(matrix.trials.iter().all(|trial| trial.months.len() == 24));
    }

    #[test]
    fn trials_are_reproducible_and_distinct() {
        let revenue = RevenueParameters::default();
        let costs = CostParameters::default();
        let config = scenario_config(100);

        let first = run_trials(&revenue, &costs, &config).unwrap();
        let second = run_trials(&revenue, &costs, &config).unwrap();
        assert_eq!(first, second);

        let distinct_final_usage: HashSet<u64> = first
            .trials
            .iter()
            .map(|trial| trial.value(23, Metric::Usage).to_bits())
            .collect();
        assert!(distinct_final_usage.len() > 50);
    }

    #[test]
    fn trial_results_do_not_depend_on_ensemble_size() {
        let revenue = RevenueParameters::default();
        let costs = CostParameters::default();

        let small = run_trials(&revenue, &costs, &scenario_config(100)).unwrap();
        let large = run_trials(&revenue, &costs, &scenario_config(300)).unwrap();

        assert_eq!(small.trials[..], large.trials[..100]);
    }

    #[test]
    fn all_degenerate_trials_give_an_empty_ensemble() {
        let revenue = RevenueParameters {
            customer_delay: 0,
            customer_growth_median: 1000.0,
            customer_growth_sigma: 0.0,
            customer_growth_accel: 2.0,
            ..deterministic_revenue()
        };
        let config = SimulationConfig {
            months: 72,
            ..scenario_config(100)
        };

        let error = run_trials(&revenue, &deterministic_costs(), &config).unwrap_err();

        assert_eq!(
            error,
            EngineError::EmptyEnsemble {
                configured: 100,
                degenerate: 100
            }
        );
    }

    #[test]
    fn some_degenerate_trials_are_excluded_and_recorded() {
        // Wide adds volatility pushes only some trials above the ceiling.
        let revenue = RevenueParameters {
            customer_delay: 0,
            customer_growth_median: 1.0,
            customer_growth_sigma: 10.0,
            customer_growth_accel: 0.0,
            ..deterministic_revenue()
        };
        let config = SimulationConfig {
            months: 12,
            ..scenario_config(400)
        };

        let matrix = run_trials(&revenue, &deterministic_costs(), &config).unwrap();

        assert!(!matrix.degenerate.is_empty());
        assert!(!matrix.trials.is_empty());
        assert_eq!(matrix.trials.len() + matrix.degenerate.len(), 400);
        assert!(
            matrix
                .trials
                .iter()
                .flat_map(|trial| trial.months.iter())
                .all(|values| values.iter().all(|value| value.is_finite()))
        );
    }

    #[test]
    fn non_finite_costs_in_every_trial_give_an_empty_ensemble() {
        let costs = CostParameters {
            hosting_initial: 1.0,
            hosting_growth: 1e300,
            ..deterministic_costs()
        };

        let error = run_trials(&deterministic_revenue(), &costs, &scenario_config(100)).unwrap_err();

        assert_eq!(
            error,
            EngineError::EmptyEnsemble {
                configured: 100,
                degenerate: 100
            }
        );
    }

    #[test]
    fn derived_seeds_differ_per_trial() {
        let seeds: HashSet<u64> = (0..1000).map(|trial| derive_trial_seed(7, trial)).collect();
        assert_eq!(seeds.len(), 1000);
        assert_ne!(derive_trial_seed(7, 0), derive_trial_seed(8, 0));
    }
}
