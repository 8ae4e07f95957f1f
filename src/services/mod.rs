pub mod aggregation;
pub mod band_plot;
pub mod monte_carlo;
pub mod percentiles;
pub mod result_table;
pub mod result_types;
pub mod scenario_yaml;
pub mod summary_metrics;
pub mod telemetry;
pub mod trial_simulator;
