use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use thiserror::Error;
use tracing::info;

use crate::domain::parameters::ParameterError;
use crate::domain::scenario::{Scenario, ScenarioOverrides};
use crate::services::band_plot::{BandPlotError, BandSeries};
use crate::services::monte_carlo::EngineError;
use crate::services::result_table::ExportError;
use crate::services::scenario_yaml::{load_scenario_from_yaml_file, ScenarioYamlError};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Monte Carlo forecast and write the result set
    Simulate {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output YAML file (JSON when the name ends in .json)
        #[arg(short, long)]
        output: String,
    },
    /// Run the forecast and write one row per month, one column per percentile
    Export {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output YAML file (JSON when the name ends in .json)
        #[arg(short, long)]
        output: String,
    },
    /// Run the forecast and plot a percentile band into a PNG chart
    Plot {
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        /// Metric to plot, or cumulative-earnings
        #[arg(long, default_value_t = BandSeries::default())]
        metric: BandSeries,
    },
    /// Write the default scenario to a YAML file
    Defaults {
        /// Output YAML file
        #[arg(short, long)]
        output: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Scenario YAML file
    #[arg(short, long)]
    pub input: String,
    /// Forecast horizon in months, overrides the scenario
    #[arg(short, long)]
    pub months: Option<u32>,
    /// Number of Monte Carlo trials, overrides the scenario
    #[arg(short = 'n', long)]
    pub simulations: Option<u32>,
    /// Random seed for reproducible runs, overrides the scenario
    #[arg(long)]
    pub seed: Option<u64>,
}

impl ScenarioArgs {
    fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            months: self.months,
            simulations: self.simulations,
            seed: self.seed,
        }
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Scenario(#[from] ScenarioYamlError),
    #[error("invalid scenario: {0}")]
    Invalid(#[from] ParameterError),
    #[error("forecast failed: {0}")]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Plot(#[from] BandPlotError),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Loads the scenario file, applies the command line overrides and validates
/// the result.
pub fn load_scenario(args: &ScenarioArgs) -> Result<Scenario, CommandError> {
    let mut scenario = load_scenario_from_yaml_file(&args.input)?;
    scenario.apply(&args.overrides());
    scenario.validate()?;
    info!(
        input = %args.input,
        months = scenario.simulation.months,
        simulations = scenario.simulation.simulations,
        "scenario loaded"
    );
    Ok(scenario)
}
