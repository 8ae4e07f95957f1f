use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::growth::{CostGrowthPeriod, HiringPolicy};
use crate::domain::parameters::{CostParameters, RevenueParameters};
use crate::domain::scenario::Scenario;
use crate::domain::simulation_config::SimulationConfig;

#[derive(Error, Debug)]
pub enum ScenarioYamlError {
    #[error("failed to read scenario file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse scenario yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid start_month {0} (expected YYYY-MM or YYYY-MM-DD)")]
    InvalidStartMonth(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    #[serde(default)]
    revenue: RevenueParameters,
    #[serde(default)]
    costs: CostParameters,
    #[serde(default)]
    simulation: SimulationRecord,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    simulations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentiles: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost_growth_period: Option<CostGrowthPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hiring_policy: Option<HiringPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_month: Option<String>,
}

/// Reads a scenario file. Missing sections and fields fall back to the
/// defaults; the result is not validated against a horizon yet, since
/// command line overrides may still change it.
pub fn load_scenario_from_yaml_file(path: &str) -> Result<Scenario, ScenarioYamlError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioYamlError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    deserialize_scenario_from_yaml_str(&contents)
}

pub fn deserialize_scenario_from_yaml_str(input: &str) -> Result<Scenario, ScenarioYamlError> {
    // An empty document means "all defaults".
    let record: ScenarioRecord = if input.trim().is_empty() {
        ScenarioRecord::default()
    } else {
        serde_yaml::from_str(input)?
    };
    let simulation = simulation_config_from_record(record.simulation)?;
    Ok(Scenario {
        revenue: record.revenue,
        costs: record.costs,
        simulation,
    })
}

pub fn serialize_scenario_to_yaml<W: Write>(writer: &mut W, scenario: &Scenario) -> io::Result<()> {
    let config = &scenario.simulation;
    let record = ScenarioRecord {
        revenue: scenario.revenue.clone(),
        costs: scenario.costs.clone(),
        simulation: SimulationRecord {
            months: Some(config.months),
            simulations: Some(config.simulations),
            seed: config.seed,
            percentiles: Some(config.percentiles.clone()),
            cost_growth_period: Some(config.cost_growth_period),
            hiring_policy: Some(config.hiring_policy),
            start_month: Some(config.start_month.format("%Y-%m").to_string()),
        },
    };
    let yaml = serde_yaml::to_string(&record).map_err(io::Error::other)?;
    writer.write_all(yaml.as_bytes())
}

fn simulation_config_from_record(
    record: SimulationRecord,
) -> Result<SimulationConfig, ScenarioYamlError> {
    let defaults = SimulationConfig::default();
    let start_month = match record.start_month {
        Some(value) => parse_start_month(&value)?,
        None => defaults.start_month,
    };
    Ok(SimulationConfig {
        months: record.months.unwrap_or(defaults.months),
        simulations: record.simulations.unwrap_or(defaults.simulations),
        seed: record.seed,
        percentiles: record.percentiles.unwrap_or(defaults.percentiles),
        cost_growth_period: record
            .cost_growth_period
            .unwrap_or(defaults.cost_growth_period),
        hiring_policy: record.hiring_policy.unwrap_or(defaults.hiring_policy),
        start_month,
    })
}

fn parse_start_month(value: &str) -> Result<NaiveDate, ScenarioYamlError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map_err(|_| ScenarioYamlError::InvalidStartMonth(value.to_string()))
}
