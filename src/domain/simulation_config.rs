use chrono::{Datelike, Local, NaiveDate};
use crate::domain::growth::{CostGrowthPeriod, HiringPolicy};
use crate::domain::parameters::ParameterError;

pub const MONTHS_MIN: u32 = 12;
pub const MONTHS_MAX: u32 = 72;
pub const SIMULATIONS_MIN: u32 = 100;
pub const SIMULATIONS_MAX: u32 = 1000;
pub const DEFAULT_PERCENTILES: [f64; 3] = [10.0, 50.0, 90.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub months: u32,
    pub simulations: u32,
    pub seed: Option<u64>,
    pub percentiles: Vec<f64>,
    pub cost_growth_period: CostGrowthPeriod,
    pub hiring_policy: HiringPolicy,
    /// Calendar month of month 1. Only used for labels.
    pub start_month: NaiveDate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            months: 24,
            simulations: 500,
            seed: None,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            cost_growth_period: CostGrowthPeriod::default(),
            hiring_policy: HiringPolicy::default(),
            start_month: first_of_current_month(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ParameterError> {
        within("months", self.months, MONTHS_MIN, MONTHS_MAX)?;
        within(
            "simulations",
            self.simulations,
            SIMULATIONS_MIN,
            SIMULATIONS_MAX,
        )?;
        validate_percentiles(&self.percentiles)?;
        if let HiringPolicy::Damped { factor, .. } = self.hiring_policy {
            if !(0.0..=1.0).contains(&factor) {
                return Err(ParameterError::InvalidParameter {
                    name: "hiring_policy.factor",
                    reason: format!("{factor} is outside 0.0..=1.0"),
                });
            }
        }
        Ok(())
    }

    /// `YYYY-MM` label of every month in the horizon.
    pub fn month_labels(&self) -> Vec<MonthLabel> {
        let start = self.start_month.with_day(1).unwrap_or(self.start_month);
        (0..self.months)
            .map(|offset| {
                let total = start.month0() + offset;
                let year = start.year() + (total / 12) as i32;
                let month = total % 12 + 1;
                MonthLabel {
                    month: format!("{year}-{month:02}"),
                    quarter: format!("{year}Q{}", (month - 1) / 3 + 1),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    pub month: String,
    pub quarter: String,
}

pub fn validate_percentiles(percentiles: &[f64]) -> Result<(), ParameterError> {
    if percentiles.is_empty() {
        return Err(ParameterError::InvalidParameter {
            name: "percentiles",
            reason: "at least one percentile is required".to_string(),
        });
    }
    for value in percentiles {
        if !(0.0..=100.0).contains(value) {
            return Err(ParameterError::InvalidParameter {
                name: "percentiles",
                reason: format!("{value} is outside 0..=100"),
            });
        }
    }
    if percentiles.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ParameterError::InvalidParameter {
            name: "percentiles",
            reason: "values must be strictly ascending".to_string(),
        });
    }
    Ok(())
}

fn within(name: &'static str, value: u32, min: u32, max: u32) -> Result<(), ParameterError> {
    if value < min || value > max {
        return Err(ParameterError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn first_of_current_month() -> NaiveDate {
    let today = Local::now().date_naive();
    today.with_day(1).unwrap_or(today)
}
