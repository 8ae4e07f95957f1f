use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("{name} of {delay} months exceeds the {horizon} month horizon")]
    DelayExceedsHorizon {
        name: &'static str,
        delay: u32,
        horizon: u32,
    },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Inputs of the revenue side of the model.
///
/// Rates are fractions (`0.05` is five percent). Usage is measured in
/// simulation-years per customer per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevenueParameters {
    pub seat_fee: f64,
    pub avg_seats: u32,
    pub sim_year_revenue_mean: f64,
    pub sim_year_revenue_sigma: f64,
    pub revenue_per_sim_year: f64,
    pub customer_delay: u32,
    pub customer_growth_median: f64,
    pub customer_growth_sigma: f64,
    pub customer_growth_accel: f64,
    pub monthly_churn_median: f64,
    pub monthly_churn_sigma: f64,
}

impl Default for RevenueParameters {
    fn default() -> Self {
        Self {
            seat_fee: 1000.0,
            avg_seats: 1,
            sim_year_revenue_mean: 250.0,
            sim_year_revenue_sigma: 1.0,
            revenue_per_sim_year: 87.60,
            customer_delay: 3,
            customer_growth_median: 0.7,
            customer_growth_sigma: 1.1,
            customer_growth_accel: 0.05,
            monthly_churn_median: 0.05,
            monthly_churn_sigma: 1.0,
        }
    }
}

impl RevenueParameters {
    pub fn validate(&self, horizon: u32) -> Result<(), ParameterError> {
        non_negative("seat_fee", self.seat_fee)?;
        non_negative("sim_year_revenue_mean", self.sim_year_revenue_mean)?;
        non_negative("sim_year_revenue_sigma", self.sim_year_revenue_sigma)?;
        non_negative("revenue_per_sim_year", self.revenue_per_sim_year)?;
        non_negative("customer_growth_median", self.customer_growth_median)?;
        non_negative("customer_growth_sigma", self.customer_growth_sigma)?;
        non_negative("customer_growth_accel", self.customer_growth_accel)?;
        fraction("monthly_churn_median", self.monthly_churn_median)?;
        non_negative("monthly_churn_sigma", self.monthly_churn_sigma)?;
        within_horizon("customer_delay", self.customer_delay, horizon)
    }
}

/// Inputs of the cost side of the model, including headcount growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostParameters {
    pub hosting_initial: f64,
    pub hosting_growth: f64,
    pub software_initial: f64,
    pub software_growth: f64,
    pub admin_monthly: f64,
    pub conference_monthly: f64,
    pub salary_per_person: f64,
    pub initial_headcount: u32,
    pub headcount_delay: u32,
    pub headcount_growth_median: f64,
    pub headcount_growth_sigma: f64,
    pub headcount_growth_accel: f64,
    pub support_customer_initial: f64,
    pub support_growth: f64,
    pub compute_initial: f64,
    pub compute_growth: f64,
    pub compute_per_sim_year: f64,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            hosting_initial: 1500.0,
            hosting_growth: 0.01,
            software_initial: 2000.0,
            software_growth: 0.01,
            admin_monthly: 15000.0 / 12.0,
            conference_monthly: 5000.0 / 12.0,
            salary_per_person: 20000.0,
            initial_headcount: 5,
            headcount_delay: 0,
            headcount_growth_median: 1.0,
            headcount_growth_sigma: 0.2,
            headcount_growth_accel: 0.01,
            support_customer_initial: 400.0,
            support_growth: 0.03,
            compute_initial: 2000.0,
            compute_growth: 0.05,
            compute_per_sim_year: 5.0,
        }
    }
}

impl CostParameters {
    pub fn validate(&self, horizon: u32) -> Result<(), ParameterError> {
        non_negative("hosting_initial", self.hosting_initial)?;
        non_negative("hosting_growth", self.hosting_growth)?;
        non_negative("software_initial", self.software_initial)?;
        non_negative("software_growth", self.software_growth)?;
        non_negative("admin_monthly", self.admin_monthly)?;
        non_negative("conference_monthly", self.conference_monthly)?;
        non_negative("salary_per_person", self.salary_per_person)?;
        non_negative("headcount_growth_median", self.headcount_growth_median)?;
        non_negative("headcount_growth_sigma", self.headcount_growth_sigma)?;
        non_negative("headcount_growth_accel", self.headcount_growth_accel)?;
        non_negative("support_customer_initial", self.support_customer_initial)?;
        non_negative("support_growth", self.support_growth)?;
        non_negative("compute_initial", self.compute_initial)?;
        non_negative("compute_growth", self.compute_growth)?;
        non_negative("compute_per_sim_year", self.compute_per_sim_year)?;
        within_horizon("headcount_delay", self.headcount_delay, horizon)
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::InvalidParameter {
            name,
            reason: format!("{value} is not a finite number"),
        });
    }
    if value < 0.0 {
        return Err(ParameterError::InvalidParameter {
            name,
            reason: format!("{value} is negative"),
        });
    }
    Ok(())
}

fn fraction(name: &'static str, value: f64) -> Result<(), ParameterError> {
    non_negative(name, value)?;
    if value > 1.0 {
        return Err(ParameterError::InvalidParameter {
            name,
            reason: format!("{value} is above 1.0 (rates are fractions)"),
        });
    }
    Ok(())
}

fn within_horizon(name: &'static str, delay: u32, horizon: u32) -> Result<(), ParameterError> {
    if delay > horizon {
        return Err(ParameterError::DelayExceedsHorizon {
            name,
            delay,
            horizon,
        });
    }
    Ok(())
}
