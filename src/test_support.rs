use chrono::NaiveDate;

use crate::domain::metric::Metric;
use crate::domain::parameters::{CostParameters, RevenueParameters};
use crate::domain::trajectory::Trajectory;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Revenue inputs without any randomness and without customer growth.
pub fn deterministic_revenue() -> RevenueParameters {
    RevenueParameters {
        seat_fee: 100.0,
        avg_seats: 1,
        sim_year_revenue_mean: 10.0,
        sim_year_revenue_sigma: 0.0,
        revenue_per_sim_year: 1.0,
        customer_delay: 0,
        customer_growth_median: 0.0,
        customer_growth_sigma: 0.0,
        customer_growth_accel: 0.0,
        monthly_churn_median: 0.0,
        monthly_churn_sigma: 0.0,
    }
}

/// Cost inputs without randomness, growth or hiring. Only salaries remain.
pub fn deterministic_costs() -> CostParameters {
    CostParameters {
        hosting_initial: 0.0,
        hosting_growth: 0.0,
        software_initial: 0.0,
        software_growth: 0.0,
        admin_monthly: 0.0,
        conference_monthly: 0.0,
        salary_per_person: 1000.0,
        initial_headcount: 2,
        headcount_delay: 0,
        headcount_growth_median: 0.0,
        headcount_growth_sigma: 0.0,
        headcount_growth_accel: 0.0,
        support_customer_initial: 0.0,
        support_growth: 0.0,
        compute_initial: 0.0,
        compute_growth: 0.0,
        compute_per_sim_year: 0.0,
    }
}

/// Trajectory where only net earnings are set.
pub fn trajectory_from_earnings(earnings: &[f64]) -> Trajectory {
    let mut trajectory = Trajectory::with_capacity(earnings.len());
    for value in earnings {
        let mut month = [0.0; Metric::COUNT];
        month[Metric::NetEarnings.index()] = *value;
        trajectory.months.push(month);
    }
    trajectory
}

/// Trajectory from `(revenue, costs, headcount, salary)` rows. Net earnings
/// are revenue minus costs.
pub fn trajectory_from_rows(rows: &[(f64, f64, f64, f64)]) -> Trajectory {
    let mut trajectory = Trajectory::with_capacity(rows.len());
    for (revenue, costs, headcount, salary) in rows {
        let mut month = [0.0; Metric::COUNT];
        month[Metric::TotalRevenue.index()] = *revenue;
        month[Metric::TotalCosts.index()] = *costs;
        month[Metric::Headcount.index()] = *headcount;
        month[Metric::Salary.index()] = *salary;
        month[Metric::NetEarnings.index()] = revenue - costs;
        trajectory.months.push(month);
    }
    trajectory
}
