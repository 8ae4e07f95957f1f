use rand::Rng;
use rand_distr::{Binomial, Distribution, LogNormal};

use crate::domain::growth::{CostGrowthPeriod, GrowthSchedule, HiringPolicy};
use crate::domain::metric::Metric;
use crate::domain::parameters::{CostParameters, RevenueParameters};
use crate::domain::simulation_config::SimulationConfig;
use crate::domain::trajectory::{MonthValues, Trajectory, TrialDiagnostic};

/// Customer or headcount level above which a trial is considered degenerate.
pub const POPULATION_CEILING: f64 = 1e9;
/// Upper bound for a single month's churn rate draw.
pub const CHURN_RATE_CAP: f64 = 0.5;

/// Runs the monthly recurrence of one trial.
///
/// The simulator only borrows the parameters, so one instance can be shared
/// by every trial of an ensemble. All randomness comes from the generator
/// handed to [`TrialSimulator::simulate`].
#[derive(Debug, Clone, Copy)]
pub struct TrialSimulator<'a> {
    revenue: &'a RevenueParameters,
    costs: &'a CostParameters,
    cost_growth_period: CostGrowthPeriod,
    hiring_policy: HiringPolicy,
}

#[derive(Debug, Default)]
struct TrialState {
    customers: u64,
    headcount: u64,
    churned: u64,
    usage: f64,
}

impl<'a> TrialSimulator<'a> {
    pub fn new(revenue: &'a RevenueParameters, costs: &'a CostParameters) -> Self {
        Self {
            revenue,
            costs,
            cost_growth_period: CostGrowthPeriod::default(),
            hiring_policy: HiringPolicy::default(),
        }
    }

    pub fn from_config(
        revenue: &'a RevenueParameters,
        costs: &'a CostParameters,
        config: &SimulationConfig,
    ) -> Self {
        Self::new(revenue, costs)
            .with_cost_growth_period(config.cost_growth_period)
            .with_hiring_policy(config.hiring_policy)
    }

    pub fn with_cost_growth_period(mut self, period: CostGrowthPeriod) -> Self {
        self.cost_growth_period = period;
        self
    }

    pub fn with_hiring_policy(mut self, policy: HiringPolicy) -> Self {
        self.hiring_policy = policy;
        self
    }

    pub fn simulate<R: Rng + ?Sized>(
        &self,
        trial: usize,
        horizon: u32,
        rng: &mut R,
    ) -> Result<Trajectory, TrialDiagnostic> {
        let customer_schedule = GrowthSchedule::new(
            self.revenue.customer_growth_median,
            self.revenue.customer_growth_accel,
            self.revenue.customer_delay,
        );
        let headcount_schedule = GrowthSchedule::new(
            self.costs.headcount_growth_median,
            self.costs.headcount_growth_accel,
            self.costs.headcount_delay,
        );

        let mut state = TrialState {
            headcount: u64::from(self.costs.initial_headcount),
            ..TrialState::default()
        };
        let mut trajectory = Trajectory::with_capacity(horizon as usize);

        for month_index in 0..horizon {
            let diagnostic = |reason: String| TrialDiagnostic {
                trial,
                month: month_index as usize + 1,
                reason,
            };

            self.advance_month(
                month_index,
                &customer_schedule,
                &headcount_schedule,
                &mut state,
                rng,
            )
            .map_err(diagnostic)?;

            let values = self.month_values(month_index, &state);
            if let Some(metric) = Metric::ALL
                .into_iter()
                .find(|metric| !values[metric.index()].is_finite())
            {
                return Err(diagnostic(format!("{metric} is not finite")));
            }
            trajectory.months.push(values);
        }

        Ok(trajectory)
    }

    fn advance_month<R: Rng + ?Sized>(
        &self,
        month_index: u32,
        customer_schedule: &GrowthSchedule,
        headcount_schedule: &GrowthSchedule,
        state: &mut TrialState,
        rng: &mut R,
    ) -> Result<(), String> {
        // Churn is taken from the customers carried over, before new adds.
        state.churned = draw_churn(
            state.customers,
            self.revenue.monthly_churn_median,
            self.revenue.monthly_churn_sigma,
            rng,
        )?;
        state.customers = state.customers.saturating_sub(state.churned);

        let customer_adds = draw_adds(
            customer_schedule.median_adds(month_index),
            self.revenue.customer_growth_sigma,
            rng,
        )?;
        state.customers = checked_population("customers", state.customers, customer_adds)?;

        let hiring_median = headcount_schedule
            .median_adds(month_index)
            .map(|median| self.hiring_policy.effective_median(state.headcount, median));
        let hires = draw_adds(hiring_median, self.costs.headcount_growth_sigma, rng)?;
        state.headcount = checked_population("headcount", state.headcount, hires)?;

        state.usage = draw_usage(
            state.customers,
            self.revenue.sim_year_revenue_mean,
            self.revenue.sim_year_revenue_sigma,
            rng,
        )?;
        Ok(())
    }

    fn month_values(&self, month_index: u32, state: &TrialState) -> MonthValues {
        let revenue = self.revenue;
        let costs = self.costs;
        let growth = |rate: f64| self.cost_growth_period.factor(rate, month_index);
        let customers = state.customers as f64;
        let headcount = state.headcount as f64;

        let seat_revenue = customers * f64::from(revenue.avg_seats) * revenue.seat_fee;
        let usage_revenue = state.usage * revenue.revenue_per_sim_year;

        let hosting = costs.hosting_initial * growth(costs.hosting_growth);
        let software = costs.software_initial * growth(costs.software_growth);
        let salary = headcount * costs.salary_per_person;
        let support = customers * costs.support_customer_initial * growth(costs.support_growth);
        let compute = costs.compute_initial * growth(costs.compute_growth)
            + state.usage * costs.compute_per_sim_year;

        let fixed_costs =
            hosting + software + costs.admin_monthly + costs.conference_monthly + salary;
        let variable_costs = compute + support;
        let total_revenue = seat_revenue + usage_revenue;
        let total_costs = fixed_costs + variable_costs;

        let mut values = [0.0; Metric::COUNT];
        values[Metric::Customers.index()] = customers;
        values[Metric::ChurnedCustomers.index()] = state.churned as f64;
        values[Metric::Headcount.index()] = headcount;
        values[Metric::Usage.index()] = state.usage;
        values[Metric::SeatRevenue.index()] = seat_revenue;
        values[Metric::UsageRevenue.index()] = usage_revenue;
        values[Metric::TotalRevenue.index()] = total_revenue;
        values[Metric::Hosting.index()] = hosting;
        values[Metric::Software.index()] = software;
        values[Metric::Admin.index()] = costs.admin_monthly;
        values[Metric::Conference.index()] = costs.conference_monthly;
        values[Metric::Salary.index()] = salary;
        values[Metric::Support.index()] = support;
        values[Metric::Compute.index()] = compute;
        values[Metric::FixedCosts.index()] = fixed_costs;
        values[Metric::VariableCosts.index()] = variable_costs;
        values[Metric::TotalCosts.index()] = total_costs;
        values[Metric::NetEarnings.index()] = total_revenue - total_costs;
        values
    }
}

/// Lognormal draw with the given median. A zero median always yields zero and
/// a zero sigma yields the median itself without touching the generator.
fn draw_lognormal<R: Rng + ?Sized>(median: f64, sigma: f64, rng: &mut R) -> Result<f64, String> {
    if median <= 0.0 {
        return Ok(0.0);
    }
    if sigma == 0.0 {
        return Ok(median);
    }
    let distribution = LogNormal::new(median.ln(), sigma)
        .map_err(|e| format!("invalid lognormal (median {median}, sigma {sigma}): {e}"))?;
    Ok(distribution.sample(rng))
}

fn draw_adds<R: Rng + ?Sized>(
    median: Option<f64>,
    sigma: f64,
    rng: &mut R,
) -> Result<u64, String> {
    let Some(median) = median else {
        return Ok(0);
    };
    let adds = draw_lognormal(median, sigma, rng)?.round();
    if !adds.is_finite() || adds > POPULATION_CEILING {
        return Err(format!("monthly adds of {adds} exceed the population ceiling"));
    }
    Ok(adds as u64)
}

fn draw_churn<R: Rng + ?Sized>(
    customers: u64,
    median: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<u64, String> {
    if customers == 0 {
        return Ok(0);
    }
    let rate = draw_lognormal(median, sigma, rng)?.min(CHURN_RATE_CAP);
    if rate <= 0.0 {
        return Ok(0);
    }
    let binomial = Binomial::new(customers, rate)
        .map_err(|e| format!("invalid churn draw ({customers} customers, rate {rate}): {e}"))?;
    Ok(binomial.sample(rng))
}

/// Total usage of `customers` customers for one month, as a single lognormal
/// draw whose mean and variance equal those of the sum of independent
/// per-customer draws with median `mean` and volatility `sigma`.
pub(crate) fn draw_usage<R: Rng + ?Sized>(
    customers: u64,
    mean: f64,
    sigma: f64,
    rng: &mut R,
) -> Result<f64, String> {
    if customers == 0 || mean <= 0.0 {
        return Ok(0.0);
    }
    let n = customers as f64;
    if sigma == 0.0 {
        return Ok(n * mean);
    }
    let variance = sigma * sigma;
    let sum_variance = (variance.exp_m1() / n).ln_1p();
    let sum_mu = (n * mean).ln() + variance / 2.0 - sum_variance / 2.0;
    let distribution = LogNormal::new(sum_mu, sum_variance.sqrt())
        .map_err(|e| format!("invalid usage draw ({customers} customers): {e}"))?;
    Ok(distribution.sample(rng))
}

fn checked_population(name: &str, current: u64, adds: u64) -> Result<u64, String> {
    let total = current.saturating_add(adds);
    if total as f64 > POPULATION_CEILING {
        return Err(format!("{name} of {total} exceed the population ceiling"));
    }
    Ok(total)
}
