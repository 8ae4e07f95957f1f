use serde::{Deserialize, Serialize};

/// Headcount above which the hiring damping kicks in.
pub const DEFAULT_HIRING_THRESHOLD: u64 = 15;
/// Multiplier applied to the scheduled hiring median above the threshold.
pub const DEFAULT_HIRING_DAMPING: f64 = 0.5;

/// Median number of adds per month, compounding with an acceleration factor
/// once the delay has passed.
///
/// Month indices are zero based: index `t` is month `t + 1` of the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSchedule {
    pub median: f64,
    pub accel: f64,
    pub delay: u32,
}

impl GrowthSchedule {
    pub fn new(median: f64, accel: f64, delay: u32) -> Self {
        Self {
            median,
            accel,
            delay,
        }
    }

    /// Scheduled median adds for `month_index`, or `None` while acquisition
    /// has not started yet.
    pub fn median_adds(&self, month_index: u32) -> Option<f64> {
        if month_index < self.delay {
            return None;
        }
        let elapsed = (month_index - self.delay) as i32;
        Some(self.median * (1.0 + self.accel).powi(elapsed))
    }
}

/// Policy applied to the headcount growth schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HiringPolicy {
    /// Hiring slows down once the team is larger than `threshold`.
    Damped { threshold: u64, factor: f64 },
    /// No slowdown at any team size.
    Unbounded,
}

impl Default for HiringPolicy {
    fn default() -> Self {
        HiringPolicy::Damped {
            threshold: DEFAULT_HIRING_THRESHOLD,
            factor: DEFAULT_HIRING_DAMPING,
        }
    }
}

impl HiringPolicy {
    pub fn effective_median(&self, headcount: u64, scheduled_median: f64) -> f64 {
        match *self {
            HiringPolicy::Damped { threshold, factor } if headcount > threshold => {
                scheduled_median * factor
            }
            _ => scheduled_median,
        }
    }
}

/// How often the cost growth rates compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostGrowthPeriod {
    #[default]
    Monthly,
    /// Compounds once every twelve months.
    Annual,
}

impl CostGrowthPeriod {
    pub fn factor(&self, rate: f64, month_index: u32) -> f64 {
        let periods = match self {
            CostGrowthPeriod::Monthly => month_index,
            CostGrowthPeriod::Annual => month_index / 12,
        };
        (1.0 + rate).powi(periods as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_adds_is_none_before_delay() {
        let schedule = GrowthSchedule::new(2.0, 0.1, 3);
        assert_eq!(schedule.median_adds(0), None);
        assert_eq!(schedule.median_adds(2), None);
        assert_eq!(schedule.median_adds(3), Some(2.0));
    }

    #[test]
    fn median_adds_compounds_from_the_delay() {
        let schedule = GrowthSchedule::new(2.0, 0.5, 1);
        assert_eq!(schedule.median_adds(1), Some(2.0));
        assert_eq!(schedule.median_adds(2), Some(3.0));
        assert_eq!(schedule.median_adds(3), Some(4.5));
    }

    #[test]
    fn damped_policy_halves_median_only_above_threshold() {
        let policy = HiringPolicy::default();
        assert_eq!(policy.effective_median(15, 4.0), 4.0);
        assert_eq!(policy.effective_median(16, 4.0), 2.0);
    }

    #[test]
    fn unbounded_policy_never_changes_median() {
        let policy = HiringPolicy::Unbounded;
        assert_eq!(policy.effective_median(1_000, 4.0), 4.0);
    }

    #[test]
    fn annual_growth_steps_every_twelve_months() {
        let period = CostGrowthPeriod::Annual;
        assert_eq!(period.factor(0.5, 0), 1.0);
        assert_eq!(period.factor(0.5, 11), 1.0);
        assert_eq!(period.factor(0.5, 12), 1.5);
        assert_eq!(period.factor(0.5, 24), 2.25);
    }

    #[test]
    fn monthly_growth_compounds_every_month() {
        let period = CostGrowthPeriod::Monthly;
        assert_eq!(period.factor(0.5, 0), 1.0);
        assert_eq!(period.factor(0.5, 2), 2.25);
    }
}
