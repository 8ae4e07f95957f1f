use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A per-month series tracked by every trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Customers,
    ChurnedCustomers,
    Headcount,
    Usage,
    SeatRevenue,
    UsageRevenue,
    TotalRevenue,
    Hosting,
    Software,
    Admin,
    Conference,
    Salary,
    Support,
    Compute,
    FixedCosts,
    VariableCosts,
    TotalCosts,
    NetEarnings,
}

impl Metric {
    pub const COUNT: usize = 18;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Customers,
        Metric::ChurnedCustomers,
        Metric::Headcount,
        Metric::Usage,
        Metric::SeatRevenue,
        Metric::UsageRevenue,
        Metric::TotalRevenue,
        Metric::Hosting,
        Metric::Software,
        Metric::Admin,
        Metric::Conference,
        Metric::Salary,
        Metric::Support,
        Metric::Compute,
        Metric::FixedCosts,
        Metric::VariableCosts,
        Metric::TotalCosts,
        Metric::NetEarnings,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Customers => "customers",
            Metric::ChurnedCustomers => "churned-customers",
            Metric::Headcount => "headcount",
            Metric::Usage => "usage",
            Metric::SeatRevenue => "seat-revenue",
            Metric::UsageRevenue => "usage-revenue",
            Metric::TotalRevenue => "total-revenue",
            Metric::Hosting => "hosting",
            Metric::Software => "software",
            Metric::Admin => "admin",
            Metric::Conference => "conference",
            Metric::Salary => "salary",
            Metric::Support => "support",
            Metric::Compute => "compute",
            Metric::FixedCosts => "fixed-costs",
            Metric::VariableCosts => "variable-costs",
            Metric::TotalCosts => "total-costs",
            Metric::NetEarnings => "net-earnings",
        }
    }

    /// Whether values are counts rather than currency.
    pub fn is_count(self) -> bool {
        matches!(
            self,
            Metric::Customers | Metric::ChurnedCustomers | Metric::Headcount
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == value)
            .ok_or_else(|| format!("unknown metric: {value}"))
    }
}
