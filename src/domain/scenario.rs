use crate::domain::parameters::{CostParameters, ParameterError, RevenueParameters};
use crate::domain::simulation_config::SimulationConfig;

/// Everything one forecast run needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scenario {
    pub revenue: RevenueParameters,
    pub costs: CostParameters,
    pub simulation: SimulationConfig,
}

/// Command line values that take precedence over the scenario file.
#[derive(Debug, Clone, Default)]
pub struct ScenarioOverrides {
    pub months: Option<u32>,
    pub simulations: Option<u32>,
    pub seed: Option<u64>,
}

impl Scenario {
    pub fn apply(&mut self, overrides: &ScenarioOverrides) {
        if let Some(months) = overrides.months {
            self.simulation.months = months;
        }
        if let Some(simulations) = overrides.simulations {
            self.simulation.simulations = simulations;
        }
        if overrides.seed.is_some() {
            self.simulation.seed = overrides.seed;
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.simulation.validate()?;
        self.revenue.validate(self.simulation.months)?;
        self.costs.validate(self.simulation.months)
    }
}
