use tracing::info;

use crate::commands::base_commands::{load_scenario, CommandError, ScenarioArgs};
use crate::commands::report_format::format_forecast_report;
use crate::services::monte_carlo::run_forecast;
use crate::services::result_table::write_serialized;

pub fn simulate_command(args: &ScenarioArgs, output: &str) -> Result<(), CommandError> {
    let scenario = load_scenario(args)?;
    let result = run_forecast(&scenario.revenue, &scenario.costs, &scenario.simulation)?;
    write_serialized(output, &result)?;
    info!(output, trials = result.trials, "forecast written");

    println!("{}", format_forecast_report(&result));
    println!();
    println!("Forecast result written to {output}");
    Ok(())
}
