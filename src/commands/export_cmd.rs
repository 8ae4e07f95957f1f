use crate::commands::base_commands::{load_scenario, CommandError, ScenarioArgs};
use crate::services::monte_carlo::run_forecast;
use crate::services::result_table::{write_serialized, ResultTable};

pub fn export_command(args: &ScenarioArgs, output: &str) -> Result<(), CommandError> {
    let scenario = load_scenario(args)?;
    let result = run_forecast(&scenario.revenue, &scenario.costs, &scenario.simulation)?;
    let table = ResultTable::from_result_set(&result);
    write_serialized(output, &table)?;
    println!(
        "Result table with {} rows and {} columns written to {output}",
        table.rows.len(),
        table.columns.len()
    );
    Ok(())
}
