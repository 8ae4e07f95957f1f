use crate::commands::base_commands::{load_scenario, CommandError, ScenarioArgs};
use crate::services::band_plot::{write_band_chart_png, BandSeries};
use crate::services::monte_carlo::run_forecast;

pub fn plot_command(
    args: &ScenarioArgs,
    output: &str,
    series: BandSeries,
) -> Result<(), CommandError> {
    let scenario = load_scenario(args)?;
    let result = run_forecast(&scenario.revenue, &scenario.costs, &scenario.simulation)?;
    write_band_chart_png(output, &result, series)?;
    println!("{series} band chart written to {output}");
    Ok(())
}
