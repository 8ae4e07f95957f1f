mod commands;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::completions_cmd::completions_command;
use crate::commands::defaults_cmd::defaults_command;
use crate::commands::export_cmd::export_command;
use crate::commands::plot_cmd::plot_command;
use crate::commands::simulate_cmd::simulate_command;
use crate::services::telemetry::init_tracing;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing();

    let outcome = match args.command {
        Commands::Simulate { scenario, output } => simulate_command(&scenario, &output),
        Commands::Export { scenario, output } => export_command(&scenario, &output),
        Commands::Plot {
            scenario,
            output,
            metric,
        } => plot_command(&scenario, &output, metric),
        Commands::Defaults { output } => defaults_command(&output),
        Commands::Completions { shell } => {
            completions_command(shell);
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
