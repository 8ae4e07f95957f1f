use std::path::PathBuf;

use crate::commands::base_commands::CommandError;
use crate::domain::scenario::Scenario;
use crate::services::scenario_yaml::serialize_scenario_to_yaml;

pub fn defaults_command(output: &str) -> Result<(), CommandError> {
    let write_error = |source: std::io::Error| CommandError::Write {
        path: PathBuf::from(output),
        source,
    };
    let mut buffer = Vec::new();
    serialize_scenario_to_yaml(&mut buffer, &Scenario::default()).map_err(write_error)?;
    std::fs::write(output, buffer).map_err(write_error)?;
    println!("Default scenario written to {output}");
    Ok(())
}
