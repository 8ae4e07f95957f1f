pub mod base_commands;
pub mod completions_cmd;
pub mod defaults_cmd;
pub mod export_cmd;
pub mod plot_cmd;
pub mod report_format;
pub mod simulate_cmd;
