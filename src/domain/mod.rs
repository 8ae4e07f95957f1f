pub mod growth;
pub mod metric;
pub mod parameters;
pub mod scenario;
pub mod simulation_config;
pub mod trajectory;
