pub mod commands;
pub mod console;
pub mod telemetry;
pub mod utils;
