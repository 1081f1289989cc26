//! Command line front end for portsim_core
//!
//! - `cli` - argument definitions and position parsing
//! - `config` - optional YAML run configuration
//! - `loader` - historical return CSV loading
//! - `logging` - tracing subscriber setup
//! - `report` - console output

pub mod cli;
pub mod config;
pub mod loader;
pub mod logging;
pub mod report;

pub use logging::init_logging;

#[cfg(test)]
mod tests;
