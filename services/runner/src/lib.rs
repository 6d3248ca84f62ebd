pub mod cli;
pub mod config;
pub mod params;
pub mod report;
pub mod scenarios;

pub use cli::{Cli, Command};
pub use config::{Config, LogFormat, OutputFormat};
pub use report::ScenarioReport;
pub use scenarios::{execute, Findings, RunContext, Scenario};
