//! The command-line load test: turns parsed arguments into a run plan,
//! executes it and prints the report.
mod plan;
mod runner;


pub use plan::{DEFAULT_REQUESTS, LoadPlan};
pub use runner::run_load;
