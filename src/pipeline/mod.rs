//! Wiring of one load-test run: URL source, worker pool, result sink and the
//! error merger, driven by [`LoadTester`].
mod config;
mod merge;
mod orchestrator;
mod sink;


pub use config::{ErrorReceiver, RunConfig, UrlReceiver};
pub use merge::merge_errors;
pub use orchestrator::{LoadTester, RunOutcome, RunState};
pub use sink::collect_results;
