//! HTTP request execution: the client seam, the run-scoped rate limiter and
//! the worker pool of request stages.
mod client;
mod rate;
mod stage;
mod workers;


pub use client::{DEFAULT_USER_AGENT, HttpClient, ReqwestClient};
pub use rate::{RateLimiter, build_rate_limiter};
pub use stage::RequestStage;
pub use workers::spawn_workers;
