//! Core library for the `httpload` CLI.
//!
//! A load test is a pipeline: a URL source feeds a pool of rate-limited
//! request workers whose results are collected by a single sink and reduced
//! to a statistics report. The building blocks are exposed so the pipeline
//! can be driven with custom sources and HTTP clients.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pipeline;
pub mod source;

mod logger;
mod shutdown;

#[cfg(test)]
mod test_support;
