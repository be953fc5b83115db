use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::args::{LoadArgs, OutputFormat};
use crate::error::AppResult;
use crate::http::ReqwestClient;
use crate::metrics::{Report, ResultSet};
use crate::pipeline::{LoadTester, RunOutcome};

use super::LoadPlan;

/// Runs one load test and prints its report to stdout.
///
/// A cancelled run still prints the report of what was collected.
///
/// # Errors
///
/// Returns an error when the arguments are invalid, the client cannot be
/// built, the run fails or the report cannot be written.
pub async fn run_load(args: &LoadArgs) -> AppResult<()> {
    let plan = LoadPlan::from_args(args)?;
    let output_format = plan.output_format;
    let client = ReqwestClient::new(plan.timeout)?;

    let cancel = CancellationToken::new();
    let signal_handle = crate::shutdown::setup_signal_handler(&cancel);

    let tester = LoadTester::new(plan, Arc::new(client));
    let outcome = tester.run(&cancel).await;

    cancel.cancel();
    if let Err(err) = signal_handle.await {
        debug!("Signal handler join failed: {}", err);
    }

    match outcome {
        RunOutcome::Completed(results) => print_report(&results, output_format),
        RunOutcome::Cancelled(results) => {
            warn!(
                "Run was cancelled; the report covers {} partial result(s).",
                results.len()
            );
            print_report(&results, output_format)
        }
        RunOutcome::Failed { error, partial } => {
            error!(
                "Load test failed after {} result(s): {}",
                partial.len(),
                error
            );
            Err(error)
        }
    }
}

fn print_report(results: &ResultSet, format: OutputFormat) -> AppResult<()> {
    let report = Report::from_results(results);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report.write_to(&mut out, format)
}
