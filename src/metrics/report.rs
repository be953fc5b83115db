use std::io::Write;

use serde::Serialize;

use crate::args::OutputFormat;
use crate::error::AppResult;

use super::{
    LatencyPercentiles, PercentileValue, ResultSet, StatusCount, TimingSummary,
    status_distribution,
};

const SUMMARY_HEADER: &str = "Summary:";
const STATUS_HEADER: &str = "Status code distribution:";
const PERCENTILES_HEADER: &str = "Request response times:";

/// Statistics over one result set, ready to render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub summary: Option<TimingSummary>,
    pub status_codes: Vec<StatusCount>,
    pub percentiles: Vec<PercentileValue>,
}

impl Report {
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        Self {
            summary: TimingSummary::from_results(results),
            status_codes: status_distribution(results),
            percentiles: LatencyPercentiles::from_results(results)
                .map(|percentiles| percentiles.values)
                .unwrap_or_default(),
        }
    }

    /// Total number of results counted by the status histogram.
    #[must_use]
    pub fn total_responses(&self) -> u64 {
        self.status_codes
            .iter()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.count))
    }

    #[must_use]
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        push_section(&mut lines, SUMMARY_HEADER, self.summary_lines());

        let status_lines = self
            .status_codes
            .iter()
            .map(|entry| format!("[{:>3}] {:>12} response(s)", entry.status, entry.count))
            .collect();
        push_section(&mut lines, STATUS_HEADER, status_lines);

        let percentile_lines = self
            .percentiles
            .iter()
            .map(|value| format!("{}% in {:>12.4} secs", value.percentile, value.secs))
            .collect();
        push_section(&mut lines, PERCENTILES_HEADER, percentile_lines);

        lines
    }

    fn summary_lines(&self) -> Vec<String> {
        let Some(summary) = self.summary.as_ref() else {
            return Vec::new();
        };
        vec![
            format!("Total:        {:>12.4} secs", summary.total_secs),
            format!("Slowest:      {:>12.4} secs", summary.slowest_secs),
            format!("Fastest:      {:>12.4} secs", summary.fastest_secs),
            format!("Average:      {:>12.4} secs", summary.average_secs),
            format!("Requests/sec: {:>12.4}", summary.requests_per_sec),
        ]
    }

    /// Renders the report in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error when JSON serialization fails.
    pub fn render(&self, format: OutputFormat) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                let mut out = String::new();
                for line in self.text_lines() {
                    out.push_str(&line);
                    out.push('\n');
                }
                Ok(out)
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Writes the rendered report to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error when rendering or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, format: OutputFormat) -> AppResult<()> {
        let rendered = self.render(format)?;
        writer.write_all(rendered.as_bytes())?;
        if matches!(format, OutputFormat::Json) {
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn push_section(lines: &mut Vec<String>, header: &str, body: Vec<String>) {
    lines.push(header.to_owned());
    lines.push(String::new());
    lines.extend(body);
    lines.push(String::new());
}
