//! The presenting boundary: turn a normalized [`Table`] (or the error that
//! stood in for one) into user-facing output.
//!
//! [`report`] is a pure function of its inputs, so the CLI and GUI share it
//! and tests can run it without any widget framework. Chart construction
//! failures and missing-column conditions are downgraded to warnings here;
//! they never abort the rest of the report.

use crate::error::Error;
use crate::models::{Observation, Table};
use crate::{stats, viz};
use std::path::PathBuf;

/// Where and how large to render the chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            width: 1000,
            height: 600,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Number of preview rows; 0 disables the preview.
    pub preview_rows: usize,
    /// Display the mean of the value column (the CSO dashboards always do).
    pub show_mean: bool,
    pub chart: Option<ChartSpec>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            show_mean: false,
            chart: None,
        }
    }
}

/// Rendered outcome of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub status: String,
    pub warnings: Vec<String>,
    /// Preformatted preview lines (`date  category  value`).
    pub preview: Vec<String>,
    /// Formatted mean, when requested.
    pub mean: Option<String>,
    /// Path of the written chart, when one was produced.
    pub chart: Option<PathBuf>,
}

fn format_row(row: &Observation) -> String {
    let value = match row.value {
        Some(v) if v.is_finite() => format!("{v}"),
        _ => ":".to_string(),
    };
    format!("{}  {}  {}", row.date, row.category, value)
}

/// Present a normalized table.
pub fn report(table: &Table, opts: &ReportOptions) -> Report {
    let mut out = Report {
        status: match &table.label {
            Some(label) => format!("{}: {} observations retrieved", label, table.len()),
            None => format!("{} observations retrieved", table.len()),
        },
        ..Report::default()
    };

    if table.is_empty() {
        out.warnings
            .push("No observations to display.".to_string());
    } else if let Some(spec) = &opts.chart {
        match viz::plot_lines(table, &spec.path, spec.width, spec.height) {
            Ok(()) => out.chart = Some(spec.path.clone()),
            Err(e) => out.warnings.push(format!("Chart skipped: {e}")),
        }
    }

    out.preview = table
        .head(opts.preview_rows)
        .iter()
        .map(format_row)
        .collect();

    if opts.show_mean {
        out.mean = Some(stats::format_mean(stats::mean(table)));
    }

    out
}

/// Present the outcome of a fetch+normalize run, degrading gracefully.
///
/// Missing columns warn instead of failing; any other error becomes the
/// report's status line. Either way the caller gets a usable [`Report`].
pub fn report_result(result: Result<Table, Error>, opts: &ReportOptions) -> Report {
    match result {
        Ok(table) => report(&table, opts),
        Err(Error::MissingColumns(cols)) => Report {
            status: "Data retrieved, but it cannot be charted.".to_string(),
            warnings: vec![format!(
                "The dataset doesn't contain required columns ({}). Adapt the plot accordingly.",
                cols.join(", ")
            )],
            ..Report::default()
        },
        Err(e) => Report {
            status: "Failed to retrieve data. Check the dataset code and internet connection."
                .to_string(),
            warnings: vec![e.to_string()],
            ..Report::default()
        },
    }
}
