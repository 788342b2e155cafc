//! Per-file statistics run: load, validate, evaluate, report.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use commstats_core::{Metric, StatisticsEngine, StatsError};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::StatsConfig;
use crate::loader;
use crate::output::{CliError, OutputMode, Renderable, render_error, render_list};

/// One metric line of a [`FileReport`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricValue {
    /// Acronym, e.g. `CH` or `SP(4)`.
    pub metric: String,
    pub label: String,
    /// `None` when the metric is not defined for this matrix.
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Every configured metric for one matrix file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub dimension: usize,
    pub metrics: Vec<MetricValue>,
}

impl FileReport {
    /// Evaluate `metrics` against `engine`.
    ///
    /// A metric that is undefined for this matrix (e.g. NBC on a 1x1
    /// matrix) is recorded with its reason instead of failing the file.
    #[must_use]
    pub fn build(path: &Path, engine: &StatisticsEngine, metrics: &[Metric]) -> Self {
        let metrics = metrics
            .iter()
            .map(|&metric| {
                let (value, error) = match engine.evaluate(metric) {
                    Ok(value) => (Some(value), None),
                    Err(err) => (None, Some(err.to_string())),
                };
                MetricValue {
                    metric: metric.acronym(),
                    label: metric.label(),
                    value,
                    error,
                }
            })
            .collect();

        Self {
            path: path.display().to_string(),
            dimension: engine.dim(),
            metrics,
        }
    }
}

fn format_value(metric: &MetricValue) -> String {
    match (metric.value, &metric.error) {
        (Some(value), _) => format!("{value:?}"),
        (None, Some(reason)) => format!("n/a ({reason})"),
        (None, None) => "n/a".to_string(),
    }
}

impl Renderable for FileReport {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "*** Communication statistics for {} ***", self.path)?;
        for metric in &self.metrics {
            writeln!(w, "{}:\t{}", metric.label, format_value(metric))?;
        }
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        for metric in &self.metrics {
            let value = metric
                .value
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:?}"));
            writeln!(w, "{}\t{}\t{}", self.path, metric.metric, value)?;
        }
        Ok(())
    }

    fn table_headers() -> &'static [&'static str] {
        &["path", "metric", "value"]
    }
}

/// Why a file produced no report.
#[derive(Debug)]
pub enum FileFailure {
    Load(anyhow::Error),
    Invalid(StatsError),
}

impl FileFailure {
    fn to_cli_error(&self, path: &Path) -> CliError {
        match self {
            Self::Load(err) => CliError::with_details(
                format!("{err:#}"),
                "check that the file exists and holds comma-separated numbers",
                "load_failed",
            ),
            Self::Invalid(err) => {
                let mut cli = CliError::from(err);
                cli.message = format!("{}: {}", path.display(), cli.message);
                cli
            }
        }
    }
}

/// Load and validate one file, then evaluate the configured metrics.
///
/// # Errors
///
/// Returns a [`FileFailure`] if the file cannot be loaded or the matrix is
/// rejected by validation.
pub fn process_file(
    path: &Path,
    config: &StatsConfig,
    metrics: &[Metric],
) -> Result<FileReport, FileFailure> {
    let rows = loader::load_matrix(path, config.delimiter_byte()).map_err(FileFailure::Load)?;
    let engine = StatisticsEngine::from_rows(rows).map_err(FileFailure::Invalid)?;
    info!(path = %path.display(), dim = engine.dim(), "computing statistics");
    Ok(FileReport::build(path, &engine, metrics))
}

/// Process every file and render the reports.
///
/// Files are handled in order. A failing file is reported on stderr and
/// skipped; with `fail_fast` the run stops at the first failure. Reports for
/// files processed so far are always rendered.
///
/// # Errors
///
/// Fails only if writing the output fails.
pub fn run_stats(
    files: &[PathBuf],
    config: &StatsConfig,
    output: OutputMode,
) -> anyhow::Result<ExitCode> {
    let metrics = Metric::standard_set(&config.split_sizes);
    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0_usize;

    for path in files {
        match process_file(path, config, &metrics) {
            Ok(report) => reports.push(report),
            Err(failure) => {
                failed += 1;
                warn!(path = %path.display(), "skipping file: {failure:?}");
                render_error(output, &failure.to_cli_error(path), &mut io::stderr().lock())?;
                if config.fail_fast {
                    break;
                }
            }
        }
    }

    render_list(&reports, output, &mut io::stdout().lock())?;

    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(rows: Vec<Vec<f64>>) -> StatisticsEngine {
        StatisticsEngine::from_rows(rows).expect("valid test matrix")
    }

    #[test]
    fn report_covers_every_metric_in_order() {
        let e = engine(vec![vec![1.0; 4]; 4]);
        let report = FileReport::build(Path::new("m.csv"), &e, &Metric::standard_set(&[2, 4]));
        let names: Vec<&str> = report.metrics.iter().map(|m| m.metric.as_str()).collect();
        assert_eq!(
            names,
            vec!["CH", "CHv2", "CA", "CB", "CBv2", "CC", "NBC", "SP(2)", "SP(4)"]
        );
        assert_eq!(report.dimension, 4);
        assert!(report.metrics.iter().all(|m| m.value.is_some()));
    }

    #[test]
    fn undefined_metric_is_reported_not_fatal() {
        let e = engine(vec![vec![2.0]]);
        let report = FileReport::build(Path::new("one.csv"), &e, &Metric::standard_set(&[2]));
        let nbc = report
            .metrics
            .iter()
            .find(|m| m.metric == "NBC")
            .expect("NBC line present");
        assert!(nbc.value.is_none());
        assert!(nbc.error.as_deref().is_some_and(|e| e.contains(">= 2")));

        let ca = report.metrics.iter().find(|m| m.metric == "CA").expect("CA");
        assert_eq!(ca.value, Some(2.0));
    }

    #[test]
    fn human_rendering_matches_driver_layout() {
        let e = engine(vec![vec![1.0; 2]; 2]);
        let report = FileReport::build(Path::new("m.csv"), &e, &[Metric::Amount]);
        let mut buf = Vec::new();
        report.render_human(&mut buf).expect("write to vec");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "*** Communication statistics for m.csv ***\nCommunication amount (CA):\t1.0\n\n"
        );
    }

    #[test]
    fn table_rendering_is_tab_separated() {
        let e = engine(vec![vec![1.0; 2]; 2]);
        let report = FileReport::build(Path::new("m.csv"), &e, &[Metric::SplitFraction(2)]);
        let mut buf = Vec::new();
        report.render_table(&mut buf).expect("write to vec");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "m.csv\tSP(2)\t0.0\n");
    }

    #[test]
    fn invalid_matrix_failure_carries_code() {
        let failure = FileFailure::Invalid(StatsError::NotSquare { rows: 2, cols: 3 });
        let cli = failure.to_cli_error(Path::new("bad.csv"));
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.starts_with("bad.csv: "));
    }
}
