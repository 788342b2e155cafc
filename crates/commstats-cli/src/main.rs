#![forbid(unsafe_code)]

mod config;
mod loader;
mod output;
mod stats;

use clap::Parser;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "commstats: communication pattern statistics for cost matrices",
    long_about = "Compute heterogeneity, amount, balance, centrality, neighbor and split \
                  fractions for one or more square communication cost matrices stored as CSV.",
    after_help = "EXAMPLES:\n    # Report every metric for one matrix\n    commstats app.csv\n\n    # Only SP(4) and SP(16) as split fractions\n    commstats -k 4 -k 16 app.csv\n\n    # All matrices in a directory, stop at the first bad one\n    commstats --fail-fast matrices/*.csv\n\n    # Emit machine-readable output\n    commstats --json app.csv"
)]
struct Cli {
    /// Matrix files: one row per line, comma-separated costs.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Block size for the split fraction; repeat for several (default: 2, 4, 8).
    #[arg(
        short = 'k',
        long = "split-size",
        value_name = "K",
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    split_sizes: Vec<i64>,

    /// Stop at the first file that fails to load or validate.
    #[arg(long)]
    fail_fast: bool,

    /// Config file to use instead of ./commstats.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Field delimiter of the matrix files.
    #[arg(long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, hide = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            config_path: self.config.clone(),
            split_sizes: self.split_sizes.clone(),
            fail_fast: self.fail_fast,
            delimiter: self.delimiter,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COMMSTATS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "commstats=debug,info"
        } else {
            "commstats=info,warn"
        })
    });

    let format = env::var("COMMSTATS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the reports; logs always go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = env::current_dir()?;
    let config = config::resolve(&cli.overrides(), &cwd)?;
    let output = output::resolve_output_mode(cli.format, cli.json);
    debug!(files = cli.files.len(), ?output, "starting run");

    stats::run_stats(&cli.files, &config, output)
}
