//! datacleanse - Clean up delimited tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use datacleanse::config::{CollisionPolicy, PipelineConfig, ReportFormat, DEFAULT_LOG_FILE};
use datacleanse::logging::{init_logging, TracingReporter};
use datacleanse::output::render_to_stdout;
use datacleanse::Pipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Terminal,
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Terminal => ReportFormat::Terminal,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCollisionPolicy {
    Error,
    Suffix,
}

impl From<CliCollisionPolicy> for CollisionPolicy {
    fn from(p: CliCollisionPolicy) -> Self {
        match p {
            CliCollisionPolicy::Error => CollisionPolicy::Error,
            CliCollisionPolicy::Suffix => CollisionPolicy::Suffix,
        }
    }
}

/// Standardize, cleanse and validate a delimited data file
#[derive(Parser, Debug)]
#[command(name = "datacleanse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file to read
    input: PathBuf,

    /// Output file to write
    output: PathBuf,

    /// Field delimiter for input and output
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Cell text(s) read as missing values (comma-separated, replaces the defaults)
    #[arg(long = "na-value", value_delimiter = ',')]
    na_values: Vec<String>,

    /// What to do when two columns standardize to the same name
    #[arg(long, value_enum, default_value = "error")]
    on_collision: CliCollisionPolicy,

    /// Append-only log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Run report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliReportFormat,

    /// Do not print the run report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1), // Pipeline failed; details are in the log
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    if !cli.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }

    let mut config = PipelineConfig::new()
        .with_delimiter(cli.delimiter as u8)
        .with_collision_policy(cli.on_collision.into())
        .with_report_format(cli.format.into())
        .with_log_file(cli.log_file);
    if !cli.na_values.is_empty() {
        config = config.with_na_values(cli.na_values);
    }

    let _guard = init_logging(&config.log_file)?;

    let reporter = TracingReporter;
    let report_format = config.report_format;
    let outcome = Pipeline::new(config, &reporter).run(&cli.input, &cli.output);

    if !cli.quiet {
        render_to_stdout(&outcome, &cli.input, &cli.output, report_format)?;
    }

    Ok(outcome.is_ok())
}
