//! Save stage and run report rendering

mod csv;
mod json;
mod terminal;

use std::path::Path;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::{PipelineConfig, ReportFormat};
use crate::error;
use crate::logging::Reporter;
use crate::model::Table;
use crate::pipeline::RunOutcome;

pub use self::csv::CsvSaver;
pub use json::JsonReport;
pub use terminal::TerminalReport;

/// Save a table with the default saver
pub fn save_data(
    table: &Table,
    path: &Path,
    config: &PipelineConfig,
    reporter: &dyn Reporter,
) -> error::Result<()> {
    CsvSaver.save(table, path, config, reporter)
}

/// Trait for run report formatters
pub trait ReportFormatter {
    /// Render a run outcome to a writer
    fn render(
        &self,
        outcome: &RunOutcome,
        input: &Path,
        output: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<()>;
}

/// Factory for creating report formatters
pub struct ReportFactory;

impl ReportFactory {
    /// Create a formatter for the format type
    pub fn create(format: ReportFormat) -> Box<dyn ReportFormatter> {
        match format {
            ReportFormat::Terminal => Box::new(TerminalReport::new()),
            ReportFormat::Json => Box::new(JsonReport::new()),
        }
    }
}

/// Render a run outcome to stdout
pub fn render_to_stdout(
    outcome: &RunOutcome,
    input: &Path,
    output: &Path,
    format: ReportFormat,
) -> Result<()> {
    let formatter = ReportFactory::create(format);
    let choice = match format {
        ReportFormat::Terminal => ColorChoice::Auto,
        ReportFormat::Json => ColorChoice::Never,
    };
    let mut stdout = StandardStream::stdout(choice);
    formatter.render(outcome, input, output, &mut stdout)
}
