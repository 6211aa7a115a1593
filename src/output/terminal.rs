//! Colored terminal run report

use std::path::Path;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::pipeline::{PipelineFailure, RunOutcome, RunReport};

use super::ReportFormatter;

/// Terminal report with colors
pub struct TerminalReport;

impl TerminalReport {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, writer: &mut dyn WriteColor, input: &Path, output: &Path) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            writer,
            " datacleanse: {} → {}",
            input.display(),
            output.display()
        )?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_status(&self, writer: &mut dyn WriteColor, color: Color, text: &str) -> Result<()> {
        writer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(writer, "{}", text)?;
        writer.reset()?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_success(&self, report: &RunReport, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_status(writer, Color::Green, "Pipeline completed successfully")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Rows: {} loaded, {} written ({} duplicates removed)",
            report.rows_loaded, report.rows_written, report.cleanse.duplicates_removed
        )?;
        writeln!(
            writer,
            "Filled: {} with column median, {} with empty string",
            report.cleanse.median_filled, report.cleanse.empty_filled
        )?;
        if report.rules_checked.is_empty() {
            writeln!(writer, "Rules checked: none applicable")?;
        } else {
            writeln!(writer, "Rules checked: {}", report.rules_checked.join(", "))?;
        }
        writeln!(writer)?;
        writeln!(writer, "{}", column_table(report))?;
        Ok(())
    }

    fn write_failure(&self, failure: &PipelineFailure, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_status(
            writer,
            Color::Red,
            &format!("Pipeline failed at {} stage", failure.stage),
        )?;
        writeln!(writer, "  {}: {}", failure.error.kind(), failure.error)?;
        Ok(())
    }
}

impl Default for TerminalReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TerminalReport {
    fn render(
        &self,
        outcome: &RunOutcome,
        input: &Path,
        output: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        self.write_header(writer, input, output)?;
        match outcome {
            Ok(report) => self.write_success(report, writer),
            Err(failure) => self.write_failure(failure, writer),
        }
    }
}

fn column_table(report: &RunReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["column", "renamed from", "type"]);
    for column in &report.columns {
        builder.push_record([
            column.name.clone(),
            format!("{:?}", column.original),
            column.inferred_type.to_string(),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}
