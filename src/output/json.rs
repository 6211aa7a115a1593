//! JSON run report

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use termcolor::WriteColor;

use crate::pipeline::{RunOutcome, RunReport, Stage};

use super::ReportFormatter;

/// JSON report formatter
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum JsonOutcome<'a> {
    Success { report: &'a RunReport },
    Failed {
        input: String,
        output: String,
        stage: Stage,
        kind: &'static str,
        error: String,
    },
}

impl ReportFormatter for JsonReport {
    fn render(
        &self,
        outcome: &RunOutcome,
        input: &Path,
        output: &Path,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let json = match outcome {
            Ok(report) => JsonOutcome::Success { report },
            Err(failure) => JsonOutcome::Failed {
                input: input.display().to_string(),
                output: output.display().to_string(),
                stage: failure.stage,
                kind: failure.error.kind(),
                error: failure.error.to_string(),
            },
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &json)?;
        } else {
            serde_json::to_writer(&mut *writer, &json)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
