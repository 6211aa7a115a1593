//! Delimited text saver

use std::borrow::Cow;
use std::io;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::logging::Reporter;
use crate::model::Table;

/// Writes a table as delimited text with a header row and no index column
pub struct CsvSaver;

impl CsvSaver {
    pub fn save(
        &self,
        table: &Table,
        path: &Path,
        config: &PipelineConfig,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        match write_table(table, path, config) {
            Ok(()) => {
                reporter.info(&format!("Data saved successfully to {}", path.display()));
                Ok(())
            }
            Err(source) => {
                let err = PipelineError::UnknownIo {
                    path: path.to_path_buf(),
                    source,
                };
                reporter.error(&format!("An error occurred while saving data: {}", err));
                Err(err)
            }
        }
    }
}

fn io_error(err: csv::Error) -> io::Error {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        _ => io::Error::new(io::ErrorKind::Other, message),
    }
}

fn write_table(table: &Table, path: &Path, config: &PipelineConfig) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_path(path)
        .map_err(io_error)?;

    writer
        .write_record(table.columns.iter().map(|c| c.name.as_bytes()))
        .map_err(io_error)?;

    for row in &table.rows {
        let fields: Vec<Cow<'_, str>> = row.cells.iter().map(|c| c.to_field()).collect();
        writer
            .write_record(fields.iter().map(|f| f.as_bytes()))
            .map_err(io_error)?;
    }

    writer.flush()
}
