//! Delimited text loader

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::logging::Reporter;
use crate::model::{CellType, CellValue, Column, Table};

use super::Loader;

/// Loader for comma (or otherwise) delimited files
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn load(&self, path: &Path, config: &PipelineConfig, reporter: &dyn Reporter) -> Result<Table> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                let err = open_error(path, e);
                reporter.error(&load_failure_message(&err));
                return Err(err);
            }
        };

        match read_table(BufReader::new(file), path, config) {
            Ok(table) => {
                reporter.info(&format!("Data loaded successfully from {}", path.display()));
                Ok(table)
            }
            Err(err) => {
                reporter.error(&load_failure_message(&err));
                Err(err)
            }
        }
    }
}

fn load_failure_message(err: &PipelineError) -> String {
    match err {
        PipelineError::NotFound { .. } | PipelineError::Parse { .. } => err.to_string(),
        other => format!("An unknown error occurred while loading data: {}", other),
    }
}

fn open_error(path: &Path, source: io::Error) -> PipelineError {
    if source.kind() == io::ErrorKind::NotFound {
        PipelineError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        PipelineError::UnknownIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PipelineError::UnknownIo {
            path: path.to_path_buf(),
            source,
        },
        _ => PipelineError::Parse {
            path: path.to_path_buf(),
            message,
        },
    }
}

/// Parse delimited content into a classified Table
fn read_table<R: Read>(reader: R, path: &Path, config: &PipelineConfig) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(config.delimiter)
        .from_reader(reader);

    // Read headers
    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();

    if headers.is_empty() {
        return Err(PipelineError::Parse {
            path: path.to_path_buf(),
            message: "No columns to parse from file".to_string(),
        });
    }

    let width = headers.len();
    let mut raw_rows: Vec<(Vec<Option<String>>, usize)> = Vec::new();

    // Read rows
    for (row_num, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_num + 2); // +2 for 1-indexing and header

        if record.len() > width {
            return Err(PipelineError::Parse {
                path: path.to_path_buf(),
                message: format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                ),
            });
        }

        let mut cells: Vec<Option<String>> = record
            .iter()
            .map(|s| (!config.is_na(s)).then(|| s.to_string()))
            .collect();

        // Pad with missing values if row has fewer columns
        cells.resize(width, None);
        raw_rows.push((cells, line));
    }

    let types: Vec<CellType> = (0..width)
        .map(|col| classify_column(raw_rows.iter().map(|(cells, _)| cells[col].as_deref())))
        .collect();

    let columns: Vec<Column> = dedupe_headers(headers.iter())
        .into_iter()
        .zip(&types)
        .enumerate()
        .map(|(i, (name, ty))| Column::with_type(name, i, *ty))
        .collect();

    let mut table = Table::new(columns);
    for (cells, line) in raw_rows {
        let cells = cells
            .into_iter()
            .zip(&types)
            .map(|(raw, ty)| parse_cell_value(raw, *ty))
            .collect();
        table.add_row(cells, line);
    }

    Ok(table)
}

/// Rename repeated header labels to `label.1`, `label.2`, ... in order.
///
/// The first occurrence keeps its label; each repeat takes the lowest
/// suffix not already used by an earlier column.
fn dedupe_headers<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut names = Vec::new();
    for label in labels {
        let mut name = label.to_string();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", label, n);
            n += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

/// Classify a column from its non-missing raw texts.
///
/// Every value must parse as `i64` for `Int`, as `f64` for `Float`; any
/// non-numeric value makes the whole column `String`. A column with no
/// values is `Null`.
fn classify_column<'a>(values: impl Iterator<Item = Option<&'a str>>) -> CellType {
    let widened = values
        .flatten()
        .map(|raw| {
            let trimmed = raw.trim();
            if trimmed.parse::<i64>().is_ok() {
                CellType::Int
            } else if trimmed.parse::<f64>().is_ok() {
                CellType::Float
            } else {
                CellType::String
            }
        })
        .fold(CellType::Null, CellType::widen);

    match widened {
        CellType::Mixed => CellType::String,
        other => other,
    }
}

/// Convert a raw text into the value for a column of type `ty`
fn parse_cell_value(raw: Option<String>, ty: CellType) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Null;
    };

    let parsed = match ty {
        CellType::Int => raw.trim().parse::<i64>().ok().map(CellValue::Int),
        CellType::Float => raw.trim().parse::<f64>().ok().map(CellValue::Float),
        _ => None,
    };

    parsed.unwrap_or(CellValue::String(Cow::Owned(raw)))
}
