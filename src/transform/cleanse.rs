//! Missing-value filling and duplicate removal

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::logging::Reporter;
use crate::model::{CellType, CellValue, Table};

const STAGE: &str = "Data cleansing";

/// What the cleanse pass changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanseStats {
    /// Missing cells replaced by their column's median
    pub median_filled: usize,
    /// Missing cells replaced by the empty string
    pub empty_filled: usize,
    /// Rows dropped as exact duplicates of an earlier row
    pub duplicates_removed: usize,
}

/// Fill missing values and drop duplicate rows
pub fn cleanse_data(table: Table, reporter: &dyn Reporter) -> Result<Table> {
    cleanse_with_stats(table, reporter).map(|(table, _)| table)
}

/// [`cleanse_data`], also returning what changed
pub fn cleanse_with_stats(mut table: Table, reporter: &dyn Reporter) -> Result<(Table, CleanseStats)> {
    match cleanse(&mut table) {
        Ok(stats) => {
            reporter.info("Data cleansing completed.");
            Ok((table, stats))
        }
        Err(err) => {
            reporter.error(&format!("An error occurred during data cleansing: {}", err));
            Err(err)
        }
    }
}

fn cleanse(table: &mut Table) -> Result<CleanseStats> {
    table
        .check_shape()
        .map_err(|msg| PipelineError::transform(STAGE, format!("malformed table: {}", msg)))?;
    table.infer_column_types();

    let mut stats = CleanseStats::default();

    // Numeric columns first, each with a single median computed up front.
    // Columns without missing cells keep their values and type.
    for col_idx in 0..table.column_count() {
        let column = &table.columns[col_idx];
        if !column.inferred_type.is_numeric()
            || !table.column_values(col_idx).any(CellValue::is_null)
        {
            continue;
        }
        let Some(fill) = median(table, col_idx)? else {
            continue;
        };

        if column.inferred_type == CellType::Int && matches!(fill, CellValue::Float(_)) {
            promote_to_float(table, col_idx);
        }
        stats.median_filled += fill_missing(table, col_idx, &fill);
    }

    // Everything else gets the empty string
    let empty = CellValue::String(Cow::Borrowed(""));
    for col_idx in 0..table.column_count() {
        stats.empty_filled += fill_missing(table, col_idx, &empty);
    }

    stats.duplicates_removed = drop_duplicates(table);
    table.infer_column_types();

    Ok(stats)
}

/// Median of the non-missing values of a numeric column.
///
/// Integer columns yield an `Int` unless the two middle values average to a
/// fraction. NaN values are skipped.
fn median(table: &Table, col_idx: usize) -> Result<Option<CellValue>> {
    let name = &table.columns[col_idx].name;

    if table.columns[col_idx].inferred_type == CellType::Int {
        let mut values = Vec::new();
        for (row, cell) in table.rows.iter().zip(table.column_values(col_idx)) {
            match cell {
                CellValue::Null => {}
                CellValue::Int(i) => values.push(*i as i128),
                other => return Err(non_numeric(name, row.source_line, other)),
            }
        }
        if values.is_empty() {
            return Ok(None);
        }
        values.sort_unstable();
        let mid = values.len() / 2;
        let fill = if values.len() % 2 == 1 {
            CellValue::Int(values[mid] as i64)
        } else {
            let sum = values[mid - 1] + values[mid];
            if sum % 2 == 0 {
                CellValue::Int((sum / 2) as i64)
            } else {
                CellValue::Float(sum as f64 / 2.0)
            }
        };
        return Ok(Some(fill));
    }

    let mut values = Vec::new();
    for (row, cell) in table.rows.iter().zip(table.column_values(col_idx)) {
        match cell {
            CellValue::Null => {}
            CellValue::Float(f) if f.is_nan() => {}
            CellValue::Int(_) | CellValue::Float(_) => values.extend(cell.as_f64()),
            other => return Err(non_numeric(name, row.source_line, other)),
        }
    }
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_unstable_by(f64::total_cmp);
    let mid = values.len() / 2;
    let fill = if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    };
    Ok(Some(CellValue::Float(fill)))
}

fn non_numeric(column: &str, line: usize, value: &CellValue) -> PipelineError {
    PipelineError::transform(
        STAGE,
        format!(
            "numeric column {:?} holds non-numeric value {:?} at line {}",
            column,
            value.display(),
            line
        ),
    )
}

fn promote_to_float(table: &mut Table, col_idx: usize) {
    for row in &mut table.rows {
        if let CellValue::Int(i) = row.cells[col_idx] {
            row.cells[col_idx] = CellValue::Float(i as f64);
        }
    }
    table.columns[col_idx].inferred_type = CellType::Float;
}

fn fill_missing(table: &mut Table, col_idx: usize, fill: &CellValue) -> usize {
    let mut filled = 0;
    for row in &mut table.rows {
        if row.cells[col_idx].is_null() {
            row.cells[col_idx] = fill.clone();
            filled += 1;
        }
    }
    filled
}

/// Keep the first occurrence of every distinct row, preserving order
fn drop_duplicates(table: &mut Table) -> usize {
    let keep: Vec<bool> = {
        let mut seen = FxHashSet::default();
        table.rows.iter().map(|row| seen.insert(&row.cells)).collect()
    };
    let before = table.rows.len();
    let mut flags = keep.into_iter();
    table.rows.retain(|_| flags.next().unwrap_or(true));
    before - table.rows.len()
}
