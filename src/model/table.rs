//! Table, Row, and Cell data structures

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::schema::{CellType, Column};

/// A cell value with type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// The missing marker
    Null,
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        // No cross-type equality: Eq must agree with Hash for duplicate detection.
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => {
                if f.is_nan() {
                    f64::NAN.to_bits().hash(state)
                } else if *f == 0.0 {
                    // 0.0 == -0.0
                    0u64.hash(state)
                } else {
                    f.to_bits().hash(state)
                }
            }
            CellValue::String(s) => s.hash(state),
        }
    }
}

impl CellValue {
    /// Check if the value is the missing marker
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(format_float(*f)),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
        }
    }

    /// Text written to a delimited file; missing values become empty fields
    pub fn to_field(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            other => other.display(),
        }
    }
}

/// Floats always carry a fractional digit so they read back as floats
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line/row number in source file (1-indexed)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A table containing columns and rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// All rows in the table
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table with column definitions
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from header names and rows of cells, classifying columns
    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();
        let mut table = Table::new(columns);
        for (i, cells) in rows.into_iter().enumerate() {
            table.add_row(cells, i + 2);
        }
        table.infer_column_types();
        table
    }

    /// Add a row to the table
    pub fn add_row(&mut self, cells: Vec<CellValue>, source_line: usize) {
        self.rows.push(Row::new(cells, source_line));
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Iterate the values of one column
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Verify every row has one cell per column
    pub fn check_shape(&self) -> Result<(), String> {
        let expected = self.column_count();
        match self.rows.iter().find(|row| row.cells.len() != expected) {
            Some(row) => Err(format!(
                "row at line {} has {} cells, expected {}",
                row.source_line,
                row.cells.len(),
                expected
            )),
            None => Ok(()),
        }
    }

    /// Re-derive column types from the current cells
    pub fn infer_column_types(&mut self) {
        for col_idx in 0..self.column_count() {
            let inferred = self
                .column_values(col_idx)
                .fold(CellType::Null, |acc, cell| acc.widen(CellType::of(cell)));

            if let Some(col) = self.columns.get_mut(col_idx) {
                col.inferred_type = inferred;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_field_keeps_fraction() {
        assert_eq!(CellValue::Float(30.0).to_field(), "30.0");
        assert_eq!(CellValue::Float(2.5).to_field(), "2.5");
        assert_eq!(CellValue::Float(f64::INFINITY).to_field(), "inf");
        assert_eq!(CellValue::Int(7).to_field(), "7");
        assert_eq!(CellValue::Null.to_field(), "");
    }

    #[test]
    fn test_no_cross_type_equality() {
        assert_ne!(CellValue::Int(1), CellValue::Float(1.0));
        assert_ne!(CellValue::Null, CellValue::from(""));
        assert_eq!(CellValue::Float(0.0), CellValue::Float(-0.0));
    }

    #[test]
    fn test_infer_column_types() {
        let table = Table::from_rows(
            vec!["a", "b", "c", "d"],
            vec![
                vec![1i64.into(), 1.5f64.into(), "x".into(), CellValue::Null],
                vec![CellValue::Null, 2i64.into(), 3i64.into(), CellValue::Null],
            ],
        );
        let types: Vec<_> = table.columns.iter().map(|c| c.inferred_type).collect();
        assert_eq!(
            types,
            vec![CellType::Int, CellType::Float, CellType::Mixed, CellType::Null]
        );
    }

    #[test]
    fn test_check_shape() {
        let mut table = Table::from_rows(vec!["a", "b"], vec![vec![1i64.into(), 2i64.into()]]);
        assert!(table.check_shape().is_ok());
        table.add_row(vec![1i64.into()], 3);
        let err = table.check_shape().unwrap_err();
        assert!(err.contains("line 3"));
    }
}
