//! Column name normalization

use rustc_hash::FxHashMap;

use crate::config::CollisionPolicy;
use crate::error::{PipelineError, Result};
use crate::logging::Reporter;
use crate::model::Table;

const STAGE: &str = "Column standardization";

/// Canonical form of a column label: trimmed, lowercase, spaces as underscores
pub fn standardize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Rename every column of `table` to its standardized form
pub fn standardize_column_names(
    mut table: Table,
    policy: CollisionPolicy,
    reporter: &dyn Reporter,
) -> Result<Table> {
    match rename_columns(&mut table, policy) {
        Ok(()) => {
            reporter.info("Column names standardized.");
            Ok(table)
        }
        Err(err) => {
            reporter.error(&format!(
                "An error occurred while standardizing column names: {}",
                err
            ));
            Err(err)
        }
    }
}

fn rename_columns(table: &mut Table, policy: CollisionPolicy) -> Result<()> {
    table
        .check_shape()
        .map_err(|msg| PipelineError::transform(STAGE, format!("malformed table: {}", msg)))?;

    let mut renamed: Vec<String> = table
        .columns
        .iter()
        .map(|c| standardize_name(&c.name))
        .collect();

    // standardized name -> index of the first column that took it
    let mut taken: FxHashMap<String, usize> = FxHashMap::default();
    for i in 0..renamed.len() {
        if let Some(&first) = taken.get(&renamed[i]) {
            match policy {
                CollisionPolicy::Error => {
                    return Err(PipelineError::transform(
                        STAGE,
                        format!(
                            "columns {:?} and {:?} both standardize to {:?}",
                            table.columns[first].name, table.columns[i].name, renamed[i]
                        ),
                    ));
                }
                CollisionPolicy::Suffix => {
                    let base = renamed[i].clone();
                    let mut n = 1;
                    while taken.contains_key(&format!("{}_{}", base, n))
                        || renamed[i + 1..].contains(&format!("{}_{}", base, n))
                    {
                        n += 1;
                    }
                    renamed[i] = format!("{}_{}", base, n);
                }
            }
        }
        taken.insert(renamed[i].clone(), i);
    }

    for (column, name) in table.columns.iter_mut().zip(renamed) {
        column.name = name;
    }
    Ok(())
}
