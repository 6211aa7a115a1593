//! Validate stage: an ordered registry of named column rules.
//!
//! Rules run in registration order and the first violation stops
//! validation. A rule whose column is absent from the table is skipped, so
//! the default registry passes any table without an `age` column.

mod rules;

use indexmap::IndexMap;

use crate::error::{PipelineError, Result};
use crate::logging::Reporter;
use crate::model::Table;

pub use rules::{ColumnRule, Predicate};

pub const AGE_COLUMN: &str = "age";
pub const AGE_TYPE_MESSAGE: &str = "Age column must be integer type";
pub const AGE_RANGE_MESSAGE: &str = "Age column contains negative values";

/// Named rules, evaluated in insertion order
#[derive(Debug)]
pub struct RuleRegistry {
    rules: IndexMap<String, ColumnRule>,
}

impl Default for RuleRegistry {
    /// The age rules: integer type first, then non-negative
    fn default() -> Self {
        Self::empty()
            .with_rule(ColumnRule::integer("age_integer", AGE_COLUMN, AGE_TYPE_MESSAGE))
            .with_rule(ColumnRule::non_negative(
                "age_non_negative",
                AGE_COLUMN,
                AGE_RANGE_MESSAGE,
            ))
    }
}

impl RuleRegistry {
    /// A registry with no rules
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Add a rule. A rule with the same name is replaced in place.
    pub fn register(&mut self, rule: ColumnRule) {
        self.rules.insert(rule.name.clone(), rule);
    }

    pub fn with_rule(mut self, rule: ColumnRule) -> Self {
        self.register(rule);
        self
    }

    /// Remove a rule by name, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<ColumnRule> {
        self.rules.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnRule> {
        self.rules.get(name)
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// Names of the rules whose column exists in `table`
    pub fn applicable(&self, table: &Table) -> Vec<String> {
        self.rules
            .values()
            .filter(|rule| table.column_index(&rule.column).is_some())
            .map(|rule| rule.name.clone())
            .collect()
    }

    /// Check `table` against every rule without modifying it
    pub fn validate(&self, table: &Table, reporter: &dyn Reporter) -> Result<()> {
        match self.evaluate(table) {
            Ok(()) => {
                reporter.info("Data validation completed.");
                Ok(())
            }
            Err(err @ PipelineError::Validation { .. }) => {
                reporter.error(&format!("Data validation error: {}", err));
                Err(err)
            }
            Err(err) => {
                reporter.error(&format!(
                    "An unknown error occurred during data validation: {}",
                    err
                ));
                Err(err)
            }
        }
    }

    fn evaluate(&self, table: &Table) -> Result<()> {
        for rule in self.rules.values() {
            let Some(col_idx) = table.column_index(&rule.column) else {
                continue;
            };

            for row in &table.rows {
                let Some(value) = row.get(col_idx) else {
                    return Err(PipelineError::UnknownValidation {
                        rule: rule.name.clone(),
                        message: format!("row at line {} has no {:?} cell", row.source_line, rule.column),
                    });
                };

                match rule.check(value) {
                    Ok(true) => {}
                    Ok(false) => {
                        return Err(PipelineError::Validation {
                            rule: rule.name.clone(),
                            message: rule.message.clone(),
                        })
                    }
                    Err(message) => {
                        return Err(PipelineError::UnknownValidation {
                            rule: rule.name.clone(),
                            message: format!("{} at line {}", message, row.source_line),
                        })
                    }
                }
            }
        }
        Ok(())
    }
}

/// Validate with the default rule set
pub fn validate_data(table: &Table, reporter: &dyn Reporter) -> Result<()> {
    RuleRegistry::default().validate(table, reporter)
}
