//! Column rules and their predicates

use crate::model::CellValue;

/// Per-value check. `Err` means the value could not be evaluated at all.
pub type Predicate = Box<dyn Fn(&CellValue) -> Result<bool, String>>;

/// A named check applied to every value of one column
pub struct ColumnRule {
    /// Registry key, e.g. `age_integer`
    pub name: String,
    /// Column the rule applies to; the rule is skipped when it is absent
    pub column: String,
    /// Error message reported on violation
    pub message: String,
    predicate: Predicate,
}

impl std::fmt::Debug for ColumnRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnRule")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl ColumnRule {
    /// Create a rule from a custom predicate
    pub fn new<F>(
        name: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
        predicate: F,
    ) -> Self
    where
        F: Fn(&CellValue) -> Result<bool, String> + 'static,
    {
        Self {
            name: name.into(),
            column: column.into(),
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Every value must be an integer. Floats fail even when whole.
    pub fn integer(name: impl Into<String>, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, column, message, |value| Ok(matches!(value, CellValue::Int(_))))
    }

    /// Every value must be a number ≥ 0; non-numbers cannot be compared
    pub fn non_negative(
        name: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(name, column, message, |value| match value {
            CellValue::Int(i) => Ok(*i >= 0),
            CellValue::Float(f) => Ok(*f >= 0.0),
            other => Err(format!("cannot compare {:?} with 0", other.display())),
        })
    }

    /// Every value must be present and, for strings, non-empty
    pub fn not_empty(name: impl Into<String>, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, column, message, |value| {
            Ok(match value {
                CellValue::Null => false,
                CellValue::String(s) => !s.is_empty(),
                _ => true,
            })
        })
    }

    /// Evaluate the predicate on one value
    pub fn check(&self, value: &CellValue) -> Result<bool, String> {
        (self.predicate)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rejects_whole_floats() {
        let rule = ColumnRule::integer("r", "c", "m");
        assert_eq!(rule.check(&CellValue::Int(3)), Ok(true));
        assert_eq!(rule.check(&CellValue::Float(3.0)), Ok(false));
        assert_eq!(rule.check(&CellValue::from("3")), Ok(false));
    }

    #[test]
    fn test_non_negative() {
        let rule = ColumnRule::non_negative("r", "c", "m");
        assert_eq!(rule.check(&CellValue::Int(0)), Ok(true));
        assert_eq!(rule.check(&CellValue::Int(-1)), Ok(false));
        assert_eq!(rule.check(&CellValue::Float(-0.5)), Ok(false));
        assert!(rule.check(&CellValue::from("x")).is_err());
    }

    #[test]
    fn test_not_empty() {
        let rule = ColumnRule::not_empty("r", "c", "m");
        assert_eq!(rule.check(&CellValue::from("")), Ok(false));
        assert_eq!(rule.check(&CellValue::Null), Ok(false));
        assert_eq!(rule.check(&CellValue::from("a")), Ok(true));
        assert_eq!(rule.check(&CellValue::Int(0)), Ok(true));
    }
}
