use std::fs;
use std::path::Path;

use datacleanse::config::{CollisionPolicy, PipelineConfig};
use datacleanse::error::PipelineError;
use datacleanse::logging::{LogLevel, MemoryReporter};
use datacleanse::model::{CellType, CellValue};
use datacleanse::parser::load_data;
use datacleanse::transform::{cleanse_data, standardize_column_names};
use datacleanse::validate::{ColumnRule, RuleRegistry};
use datacleanse::{process_pipeline, Pipeline, Stage};

fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("input_data.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn end_to_end_standardizes_fills_and_dedupes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        " Name , Age \nAlice,30\nalice,\nBob,40\nBob,40\n",
    );
    let output = dir.path().join("output_data.csv");
    let reporter = MemoryReporter::new();

    let report = process_pipeline(&input, &output, &reporter).unwrap();

    // median of 30, 40, 40 is 40
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "name,age\nAlice,30\nalice,40\nBob,40\n");
    assert_eq!(report.rows_loaded, 4);
    assert_eq!(report.rows_written, 3);
    assert_eq!(report.cleanse.median_filled, 1);
    assert_eq!(report.cleanse.duplicates_removed, 1);
    assert_eq!(report.rules_checked, vec!["age_integer", "age_non_negative"]);
    assert!(reporter.contains(LogLevel::Info, "Data pipeline completed successfully."));
    assert!(reporter.messages(LogLevel::Error).is_empty());
}

#[test]
fn end_to_end_two_row_example() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), " Name , Age \nAlice,30\nalice,\n");
    let output = dir.path().join("out.csv");

    process_pipeline(&input, &output, &MemoryReporter::new()).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "name,age\nAlice,30\nalice,30\n"
    );
}

#[test]
fn complete_columns_are_written_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");

    for content in ["name,age\nA,30\nB,41\n", "id,v\n1,x\n2,y\n"] {
        let input = write_input(dir.path(), content);
        let reporter = MemoryReporter::new();

        let report = process_pipeline(&input, &output, &reporter).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), content);
        assert_eq!(report.cleanse.median_filled, 0);
        fs::remove_file(&output).unwrap();
    }
}

#[test]
fn negative_age_halts_before_save() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "name,age\nA,3\nB,-1\n");
    let output = dir.path().join("out.csv");
    let reporter = MemoryReporter::new();

    let failure = process_pipeline(&input, &output, &reporter).unwrap_err();

    assert_eq!(failure.stage, Stage::Validate);
    assert_eq!(failure.error.to_string(), "Age column contains negative values");
    assert!(!output.exists());
    assert!(reporter.contains(
        LogLevel::Error,
        "Pipeline failed: Age column contains negative values"
    ));
    assert!(!reporter.contains(LogLevel::Info, "Data saved successfully"));
}

#[test]
fn fractional_age_fails_type_check() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "name,age\nA,3.5\nB,-1\n");
    let output = dir.path().join("out.csv");

    let failure = process_pipeline(&input, &output, &MemoryReporter::new()).unwrap_err();

    match failure.error {
        PipelineError::Validation { rule, message } => {
            assert_eq!(rule, "age_integer");
            assert_eq!(message, "Age column must be integer type");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn existing_output_is_not_overwritten_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "age\n-5\n");
    let output = dir.path().join("out.csv");
    fs::write(&output, "previous\n").unwrap();

    assert!(process_pipeline(&input, &output, &MemoryReporter::new()).is_err());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let reporter = MemoryReporter::new();
    let config = PipelineConfig::default();

    let err = load_data(&dir.path().join("absent.csv"), &config, &reporter).unwrap_err();

    assert!(matches!(err, PipelineError::NotFound { .. }));
    assert!(reporter.contains(LogLevel::Error, "File not found"));
}

#[test]
fn directory_input_is_unknown_io() {
    let dir = tempfile::tempdir().unwrap();
    let reporter = MemoryReporter::new();

    let err = load_data(dir.path(), &PipelineConfig::default(), &reporter).unwrap_err();

    assert!(matches!(err, PipelineError::UnknownIo { .. }));
    assert!(reporter.contains(
        LogLevel::Error,
        "An unknown error occurred while loading data"
    ));
}

#[test]
fn malformed_input_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "a,b\n1,2\n3,4,5\n");
    let output = dir.path().join("out.csv");
    let reporter = MemoryReporter::new();

    let failure = process_pipeline(&input, &output, &reporter).unwrap_err();

    assert_eq!(failure.stage, Stage::Load);
    assert!(matches!(failure.error, PipelineError::Parse { .. }));
    assert!(reporter.contains(LogLevel::Error, "Error parsing the file"));
    assert!(!output.exists());
}

#[test]
fn unwritable_output_fails_at_save() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "name,age\nA,30\n");
    let output = dir.path().join("missing").join("out.csv");
    let reporter = MemoryReporter::new();

    let failure = process_pipeline(&input, &output, &reporter).unwrap_err();

    assert_eq!(failure.stage, Stage::Save);
    assert!(matches!(failure.error, PipelineError::UnknownIo { .. }));
    assert_eq!(failure.error.kind(), "UnknownIOError");
    assert!(reporter.contains(LogLevel::Error, "An error occurred while saving data"));
    assert!(reporter.contains(LogLevel::Error, "Pipeline failed:"));
    assert!(!reporter.contains(LogLevel::Info, "Data pipeline completed successfully."));
    assert!(!output.exists());
}

#[test]
fn column_collision_policies() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "Age,age \n1,2\n");
    let output = dir.path().join("out.csv");

    let reporter = MemoryReporter::new();
    let failure = process_pipeline(&input, &output, &reporter).unwrap_err();
    assert_eq!(failure.stage, Stage::Standardize);
    assert!(!output.exists());

    let config = PipelineConfig::default().with_collision_policy(CollisionPolicy::Suffix);
    let reporter = MemoryReporter::new();
    Pipeline::new(config, &reporter).run(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "age,age_1\n1,2\n");
}

#[test]
fn repeated_raw_headers_load_with_dotted_suffixes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "a,a\n1,2\n");
    let output = dir.path().join("out.csv");

    process_pipeline(&input, &output, &MemoryReporter::new()).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "a,a.1\n1,2\n");
}

#[test]
fn cleansed_tables_have_no_missing_or_duplicate_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "id,score,label,empty\n1,2.5,a,\n1,2.5,a,\n2,,NA,\n,4.0,b,\n3,NaN,,\n",
    );
    let reporter = MemoryReporter::new();
    let config = PipelineConfig::default();

    let loaded = load_data(&input, &config, &reporter).unwrap();
    assert_eq!(loaded.columns[3].inferred_type, CellType::Null);
    let table = standardize_column_names(loaded, CollisionPolicy::Error, &reporter).unwrap();
    let table = cleanse_data(table, &reporter).unwrap();

    for row in &table.rows {
        assert!(row.cells.iter().all(|c| !c.is_null()));
    }
    for (i, a) in table.rows.iter().enumerate() {
        for b in &table.rows[i + 1..] {
            assert_ne!(a.cells, b.cells);
        }
    }
    // score median over 2.5, 2.5, 4.0
    assert_eq!(table.rows[1].cells[1], CellValue::Float(2.5));
    assert_eq!(table.rows[3].cells[1], CellValue::Float(2.5));
    // id median over 1, 1, 2, 3
    assert_eq!(table.rows[2].cells[0], CellValue::Float(1.5));
    // all-missing column is non-numeric and gets empty strings
    assert_eq!(table.rows[0].cells[3], CellValue::from(""));
}

#[test]
fn custom_rules_replace_the_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "name,age\n,-1\n");
    let output = dir.path().join("out.csv");
    let reporter = MemoryReporter::new();

    let rules = RuleRegistry::empty().with_rule(ColumnRule::not_empty(
        "name_present",
        "name",
        "Name column contains empty values",
    ));
    let failure = Pipeline::new(PipelineConfig::default(), &reporter)
        .with_rules(rules)
        .run(&input, &output)
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Validate);
    assert_eq!(failure.error.to_string(), "Name column contains empty values");
}

#[test]
fn semicolon_delimited_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "First Name;Age\nAnn;5\n");
    let output = dir.path().join("out.csv");
    let config = PipelineConfig::default().with_delimiter(b';');

    Pipeline::new(config, &MemoryReporter::new())
        .run(&input, &output)
        .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "first_name;age\nAnn;5\n");
}
