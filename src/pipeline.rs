//! Pipeline orchestration: load → standardize → cleanse → validate → save.
//!
//! Stages run strictly in order and the first failure ends the run. No
//! later stage runs after a failure, so nothing is written unless the
//! failure is in the save stage itself. The outcome is returned to the
//! caller instead of being swallowed after logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::logging::Reporter;
use crate::model::CellType;
use crate::output::CsvSaver;
use crate::parser::{CsvLoader, Loader};
use crate::transform::{cleanse_with_stats, standardize_column_names, CleanseStats};
use crate::validate::RuleRegistry;

/// Pipeline stage, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Load,
    Standardize,
    Cleanse,
    Validate,
    Save,
}

impl Stage {
    fn failed(self) -> impl FnOnce(PipelineError) -> PipelineFailure {
        move |error| PipelineFailure { stage: self, error }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Standardize => write!(f, "standardize"),
            Stage::Cleanse => write!(f, "cleanse"),
            Stage::Validate => write!(f, "validate"),
            Stage::Save => write!(f, "save"),
        }
    }
}

/// A run that stopped at `stage`
#[derive(Debug, Error)]
#[error("pipeline failed at {stage} stage: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}

/// One column as it moved through the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Header label as read from the input
    pub original: String,
    /// Name after standardization
    pub name: String,
    /// Type after cleansing
    pub inferred_type: CellType,
}

/// Summary of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_loaded: usize,
    pub rows_written: usize,
    pub cleanse: CleanseStats,
    pub columns: Vec<ColumnSummary>,
    /// Rules whose column was present
    pub rules_checked: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub type RunOutcome = Result<RunReport, PipelineFailure>;

/// Runs the five stages against one input/output pair
pub struct Pipeline<'a> {
    config: PipelineConfig,
    rules: RuleRegistry,
    reporter: &'a dyn Reporter,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the default rule registry
    pub fn new(config: PipelineConfig, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            rules: RuleRegistry::default(),
            reporter,
        }
    }

    /// Replace the validation rules
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    /// Execute one pipeline run, logging the final outcome
    pub fn run(&self, input: &Path, output: &Path) -> RunOutcome {
        let outcome = self.execute(input, output);
        match &outcome {
            Ok(_) => self.reporter.info("Data pipeline completed successfully."),
            Err(failure) => self
                .reporter
                .error(&format!("Pipeline failed: {}", failure.error)),
        }
        outcome
    }

    fn execute(&self, input: &Path, output: &Path) -> RunOutcome {
        let started_at = Utc::now();
        let reporter = self.reporter;

        let table = CsvLoader
            .load(input, &self.config, reporter)
            .map_err(Stage::Load.failed())?;
        let rows_loaded = table.row_count();
        let original: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();

        let table = standardize_column_names(table, self.config.collision_policy, reporter)
            .map_err(Stage::Standardize.failed())?;

        let (table, cleanse) =
            cleanse_with_stats(table, reporter).map_err(Stage::Cleanse.failed())?;

        self.rules
            .validate(&table, reporter)
            .map_err(Stage::Validate.failed())?;

        CsvSaver
            .save(&table, output, &self.config, reporter)
            .map_err(Stage::Save.failed())?;

        let columns = original
            .into_iter()
            .zip(&table.columns)
            .map(|(original, column)| ColumnSummary {
                original,
                name: column.name.clone(),
                inferred_type: column.inferred_type,
            })
            .collect();

        Ok(RunReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            rows_loaded,
            rows_written: table.row_count(),
            cleanse,
            columns,
            rules_checked: self.rules.applicable(&table),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Run the pipeline with the default configuration and rules
pub fn process_pipeline(input: &Path, output: &Path, reporter: &dyn Reporter) -> RunOutcome {
    Pipeline::new(PipelineConfig::default(), reporter).run(input, output)
}
