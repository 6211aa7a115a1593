//! Configuration handling for datacleanse

use std::path::PathBuf;

/// Markers read as missing values when no others are configured
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Default log file, appended to by every run
pub const DEFAULT_LOG_FILE: &str = "data_cleanse.log";

/// What to do when two columns standardize to the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Fail the standardize stage
    #[default]
    Error,
    /// Append `_1`, `_2`, ... to later duplicates
    Suffix,
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CollisionPolicy::Error),
            "suffix" => Ok(CollisionPolicy::Suffix),
            _ => Err(format!("Unknown collision policy: {}", s)),
        }
    }
}

/// How the run report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Field delimiter for both input and output
    pub delimiter: u8,
    /// Exact cell texts treated as missing (not trimmed)
    pub na_values: Vec<String>,
    /// Handling of standardized-name collisions
    pub collision_policy: CollisionPolicy,
    /// Run report format
    pub report_format: ReportFormat,
    /// Append-only log destination
    pub log_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            collision_policy: CollisionPolicy::default(),
            report_format: ReportFormat::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the missing-value markers. The empty string always stays missing.
    pub fn with_na_values(mut self, values: Vec<String>) -> Self {
        self.na_values = values;
        if !self.na_values.iter().any(|v| v.is_empty()) {
            self.na_values.push(String::new());
        }
        self
    }

    /// Set the column collision policy
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Set the report format
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Set the log file path
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = path;
        self
    }

    /// Whether a raw cell text is a missing marker
    pub fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|v| v == raw)
    }
}
