//! Error taxonomy shared by every pipeline stage

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by the stages
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error parsing the file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{stage} failed: {message}")]
    Transform { stage: &'static str, message: String },

    /// A named rule was violated; displays the rule's message only
    #[error("{message}")]
    Validation { rule: String, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    UnknownIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rule {rule} could not be evaluated: {message}")]
    UnknownValidation { rule: String, message: String },
}

impl PipelineError {
    pub fn transform(stage: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Transform {
            stage,
            message: message.into(),
        }
    }

    /// Short name of the error kind, as used in log records and reports
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::NotFound { .. } => "NotFound",
            PipelineError::Parse { .. } => "ParseError",
            PipelineError::Transform { .. } => "TransformError",
            PipelineError::Validation { .. } => "ValidationError",
            PipelineError::UnknownIo { .. } => "UnknownIOError",
            PipelineError::UnknownValidation { .. } => "UnknownValidationError",
        }
    }
}
