//! datacleanse - Clean up delimited tabular data
//!
//! Loads a delimited file, standardizes its column names, fills missing
//! values and drops duplicate rows, validates column rules, and saves the
//! result. Each stage logs through an injected [`logging::Reporter`].

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod transform;
pub mod validate;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use model::Table;
pub use pipeline::{process_pipeline, Pipeline, PipelineFailure, RunReport, Stage};
