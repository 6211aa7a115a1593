//! Loader stage: reading delimited files into tables

mod csv;

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::logging::Reporter;
use crate::model::Table;

pub use self::csv::CsvLoader;

/// Trait for loading a tabular file
pub trait Loader {
    /// Read `path` into a Table, logging the outcome through `reporter`
    fn load(&self, path: &Path, config: &PipelineConfig, reporter: &dyn Reporter) -> Result<Table>;
}

/// Load a delimited file with the default loader
pub fn load_data(path: &Path, config: &PipelineConfig, reporter: &dyn Reporter) -> Result<Table> {
    CsvLoader.load(path, config, reporter)
}
