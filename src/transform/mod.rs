//! Standardize and cleanse stages

mod cleanse;
mod standardize;

pub use cleanse::{cleanse_data, cleanse_with_stats, CleanseStats};
pub use standardize::{standardize_column_names, standardize_name};
