//! CSV Data Loader Module
//! Handles CSV file loading and column checks using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV")]
    CsvError(#[from] PolarsError),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("No data loaded")]
    NoData,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file with a header row.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }
        self.file_path = Some(file_path.to_path_buf());

        // Unparseable cells become nulls instead of failing the whole load
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );
        debug!("Schema: {:?}", df.schema());

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Fail with every missing name if any of `columns` is absent.
    pub fn require_columns(&self, columns: &[&str]) -> Result<(), LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        let present = df.get_column_names();
        let missing: Vec<String> = columns
            .iter()
            .filter(|name| !present.iter().any(|p| p.as_str() == **name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::MissingColumns(missing))
        }
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
