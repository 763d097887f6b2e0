//! Analysis Configuration Module
//! Column mapping and ranking parameters, loadable from a JSON file.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default number of entries kept per ranking
pub const DEFAULT_TOP_N: usize = 10;

/// Profitability is reported in billions
pub const DEFAULT_PROFIT_SCALE: f64 = 1_000_000_000.0;

pub const DEFAULT_GENRE_DELIMITER: &str = "|";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file")]
    Parse(#[from] serde_json::Error),
    #[error("profit_scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
    #[error("genre_delimiter must not be empty")]
    EmptyDelimiter,
    #[error("at least one actor column is required")]
    NoActorColumns,
}

/// Which rankings to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportSelection {
    #[default]
    All,
    Genres,
    Contributors,
    Pairs,
}

impl ReportSelection {
    pub fn includes_genres(self) -> bool {
        matches!(self, ReportSelection::All | ReportSelection::Genres)
    }

    pub fn includes_contributors(self) -> bool {
        matches!(self, ReportSelection::All | ReportSelection::Contributors)
    }

    pub fn includes_pairs(self) -> bool {
        matches!(self, ReportSelection::All | ReportSelection::Pairs)
    }
}

/// Names of the source columns consumed by the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub gross: String,
    pub budget: String,
    pub genres: String,
    pub director: String,
    pub actors: Vec<String>,
    pub rating: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            gross: "gross".to_string(),
            budget: "budget".to_string(),
            genres: "genres".to_string(),
            director: "director_name".to_string(),
            actors: vec![
                "actor_1_name".to_string(),
                "actor_2_name".to_string(),
                "actor_3_name".to_string(),
            ],
            rating: "imdb_score".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns read by the selected rankings.
    pub fn required_for(&self, selection: ReportSelection) -> Vec<&str> {
        let mut cols: Vec<&str> = Vec::new();
        if selection.includes_genres() || selection.includes_contributors() {
            cols.push(&self.gross);
            cols.push(&self.budget);
        }
        if selection.includes_genres() {
            cols.push(&self.genres);
        }
        if selection.includes_contributors() || selection.includes_pairs() {
            cols.push(&self.director);
            cols.extend(self.actors.iter().map(String::as_str));
        }
        if selection.includes_pairs() {
            cols.push(&self.rating);
        }
        cols
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub columns: ColumnNames,
    pub genre_delimiter: String,
    pub top_n: usize,
    pub profit_scale: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            genre_delimiter: DEFAULT_GENRE_DELIMITER.to_string(),
            top_n: DEFAULT_TOP_N,
            profit_scale: DEFAULT_PROFIT_SCALE,
        }
    }
}

impl AnalysisConfig {
    /// Load a config file. Fields absent from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        if let Some(n) = top_n {
            self.top_n = n;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.profit_scale.is_finite() || self.profit_scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.profit_scale));
        }
        if self.genre_delimiter.is_empty() {
            return Err(ConfigError::EmptyDelimiter);
        }
        if self.columns.actors.is_empty() {
            return Err(ConfigError::NoActorColumns);
        }
        Ok(())
    }
}
