//! Data Processor Module
//! Reshapes the wide movie table into long-form rows (explode / unpivot).

use crate::config::{AnalysisConfig, ColumnNames, ReportSelection};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error")]
    PolarsError(#[from] PolarsError),
    #[error("Genre delimiter must not be empty")]
    EmptyDelimiter,
}

/// Credit under which a person appears on a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Director,
    Actor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Director => write!(f, "director"),
            Role::Actor => write!(f, "actor"),
        }
    }
}

/// One (movie, genre) row.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreRow {
    /// Source row index of the movie
    pub movie: usize,
    pub genre: String,
    pub gross: f64,
    pub budget: f64,
}

/// One (movie, person, role) row.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorRow {
    /// Source row index of the movie
    pub movie: usize,
    pub name: String,
    pub role: Role,
    pub gross: f64,
    pub budget: f64,
}

/// One (movie, director, actor) row.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRow {
    pub director: String,
    pub actor: String,
    pub rating: f64,
}

/// Long-form projections of the source table, one per ranking.
#[derive(Debug, Clone, Default)]
pub struct LongTables {
    pub genres: Vec<GenreRow>,
    pub contributors: Vec<ContributorRow>,
    pub pairs: Vec<PairRow>,
}

/// Handles data cleaning and reshaping operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Lowercase and trim a person's name; blank names count as missing.
    pub fn normalize_name(name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Read a column as floats. NaN is treated like null.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let values = df.column(name)?.cast(&DataType::String)?;
        let ca = values.str()?;
        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Split the multi-value genre field into one row per (movie, genre).
    ///
    /// Movies missing gross, budget or genres are skipped.
    pub fn explode_genres(
        df: &DataFrame,
        columns: &ColumnNames,
        delimiter: &str,
    ) -> Result<Vec<GenreRow>, ProcessorError> {
        if delimiter.is_empty() {
            return Err(ProcessorError::EmptyDelimiter);
        }

        let gross = Self::numeric_column(df, &columns.gross)?;
        let budget = Self::numeric_column(df, &columns.budget)?;
        let genres = Self::text_column(df, &columns.genres)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for i in 0..df.height() {
            let (Some(g), Some(b), Some(list)) = (gross[i], budget[i], genres[i].as_deref())
            else {
                skipped += 1;
                continue;
            };

            // Trimmed, and "Drama|" yields no empty genre, unlike a plain split
            for genre in list.split(delimiter).map(str::trim).filter(|s| !s.is_empty()) {
                rows.push(GenreRow {
                    movie: i,
                    genre: genre.to_string(),
                    gross: g,
                    budget: b,
                });
            }
        }

        debug!("Exploded {} genre rows ({} movies skipped)", rows.len(), skipped);
        Ok(rows)
    }

    /// Unpivot director and actor columns into one row per credited person.
    ///
    /// Movies missing gross or budget are skipped, as are blank names.
    pub fn unpivot_contributors(
        df: &DataFrame,
        columns: &ColumnNames,
    ) -> Result<Vec<ContributorRow>, ProcessorError> {
        let gross = Self::numeric_column(df, &columns.gross)?;
        let budget = Self::numeric_column(df, &columns.budget)?;

        let mut credit_columns = vec![(Role::Director, Self::text_column(df, &columns.director)?)];
        for actor_col in &columns.actors {
            credit_columns.push((Role::Actor, Self::text_column(df, actor_col)?));
        }

        // Column-major, like a melt: all directors first, then each actor column
        let mut rows = Vec::new();
        for (role, names) in &credit_columns {
            for i in 0..df.height() {
                let (Some(g), Some(b)) = (gross[i], budget[i]) else {
                    continue;
                };
                let Some(name) = names[i].as_deref().and_then(Self::normalize_name) else {
                    continue;
                };
                rows.push(ContributorRow {
                    movie: i,
                    name,
                    role: *role,
                    gross: g,
                    budget: b,
                });
            }
        }

        debug!("Unpivoted {} contributor rows", rows.len());
        Ok(rows)
    }

    /// Pair each movie's director with each of its actors, carrying the rating.
    pub fn unpivot_pairs(
        df: &DataFrame,
        columns: &ColumnNames,
    ) -> Result<Vec<PairRow>, ProcessorError> {
        let directors = Self::text_column(df, &columns.director)?;
        let ratings = Self::numeric_column(df, &columns.rating)?;

        let mut rows = Vec::new();
        for actor_col in &columns.actors {
            let actors = Self::text_column(df, actor_col)?;
            for i in 0..df.height() {
                let Some(rating) = ratings[i] else {
                    continue;
                };
                let director = directors[i].as_deref().and_then(Self::normalize_name);
                let actor = actors[i].as_deref().and_then(Self::normalize_name);
                if let (Some(director), Some(actor)) = (director, actor) {
                    rows.push(PairRow {
                        director,
                        actor,
                        rating,
                    });
                }
            }
        }

        debug!("Unpivoted {} director-actor rows", rows.len());
        Ok(rows)
    }

    /// Build the long-form tables needed by the selected rankings.
    pub fn prepare_tables(
        df: &DataFrame,
        config: &AnalysisConfig,
        selection: ReportSelection,
    ) -> Result<LongTables, ProcessorError> {
        let mut tables = LongTables::default();
        if selection.includes_genres() {
            tables.genres = Self::explode_genres(df, &config.columns, &config.genre_delimiter)?;
        }
        if selection.includes_contributors() {
            tables.contributors = Self::unpivot_contributors(df, &config.columns)?;
        }
        if selection.includes_pairs() {
            tables.pairs = Self::unpivot_pairs(df, &config.columns)?;
        }
        Ok(tables)
    }
}
