//! Report Module
//! Renders the rankings as a plain-text table or as JSON.

use crate::stats::Rankings;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything printed for one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    pub rows: usize,
    pub top_n: usize,
    pub profit_scale: f64,
    #[serde(flatten)]
    pub rankings: Rankings,
}

/// Human-readable unit for a profitability divisor.
pub fn profit_unit(scale: f64) -> String {
    if scale == 1e9 {
        "billions".to_string()
    } else if scale == 1e6 {
        "millions".to_string()
    } else if scale == 1.0 {
        "currency units".to_string()
    } else {
        format!("units of {scale}")
    }
}

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn render(
        report: &AnalysisReport,
        format: OutputFormat,
    ) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(Self::to_text(report)),
            OutputFormat::Json => Self::to_json(report),
        }
    }

    pub fn to_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    pub fn to_text(report: &AnalysisReport) -> String {
        let mut out = String::new();
        let unit = profit_unit(report.profit_scale);
        let _ = writeln!(out, "Source: {} ({} movies)", report.source, report.rows);

        if let Some(genres) = &report.rankings.genres {
            let _ = writeln!(
                out,
                "\nTop {} genres by profitability ({unit})",
                report.top_n
            );
            let width = column_width("genre", genres.iter().map(|g| g.genre.as_str()));
            let _ = writeln!(out, "{:>3}  {:<width$}  {:>14}", "#", "genre", "profitability");
            for (i, g) in genres.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}  {:<width$}  {:>14.3}",
                    i + 1,
                    g.genre,
                    g.profitability
                );
            }
            if genres.is_empty() {
                let _ = writeln!(out, "  (no data)");
            }
        }

        if let Some(contributors) = &report.rankings.contributors {
            let _ = writeln!(
                out,
                "\nTop {} directors/actors by profitability ({unit})",
                report.top_n
            );
            let width = column_width("name", contributors.iter().map(|c| c.name.as_str()));
            let _ = writeln!(
                out,
                "{:>3}  {:<width$}  {:<8}  {:>14}",
                "#", "name", "role", "profitability"
            );
            for (i, c) in contributors.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}  {:<width$}  {:<8}  {:>14.3}",
                    i + 1,
                    c.name,
                    c.role.to_string(),
                    c.profitability
                );
            }
            if contributors.is_empty() {
                let _ = writeln!(out, "  (no data)");
            }
        }

        if let Some(pairs) = &report.rankings.pairs {
            let _ = writeln!(
                out,
                "\nTop {} director-actor pairs by mean IMDB rating",
                report.top_n
            );
            let dw = column_width("director", pairs.iter().map(|p| p.director.as_str()));
            let aw = column_width("actor", pairs.iter().map(|p| p.actor.as_str()));
            let _ = writeln!(
                out,
                "{:>3}  {:<dw$}  {:<aw$}  {:>6}  {:>6}",
                "#", "director", "actor", "rating", "movies"
            );
            for (i, p) in pairs.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}  {:<dw$}  {:<aw$}  {:>6.2}  {:>6}",
                    i + 1,
                    p.director,
                    p.actor,
                    p.mean_rating,
                    p.movies
                );
            }
            if pairs.is_empty() {
                let _ = writeln!(out, "  (no data)");
            }
        }

        out
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}
