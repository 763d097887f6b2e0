//! Static Chart Renderer
//! Writes one horizontal bar chart (SVG) per ranking.
//!
//! Layout:
//! 1. Title centered on top
//! 2. One bar per ranked entry, rank 1 at the top
//! 3. Entry labels on the left axis, score on the bottom axis

use crate::report::{profit_unit, AnalysisReport};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const CHART_WIDTH: u32 = 960;
const BAR_HEIGHT: u32 = 36;
const BASE_HEIGHT: u32 = 120;

const PROFIT_COLOR: RGBColor = RGBColor(91, 155, 213);
const LOSS_COLOR: RGBColor = RGBColor(237, 125, 49);
const RATING_COLOR: RGBColor = RGBColor(112, 173, 71);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create chart directory")]
    Io(#[from] std::io::Error),
    #[error("Failed to render chart {path}: {message}")]
    Render { path: PathBuf, message: String },
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Write `genres.svg`, `contributors.svg` and `pairs.svg` for the non-empty
    /// rankings in `report`. Returns the written paths.
    pub fn render_report(report: &AnalysisReport, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        fs::create_dir_all(dir)?;
        let unit = profit_unit(report.profit_scale);
        let mut written = Vec::new();

        if let Some(genres) = report.rankings.genres.as_deref().filter(|g| !g.is_empty()) {
            let bars: Vec<(String, f64)> = genres
                .iter()
                .map(|g| (g.genre.clone(), g.profitability))
                .collect();
            let path = dir.join("genres.svg");
            Self::draw_bar_chart(
                &path,
                "Top genres by profitability",
                &format!("Profitability ({unit})"),
                &bars,
                false,
            )?;
            written.push(path);
        }

        if let Some(contributors) = report
            .rankings
            .contributors
            .as_deref()
            .filter(|c| !c.is_empty())
        {
            let bars: Vec<(String, f64)> = contributors
                .iter()
                .map(|c| (format!("{} ({})", c.name, c.role), c.profitability))
                .collect();
            let path = dir.join("contributors.svg");
            Self::draw_bar_chart(
                &path,
                "Top directors/actors by profitability",
                &format!("Profitability ({unit})"),
                &bars,
                false,
            )?;
            written.push(path);
        }

        if let Some(pairs) = report.rankings.pairs.as_deref().filter(|p| !p.is_empty()) {
            let bars: Vec<(String, f64)> = pairs
                .iter()
                .map(|p| (format!("{} / {}", p.director, p.actor), p.mean_rating))
                .collect();
            let path = dir.join("pairs.svg");
            Self::draw_bar_chart(
                &path,
                "Top director-actor pairs by IMDB rating",
                "Mean IMDB rating",
                &bars,
                true,
            )?;
            written.push(path);
        }

        info!("Wrote {} chart(s) to {}", written.len(), dir.display());
        Ok(written)
    }

    /// Value axis range, always including zero, padded 5% on both sides.
    fn value_range(bars: &[(String, f64)]) -> (f64, f64) {
        let (min, max) = bars
            .iter()
            .fold((0.0f64, 0.0f64), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
        let pad = ((max - min) * 0.05).max(0.01);
        (
            if min < 0.0 { min - pad } else { 0.0 },
            max + pad,
        )
    }

    fn draw_bar_chart(
        path: &Path,
        title: &str,
        value_desc: &str,
        bars: &[(String, f64)],
        is_rating: bool,
    ) -> Result<(), ChartError> {
        let render_err = |e: &dyn std::fmt::Display| ChartError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let n = bars.len() as i32;
        let height = BASE_HEIGHT + BAR_HEIGHT * bars.len() as u32;
        let label_width = bars
            .iter()
            .map(|(label, _)| label.chars().count() as u32)
            .max()
            .unwrap_or(0)
            .clamp(8, 48)
            * 8;
        let (x_min, x_max) = Self::value_range(bars);

        let root = SVGBackend::new(path, (CHART_WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| render_err(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(label_width)
            .build_cartesian_2d(x_min..x_max, (0..n).into_segmented())
            .map_err(|e| render_err(&e))?;

        // Segment 0 is at the bottom, so rank 1 goes into segment n - 1
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(bars.len())
            .y_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => bars
                    .get((n - 1 - *i) as usize)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .x_desc(value_desc)
            .x_label_formatter(&|v| {
                if is_rating {
                    format!("{v:.1}")
                } else {
                    format!("{v:.2}")
                }
            })
            .draw()
            .map_err(|e| render_err(&e))?;

        chart
            .draw_series(bars.iter().enumerate().map(|(rank, (_, value))| {
                let seg = n - 1 - rank as i32;
                let color = if is_rating {
                    RATING_COLOR
                } else if *value < 0.0 {
                    LOSS_COLOR
                } else {
                    PROFIT_COLOR
                };
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(seg)),
                        (*value, SegmentValue::Exact(seg + 1)),
                    ],
                    color.filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))
            .map_err(|e| render_err(&e))?;

        root.present().map_err(|e| render_err(&e))?;
        debug!("Rendered {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Role;
    use crate::stats::calculator::{ContributorProfit, GenreProfit};
    use crate::stats::Rankings;
    use tempfile::TempDir;

    fn report() -> AnalysisReport {
        AnalysisReport {
            source: "movies.csv".to_string(),
            rows: 2,
            top_n: 10,
            profit_scale: 1e9,
            rankings: Rankings {
                genres: Some(vec![
                    GenreProfit {
                        genre: "Family".to_string(),
                        movies: 1,
                        gross: 2.0e9,
                        budget: 1.0e9,
                        profitability: 1.0,
                    },
                    GenreProfit {
                        genre: "Western".to_string(),
                        movies: 1,
                        gross: 0.1e9,
                        budget: 0.3e9,
                        profitability: -0.2,
                    },
                ]),
                contributors: Some(vec![ContributorProfit {
                    name: "george lucas".to_string(),
                    role: Role::Director,
                    movies: 1,
                    gross: 2.0e9,
                    budget: 1.0e9,
                    profitability: 1.0,
                }]),
                pairs: Some(Vec::new()),
            },
        }
    }

    #[test]
    fn test_value_range_includes_zero_and_negatives() {
        let (lo, hi) = ChartRenderer::value_range(&[("a".to_string(), 2.0)]);
        assert_eq!(lo, 0.0);
        assert!(hi > 2.0);

        let (lo, _) = ChartRenderer::value_range(&[("a".to_string(), -1.0)]);
        assert!(lo < -1.0);
    }

    #[test]
    fn test_render_report_skips_empty_rankings() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let written = ChartRenderer::render_report(&report(), &out).unwrap();

        assert_eq!(
            written,
            vec![out.join("genres.svg"), out.join("contributors.svg")]
        );
        assert!(!out.join("pairs.svg").exists());

        let svg = fs::read_to_string(out.join("genres.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Family"));
    }
}
