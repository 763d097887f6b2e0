//! Statistics Calculator Module
//! Group-by aggregation and top-N ranking over the long-form tables.

use crate::config::{AnalysisConfig, ReportSelection};
use crate::data::{ContributorRow, GenreRow, LongTables, PairRow, Role};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Aggregate profitability of one genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfit {
    pub genre: String,
    pub movies: usize,
    pub gross: f64,
    pub budget: f64,
    pub profitability: f64,
}

/// Aggregate profitability of one director or actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorProfit {
    pub name: String,
    pub role: Role,
    pub movies: usize,
    pub gross: f64,
    pub budget: f64,
    pub profitability: f64,
}

/// Rating summary of one director-actor pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairRating {
    pub director: String,
    pub actor: String,
    pub movies: usize,
    pub mean_rating: f64,
    /// Sample standard deviation; absent for a single movie
    pub rating_std_dev: Option<f64>,
}

/// The requested rankings. Rankings that were not requested stay `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Rankings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<GenreProfit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<ContributorProfit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs: Option<Vec<PairRating>>,
}

/// Per-group sums. Money adds once per row; `movies` holds distinct source rows.
#[derive(Default)]
struct Totals {
    movies: BTreeSet<usize>,
    gross: f64,
    budget: f64,
}

impl Totals {
    fn add(&mut self, movie: usize, gross: f64, budget: f64) {
        self.movies.insert(movie);
        self.gross += gross;
        self.budget += budget;
    }

    fn profitability(&self, scale: f64) -> f64 {
        (self.gross - self.budget) / scale
    }
}

/// Handles aggregation and ranking with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Stable sort by descending score, then keep the first `top_n`.
    ///
    /// Callers pass groups in ascending key order, so ties keep that order.
    fn rank_by<T>(mut items: Vec<T>, top_n: usize, score: impl Fn(&T) -> f64) -> Vec<T> {
        items.sort_by(|a, b| score(b).total_cmp(&score(a)));
        items.truncate(top_n);
        items
    }

    /// Top genres by (sum gross - sum budget) / scale.
    pub fn rank_genres(rows: &[GenreRow], top_n: usize, scale: f64) -> Vec<GenreProfit> {
        let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
        for row in rows {
            groups
                .entry(row.genre.as_str())
                .or_default()
                .add(row.movie, row.gross, row.budget);
        }
        debug!("Aggregated {} genres", groups.len());

        let profits = groups
            .into_iter()
            .map(|(genre, totals)| GenreProfit {
                genre: genre.to_string(),
                movies: totals.movies.len(),
                gross: totals.gross,
                budget: totals.budget,
                profitability: totals.profitability(scale),
            })
            .collect();

        Self::rank_by(profits, top_n, |g| g.profitability)
    }

    /// Top contributors by profitability. Each person's role is the one they were
    /// credited under most often; a tie counts as director.
    ///
    /// Profit adds once per credit, so directing and acting in one movie counts
    /// its profit twice, but `movies` counts that movie once.
    pub fn rank_contributors(
        rows: &[ContributorRow],
        top_n: usize,
        scale: f64,
    ) -> Vec<ContributorProfit> {
        let mut groups: BTreeMap<&str, (Totals, usize, usize)> = BTreeMap::new();
        for row in rows {
            let (totals, directed, acted) = groups.entry(row.name.as_str()).or_default();
            totals.add(row.movie, row.gross, row.budget);
            match row.role {
                Role::Director => *directed += 1,
                Role::Actor => *acted += 1,
            }
        }
        debug!("Aggregated {} contributors", groups.len());

        let profits = groups
            .into_iter()
            .map(|(name, (totals, directed, acted))| ContributorProfit {
                name: name.to_string(),
                role: if directed >= acted {
                    Role::Director
                } else {
                    Role::Actor
                },
                movies: totals.movies.len(),
                gross: totals.gross,
                budget: totals.budget,
                profitability: totals.profitability(scale),
            })
            .collect();

        Self::rank_by(profits, top_n, |c| c.profitability)
    }

    /// Top director-actor pairs by mean rating.
    pub fn rank_pairs(rows: &[PairRow], top_n: usize) -> Vec<PairRating> {
        let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
        for row in rows {
            groups
                .entry((row.director.as_str(), row.actor.as_str()))
                .or_default()
                .push(row.rating);
        }
        debug!("Aggregated {} director-actor pairs", groups.len());

        let ratings = groups
            .into_iter()
            .map(|((director, actor), scores)| PairRating {
                director: director.to_string(),
                actor: actor.to_string(),
                movies: scores.len(),
                mean_rating: scores.iter().mean(),
                rating_std_dev: (scores.len() > 1).then(|| scores.iter().std_dev()),
            })
            .collect();

        Self::rank_by(ratings, top_n, |p| p.mean_rating)
    }

    /// Compute the selected rankings in parallel.
    pub fn compute_all_parallel(
        tables: &LongTables,
        config: &AnalysisConfig,
        selection: ReportSelection,
    ) -> Rankings {
        let top_n = config.top_n;
        let scale = config.profit_scale;

        // Use rayon for parallel computation
        let (genres, (contributors, pairs)) = rayon::join(
            || {
                selection
                    .includes_genres()
                    .then(|| Self::rank_genres(&tables.genres, top_n, scale))
            },
            || {
                rayon::join(
                    || {
                        selection
                            .includes_contributors()
                            .then(|| Self::rank_contributors(&tables.contributors, top_n, scale))
                    },
                    || {
                        selection
                            .includes_pairs()
                            .then(|| Self::rank_pairs(&tables.pairs, top_n))
                    },
                )
            },
        );

        info!(
            "Ranked top {} of genres: {:?}, contributors: {:?}, pairs: {:?}",
            top_n,
            genres.as_ref().map(Vec::len),
            contributors.as_ref().map(Vec::len),
            pairs.as_ref().map(Vec::len)
        );

        Rankings {
            genres,
            contributors,
            pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(movie: usize, genre: &str, gross: f64, budget: f64) -> GenreRow {
        GenreRow {
            movie,
            genre: genre.to_string(),
            gross,
            budget,
        }
    }

    fn credit(movie: usize, name: &str, role: Role, gross: f64, budget: f64) -> ContributorRow {
        ContributorRow {
            movie,
            name: name.to_string(),
            role,
            gross,
            budget,
        }
    }

    fn pair(director: &str, actor: &str, rating: f64) -> PairRow {
        PairRow {
            director: director.to_string(),
            actor: actor.to_string(),
            rating,
        }
    }

    #[test]
    fn test_genre_profitability_is_sum_difference_in_billions() {
        let rows = vec![
            genre(0, "Action", 3.0e9, 1.0e9),
            genre(1, "Drama", 0.5e9, 0.25e9),
            genre(2, "Action", 1.0e9, 1.5e9),
        ];
        let ranked = StatsCalculator::rank_genres(&rows, 10, 1e9);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].genre, "Action");
        assert_eq!(ranked[0].movies, 2);
        assert_eq!(ranked[0].gross, 4.0e9);
        assert_eq!(ranked[0].budget, 2.5e9);
        assert!((ranked[0].profitability - 1.5).abs() < 1e-12);
        assert!((ranked[1].profitability - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_ranking_ties_keep_key_order_and_truncate() {
        let rows = vec![
            genre(0, "Western", 2.0, 1.0),
            genre(1, "Comedy", 2.0, 1.0),
            genre(2, "Horror", 5.0, 1.0),
            genre(3, "Animation", 2.0, 1.0),
            genre(4, "Sci-Fi", -1.0, 1.0),
        ];
        let ranked = StatsCalculator::rank_genres(&rows, 3, 1.0);
        let names: Vec<&str> = ranked.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(names, vec!["Horror", "Animation", "Comedy"]);
    }

    #[test]
    fn test_negative_profitability_ranks_last() {
        let rows = vec![genre(0, "Flop", 1.0, 10.0), genre(1, "Hit", 10.0, 1.0)];
        let ranked = StatsCalculator::rank_genres(&rows, 10, 1.0);
        assert_eq!(ranked[1].genre, "Flop");
        assert_eq!(ranked[1].profitability, -9.0);
    }

    #[test]
    fn test_zero_top_n_and_empty_input() {
        let rows = vec![genre(0, "Action", 1.0, 0.0)];
        assert!(StatsCalculator::rank_genres(&rows, 0, 1.0).is_empty());
        assert!(StatsCalculator::rank_genres(&[], 10, 1.0).is_empty());
        assert!(StatsCalculator::rank_contributors(&[], 10, 1.0).is_empty());
        assert!(StatsCalculator::rank_pairs(&[], 10).is_empty());
    }

    #[test]
    fn test_contributor_role_is_most_frequent_credit() {
        let rows = vec![
            credit(0, "clint eastwood", Role::Director, 10.0, 2.0),
            credit(1, "clint eastwood", Role::Actor, 10.0, 2.0),
            credit(2, "clint eastwood", Role::Actor, 6.0, 2.0),
            credit(3, "ben affleck", Role::Director, 4.0, 1.0),
            credit(4, "ben affleck", Role::Actor, 4.0, 1.0),
            credit(5, "tom hanks", Role::Actor, 1.0, 0.0),
        ];
        let ranked = StatsCalculator::rank_contributors(&rows, 10, 1.0);

        assert_eq!(ranked[0].name, "clint eastwood");
        assert_eq!(ranked[0].role, Role::Actor);
        assert_eq!(ranked[0].movies, 3);
        assert_eq!(ranked[0].profitability, 20.0);
        assert_eq!(ranked[1].name, "ben affleck");
        assert_eq!(ranked[1].role, Role::Director);
        assert_eq!(ranked[2].role, Role::Actor);
    }

    #[test]
    fn test_two_credits_on_one_movie_count_one_movie() {
        // Directs and acts in the same movie
        let rows = vec![
            credit(0, "clint eastwood", Role::Director, 300.0, 100.0),
            credit(0, "clint eastwood", Role::Actor, 300.0, 100.0),
            credit(1, "clint eastwood", Role::Actor, 50.0, 10.0),
        ];
        let ranked = StatsCalculator::rank_contributors(&rows, 10, 1.0);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].movies, 2);
        assert_eq!(ranked[0].gross, 650.0);
        assert_eq!(ranked[0].profitability, 440.0);
        assert_eq!(ranked[0].role, Role::Actor);
    }

    #[test]
    fn test_repeated_genre_on_one_movie_counts_one_movie() {
        let rows = vec![genre(7, "Drama", 10.0, 4.0), genre(7, "Drama", 10.0, 4.0)];
        let ranked = StatsCalculator::rank_genres(&rows, 10, 1.0);
        assert_eq!(ranked[0].movies, 1);
        assert_eq!(ranked[0].profitability, 12.0);
    }

    #[test]
    fn test_pairs_rank_by_mean_rating() {
        let rows = vec![
            pair("christopher nolan", "michael caine", 8.0),
            pair("christopher nolan", "michael caine", 9.0),
            pair("frank darabont", "morgan freeman", 9.3),
            pair("christopher nolan", "anne hathaway", 8.5),
        ];
        let ranked = StatsCalculator::rank_pairs(&rows, 10);

        assert_eq!(ranked[0].actor, "morgan freeman");
        assert_eq!(ranked[0].rating_std_dev, None);
        // 8.5 twice: anne hathaway sorts before michael caine
        assert_eq!(ranked[1].actor, "anne hathaway");
        assert_eq!(ranked[2].actor, "michael caine");
        assert_eq!(ranked[2].movies, 2);
        assert!((ranked[2].mean_rating - 8.5).abs() < 1e-12);
        let std = ranked[2].rating_std_dev.unwrap();
        assert!((std - 0.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_compute_all_parallel_respects_selection() {
        let tables = LongTables {
            genres: vec![genre(0, "Action", 2.0e9, 1.0e9)],
            contributors: vec![credit(0, "a", Role::Actor, 2.0e9, 1.0e9)],
            pairs: vec![pair("d", "a", 7.0)],
        };
        let config = AnalysisConfig::default();

        let all = StatsCalculator::compute_all_parallel(&tables, &config, ReportSelection::All);
        assert_eq!(all.genres.map(|g| g.len()), Some(1));
        assert_eq!(all.contributors.map(|c| c.len()), Some(1));
        assert_eq!(all.pairs.map(|p| p.len()), Some(1));

        let genres_only =
            StatsCalculator::compute_all_parallel(&tables, &config, ReportSelection::Genres);
        assert!(genres_only.genres.is_some());
        assert!(genres_only.contributors.is_none());
        assert!(genres_only.pairs.is_none());
    }
}
