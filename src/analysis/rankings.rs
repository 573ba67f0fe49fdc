//! Ranking aggregations: most-reviewed games, most frequent genres, and
//! best-rated genres by mean positive-review ratio.

use crate::analysis::{mean, AnalysisError};
use crate::catalog::{Catalog, GameRecord};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many entries the ranked views show.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ReviewLeader {
    pub name: String,
    pub reviews_total: u64,
}

/// Most-reviewed games, highest first. The sort is stable, so ties keep
/// their original table order; the result holds at most `n` entries.
pub fn top_reviewed(records: &[GameRecord], n: usize) -> Vec<ReviewLeader> {
    let mut ordered: Vec<&GameRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.num_reviews_total.cmp(&a.num_reviews_total));

    ordered
        .into_iter()
        .take(n)
        .map(|record| ReviewLeader {
            name: record.name.clone(),
            reviews_total: record.num_reviews_total,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Most frequent primary genres, descending. Records with no primary genre
/// (empty genre list) are excluded from the ranking entirely. Equal counts
/// order by label so the result is deterministic.
pub fn top_genres(records: &[GameRecord], n: usize) -> Vec<GenreCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(genre) = record.primary_genre() {
            *counts.entry(genre).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    ranked.truncate(n);
    ranked
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreRatio {
    pub genre: String,
    /// Mean of per-game positive/total ratios across every game carrying
    /// this label.
    pub mean_positive_ratio: f64,
    /// How many games contributed to the mean.
    pub sampled_games: usize,
}

/// Genres ranked by mean positive-review ratio, best first.
///
/// Every genre label of a record counts independently: a game tagged
/// {A, B} contributes its ratio to both A's and B's averages. Rows without
/// reviews, or without a positive count, are skipped. When the extract has
/// no positive-review column at all the whole analysis reports
/// [`AnalysisError::MissingColumn`] so the caller can degrade just this
/// view.
pub fn genre_positive_ratios(
    catalog: &Catalog,
    n: usize,
) -> Result<Vec<GenreRatio>, AnalysisError> {
    if !catalog.has_positive_reviews {
        return Err(AnalysisError::MissingColumn("num_reviews_positive"));
    }

    let mut ratios_by_genre: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in &catalog.records {
        if record.num_reviews_total == 0 {
            continue;
        }
        let Some(positive) = record.num_reviews_positive else {
            continue;
        };
        let ratio = positive as f64 / record.num_reviews_total as f64;

        for genre in &record.genres {
            ratios_by_genre.entry(genre.as_str()).or_default().push(ratio);
        }
    }

    let mut ranked: Vec<GenreRatio> = ratios_by_genre
        .into_iter()
        .filter_map(|(genre, ratios)| {
            mean(&ratios).map(|mean_ratio| GenreRatio {
                genre: genre.to_string(),
                mean_positive_ratio: mean_ratio,
                sampled_games: ratios.len(),
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.mean_positive_ratio
            .partial_cmp(&a.mean_positive_ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.genre.cmp(&b.genre))
    });
    ranked.truncate(n);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_release_date, semester_label};
    use chrono::Datelike;
    use std::path::PathBuf;

    fn game(
        name: &str,
        date: Option<&str>,
        price: f64,
        reviews: u64,
        positive: Option<u64>,
        genres: &[&str],
    ) -> GameRecord {
        let release_date = date.and_then(parse_release_date);
        let (year, month, semester) = match release_date {
            Some(d) => (
                Some(d.year()),
                Some(d.month()),
                Some(semester_label(d.year(), d.month())),
            ),
            None => (None, None, None),
        };
        GameRecord {
            name: name.to_string(),
            release_date,
            price,
            num_reviews_total: reviews,
            num_reviews_positive: positive,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            year,
            month,
            semester,
        }
    }

    fn catalog_of(records: Vec<GameRecord>, has_positive: bool) -> Catalog {
        Catalog {
            records,
            source: PathBuf::from("test.csv"),
            has_positive_reviews: has_positive,
        }
    }

    // ==========================================================================
    // TOP REVIEWED TESTS
    // ==========================================================================

    #[test]
    fn test_top_reviewed_orders_descending() {
        let records = vec![
            game("G1", None, 10.0, 500, None, &[]),
            game("G2", None, 0.0, 300, None, &[]),
            game("G3", None, 20.0, 900, None, &[]),
        ];
        let top = top_reviewed(&records, 10);
        let names: Vec<&str> = top.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["G3", "G1", "G2"]);
    }

    #[test]
    fn test_top_reviewed_ties_keep_table_order() {
        let records = vec![
            game("First", None, 0.0, 100, None, &[]),
            game("Second", None, 0.0, 100, None, &[]),
            game("Third", None, 0.0, 100, None, &[]),
        ];
        let top = top_reviewed(&records, 10);
        let names: Vec<&str> = top.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_top_reviewed_length_is_min_of_n_and_total() {
        let records = vec![
            game("A", None, 0.0, 1, None, &[]),
            game("B", None, 0.0, 2, None, &[]),
        ];
        assert_eq!(top_reviewed(&records, 10).len(), 2);
        assert_eq!(top_reviewed(&records, 1).len(), 1);
        assert!(top_reviewed(&[], 10).is_empty());
    }

    // ==========================================================================
    // TOP GENRES TESTS
    // ==========================================================================

    #[test]
    fn test_top_genres_counts_primary_only() {
        let records = vec![
            game("A", None, 0.0, 0, None, &["RPG", "Action"]),
            game("B", None, 0.0, 0, None, &["RPG"]),
            game("C", None, 0.0, 0, None, &["Action", "RPG"]),
        ];
        let top = top_genres(&records, 10);
        assert_eq!(top[0].genre, "RPG");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].genre, "Action");
        assert_eq!(top[1].count, 1);
    }

    #[test]
    fn test_top_genres_excludes_empty_primary() {
        let records = vec![
            game("A", None, 0.0, 0, None, &["RPG"]),
            game("B", None, 0.0, 0, None, &[]),
            game("C", None, 0.0, 0, None, &[]),
        ];
        let top = top_genres(&records, 10);
        assert_eq!(top.len(), 1);
        let counted: usize = top.iter().map(|g| g.count).sum();
        assert_eq!(counted, 1);
    }

    #[test]
    fn test_top_genres_truncates_to_n() {
        let records: Vec<GameRecord> = (0..15)
            .map(|i| {
                let label = format!("Genre{:02}", i);
                game("G", None, 0.0, 0, None, &[label.as_str()])
            })
            .collect();
        assert_eq!(top_genres(&records, 10).len(), 10);
    }

    // ==========================================================================
    // GENRE POSITIVE RATIO TESTS
    // ==========================================================================

    #[test]
    fn test_ratio_explodes_across_all_genres() {
        // {A, B} with 50/100 contributes 0.5 to both A and B independently
        let catalog = catalog_of(
            vec![game("G", None, 0.0, 100, Some(50), &["A", "B"])],
            true,
        );
        let ranked = genre_positive_ratios(&catalog, 10).unwrap();
        assert_eq!(ranked.len(), 2);
        for entry in &ranked {
            assert!((entry.mean_positive_ratio - 0.5).abs() < 1e-9);
            assert_eq!(entry.sampled_games, 1);
        }
    }

    #[test]
    fn test_ratio_averages_per_genre() {
        let catalog = catalog_of(
            vec![
                game("G1", None, 0.0, 100, Some(100), &["A"]),
                game("G2", None, 0.0, 100, Some(50), &["A"]),
                game("G3", None, 0.0, 100, Some(25), &["B"]),
            ],
            true,
        );
        let ranked = genre_positive_ratios(&catalog, 10).unwrap();
        assert_eq!(ranked[0].genre, "A");
        assert!((ranked[0].mean_positive_ratio - 0.75).abs() < 1e-9);
        assert_eq!(ranked[1].genre, "B");
        assert!((ranked[1].mean_positive_ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_skips_unreviewed_rows() {
        let catalog = catalog_of(
            vec![
                game("G1", None, 0.0, 0, Some(0), &["A"]),
                game("G2", None, 0.0, 10, None, &["A"]),
            ],
            true,
        );
        assert!(genre_positive_ratios(&catalog, 10).unwrap().is_empty());
    }

    #[test]
    fn test_ratio_missing_column_is_recoverable_error() {
        let catalog = catalog_of(vec![game("G", None, 0.0, 100, None, &["A"])], false);
        assert!(matches!(
            genre_positive_ratios(&catalog, 10),
            Err(AnalysisError::MissingColumn("num_reviews_positive"))
        ));
    }
}
