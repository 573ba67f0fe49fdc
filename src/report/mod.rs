//! Report generation for catalog digests
//!
//! This module provides output formatters for a full analysis pass over the
//! catalog in multiple formats:
//!
//! - **HTML**: self-contained report with D3.js charts for every analysis
//! - **JSON**: machine-readable digest for programmatic consumption
//! - **CSV**: one row per game with its derived fields, spreadsheet-ready
//!
//! # Usage
//!
//! ```ignore
//! use vitrine::report;
//!
//! // Automatically picks format based on extension
//! report::generate("digest.html", &catalog, 50)?;  // HTML
//! report::generate("digest.json", &catalog, 50)?;  // JSON
//! report::generate("digest.csv", &catalog, 50)?;   // CSV
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::analysis::pricing::{
    price_histogram, price_review_correlation, PriceHistogram, PriceReviewCorrelation,
};
use crate::analysis::rankings::{self, GenreCount, GenreRatio, ReviewLeader, TOP_N};
use crate::analysis::timeline::{self, MonthCount, SemesterCount, PARTIAL_YEAR_NOTE};
use crate::catalog::{Catalog, GameRecord};
use serde::Serialize;
use std::io;
use std::path::Path;

/// Generate a report in the appropriate format based on file extension.
pub fn generate<P: AsRef<Path>>(path: P, catalog: &Catalog, max_price: u32) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => html::write(&mut file, &Digest::from_catalog(catalog, max_price)),
        "json" => json::write(&mut file, &Digest::from_catalog(catalog, max_price)),
        _ => csv::write(&mut file, catalog),
    }
}

/// Headline counts for a catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub free: usize,
    pub paid: usize,
    pub dated: usize,
    pub undated: usize,
}

impl CatalogSummary {
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut summary = Self::default();
        summary.total = records.len();

        for record in records {
            if record.price > 0.0 {
                summary.paid += 1;
            } else {
                summary.free += 1;
            }
            if record.release_date.is_some() {
                summary.dated += 1;
            } else {
                summary.undated += 1;
            }
        }

        summary
    }
}

/// Every analysis computed once over the catalog - the batch equivalent of a
/// full pass through the dashboard menu.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub generated: String,
    pub source: String,
    pub summary: CatalogSummary,
    pub top_reviewed: Vec<ReviewLeader>,
    pub price_histogram: PriceHistogram,
    pub top_genres: Vec<GenreCount>,
    pub launch_evolution: Vec<SemesterCount>,
    pub launch_note: &'static str,
    pub correlation: PriceReviewCorrelation,
    /// Absent when the extract lacks the positive-review column; the error
    /// text then explains the gap in that one section.
    pub genre_ratios: Option<Vec<GenreRatio>>,
    pub genre_ratios_error: Option<String>,
    pub seasonality: Vec<MonthCount>,
}

impl Digest {
    pub fn from_catalog(catalog: &Catalog, max_price: u32) -> Self {
        let records = &catalog.records;
        let (genre_ratios, genre_ratios_error) =
            match rankings::genre_positive_ratios(catalog, TOP_N) {
                Ok(ranked) => (Some(ranked), None),
                Err(e) => (None, Some(e.to_string())),
            };

        Self {
            generated: chrono::Local::now().to_rfc3339(),
            source: catalog.source.display().to_string(),
            summary: CatalogSummary::from_records(records),
            top_reviewed: rankings::top_reviewed(records, TOP_N),
            price_histogram: price_histogram(records, max_price),
            top_genres: rankings::top_genres(records, TOP_N),
            launch_evolution: timeline::launch_evolution(records),
            launch_note: PARTIAL_YEAR_NOTE,
            correlation: price_review_correlation(records),
            genre_ratios,
            genre_ratios_error,
            seasonality: timeline::monthly_seasonality(records),
        }
    }
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

    fn three_row_catalog() -> Catalog {
        Catalog {
            records: vec![
                game("G1", Some("2022-03-01"), 10.0, 500, Some(400), &["RPG"]),
                game(
                    "G2",
                    Some("2023-08-01"),
                    0.0,
                    300,
                    Some(150),
                    &["Action", "RPG"],
                ),
                game("G3", Some("2025-01-01"), 20.0, 900, None, &[]),
            ],
            source: PathBuf::from("test.csv"),
            has_positive_reviews: true,
        }
    }

    // ==========================================================================
    // CATALOG SUMMARY TESTS
    // ==========================================================================
    //
    // The summary counts sit at the top of every report and the dashboard
    // header.
    // ==========================================================================

    #[test]
    fn test_summary_empty() {
        let summary = CatalogSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.free, 0);
        assert_eq!(summary.paid, 0);
    }

    #[test]
    fn test_summary_counts() {
        let summary = CatalogSummary::from_records(&three_row_catalog().records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.paid, 2);
        assert_eq!(summary.free, 1);
        assert_eq!(summary.dated, 3);
        assert_eq!(summary.undated, 0);
    }

    // ==========================================================================
    // END-TO-END DIGEST TESTS
    // ==========================================================================
    //
    // One full pass over a tiny catalog, checking each analysis agrees with
    // the others about what the table contains.
    // ==========================================================================

    #[test]
    fn test_digest_top_reviewed_order() {
        let digest = Digest::from_catalog(&three_row_catalog(), 50);
        let names: Vec<&str> = digest
            .top_reviewed
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(names, vec!["G3", "G1", "G2"]);
    }

    #[test]
    fn test_digest_semester_series() {
        let digest = Digest::from_catalog(&three_row_catalog(), 50);
        let series: Vec<(&str, usize)> = digest
            .launch_evolution
            .iter()
            .map(|s| (s.semester.as_str(), s.count))
            .collect();
        assert_eq!(series, vec![("2022 S1", 1), ("2023 S2", 1), ("2025 S1", 1)]);
    }

    #[test]
    fn test_digest_top_genres_excludes_empty_primary() {
        // G3 has no genres, so only RPG (G1) and Action (G2) count
        let digest = Digest::from_catalog(&three_row_catalog(), 50);
        let genres: Vec<(&str, usize)> = digest
            .top_genres
            .iter()
            .map(|g| (g.genre.as_str(), g.count))
            .collect();
        assert_eq!(genres, vec![("Action", 1), ("RPG", 1)]);
    }

    #[test]
    fn test_digest_reports_missing_positive_column() {
        let mut catalog = three_row_catalog();
        catalog.has_positive_reviews = false;
        let digest = Digest::from_catalog(&catalog, 50);
        assert!(digest.genre_ratios.is_none());
        assert!(digest
            .genre_ratios_error
            .as_deref()
            .unwrap()
            .contains("num_reviews_positive"));
    }

    #[test]
    fn test_digest_serializes() {
        let digest = Digest::from_catalog(&three_row_catalog(), 50);
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains("\"top_reviewed\""));
        assert!(json.contains("\"seasonality\""));
    }
}
