//! Read-only aggregations over the loaded catalog
//!
//! Each analysis is a pure function over the record table; none mutates
//! anything and each returns a result struct the presentation layer (terminal
//! digest, report writers, dashboard API) consumes directly.
//!
//! The menu the dashboard shows maps one-to-one onto [`Analysis`] variants:
//!
//! | Menu entry | Aggregation | Chart |
//! |---|---|---|
//! | Top 10 Most Reviewed | [`rankings::top_reviewed`] | horizontal bar |
//! | Price Distribution | [`pricing::price_histogram`] | histogram |
//! | Top 10 Genres | [`rankings::top_genres`] | vertical bar |
//! | Launch Evolution | [`timeline::launch_evolution`] | line |
//! | Deeper Questions | correlation / ratios / seasonality | scatter + bars |

pub mod pricing;
pub mod rankings;
pub mod timeline;

use std::fmt;

/// One entry in the analysis menu. One handler per variant, no dynamic
/// dispatch anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    TopReviewed,
    PriceDistribution,
    TopGenres,
    LaunchEvolution,
    DeepDive,
}

impl Analysis {
    pub const ALL: [Analysis; 5] = [
        Analysis::TopReviewed,
        Analysis::PriceDistribution,
        Analysis::TopGenres,
        Analysis::LaunchEvolution,
        Analysis::DeepDive,
    ];

    /// Stable key used by the dashboard API.
    pub fn key(self) -> &'static str {
        match self {
            Analysis::TopReviewed => "top-reviewed",
            Analysis::PriceDistribution => "price-distribution",
            Analysis::TopGenres => "top-genres",
            Analysis::LaunchEvolution => "launch-evolution",
            Analysis::DeepDive => "deep-dive",
        }
    }

    /// Human-facing menu label.
    pub fn label(self) -> &'static str {
        match self {
            Analysis::TopReviewed => "Top 10 Most Reviewed",
            Analysis::PriceDistribution => "Price Distribution",
            Analysis::TopGenres => "Top 10 Genres",
            Analysis::LaunchEvolution => "Launch Evolution",
            Analysis::DeepDive => "Deeper Questions",
        }
    }

    pub fn from_key(key: &str) -> Option<Analysis> {
        Analysis::ALL.into_iter().find(|a| a.key() == key)
    }
}

/// Recoverable analysis failure: one sub-view degrades, the rest of the
/// interface stays usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The catalog extract lacks a column this analysis needs.
    MissingColumn(&'static str),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MissingColumn(column) => {
                write!(f, "catalog has no '{}' column", column)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keys_round_trip() {
        for analysis in Analysis::ALL {
            assert_eq!(Analysis::from_key(analysis.key()), Some(analysis));
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(Analysis::from_key("refund-rates"), None);
    }

    #[test]
    fn test_menu_has_five_entries_with_distinct_labels() {
        let labels: std::collections::HashSet<_> =
            Analysis::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
