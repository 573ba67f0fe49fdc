//! Vitrine - Explore a storefront game catalog
//!
//! Vitrine loads a static extract of storefront game listings (2021-2025)
//! and answers a fixed menu of questions about it: which games gathered the
//! most reviews, how paid prices are distributed, which genres dominate, how
//! launch volume evolved, and a set of deeper cuts (price/review
//! correlation, best-rated genres, launch seasonality).
//!
//! # Overview
//!
//! The catalog file is read and parsed exactly once per process; every
//! analysis is a pure aggregation over that in-memory table. The CLI prints
//! a terminal digest and writes CSV/JSON/HTML reports; `vitrine serve`
//! drives the same aggregations behind an interactive browser dashboard,
//! recomputing the selected view on every menu change.
//!
//! # Quick Start
//!
//! ```no_run
//! use vitrine::analysis::rankings::{top_reviewed, TOP_N};
//! use vitrine::Catalog;
//!
//! # fn main() -> Result<(), vitrine::CatalogError> {
//! let catalog = Catalog::load("dataset/games_2021_2025.csv")?;
//!
//! for leader in top_reviewed(&catalog.records, TOP_N) {
//!     println!("{}: {} reviews", leader.name, leader.reviews_total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Menu
//!
//! | View | Aggregation |
//! |------|-------------|
//! | Top 10 Most Reviewed | review-count ranking |
//! | Price Distribution | paid-price histogram under a slider threshold |
//! | Top 10 Genres | primary-genre frequency |
//! | Launch Evolution | launches per semester |
//! | Deeper Questions | correlation, genre ratings, seasonality |
//!
//! # Modules
//!
//! - [`catalog`]: CSV loading, date coercion, derived calendar fields
//! - [`genres`]: genre list normalization
//! - [`analysis`]: the aggregations behind each menu entry
//! - [`report`]: CSV/JSON/HTML digest writers
//! - [`serve`]: the interactive dashboard server

pub mod analysis;
pub mod catalog;
pub mod genres;
pub mod report;
pub mod serve;

pub use analysis::{Analysis, AnalysisError};
pub use catalog::{Catalog, CatalogError, GameRecord};
