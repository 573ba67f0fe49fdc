//! Catalog loading and derived calendar fields
//!
//! Reads the storefront catalog CSV into memory once, parses release dates
//! (coercing unparseable values to unknown rather than failing), normalizes
//! the genres column, and derives the year/month/semester fields every
//! date-keyed analysis groups by.
//!
//! The catalog is immutable after load. [`Catalog::cached`] memoizes the
//! first successful load for the lifetime of the process; there is no
//! invalidation path because the dataset is a static extract.

use crate::genres::parse_genre_list;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{fmt, io};

/// Where the catalog extract lives unless the CLI overrides it.
pub const DEFAULT_CATALOG_PATH: &str = "dataset/games_2021_2025.csv";

/// Errors raised while loading the catalog file.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file does not exist at the given path.
    NotFound(String),
    Io(io::Error),
    /// The file exists but is not structurally valid CSV.
    Csv(csv::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(path) => write!(f, "catalog file not found: {}", path),
            CatalogError::Io(e) => write!(f, "catalog read failed: {}", e),
            CatalogError::Csv(e) => write!(f, "catalog parse failed: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<io::Error> for CatalogError {
    fn from(e: io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Csv(e)
    }
}

/// Raw CSV row as it appears in the extract. Every field is optional so a
/// sparse or partially exported file still loads; cell-level junk is coerced
/// in [`GameRecord::from_raw`], only structural CSV damage is fatal.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    num_reviews_total: Option<String>,
    #[serde(default)]
    num_reviews_positive: Option<String>,
    #[serde(default)]
    genres: Option<String>,
}

/// One catalog entry with its derived calendar fields.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub name: String,
    /// Parsed release date; `None` when the raw value was missing or
    /// unparseable. Never silently defaulted to a real date.
    pub release_date: Option<NaiveDate>,
    /// Listing price. 0 = free.
    pub price: f64,
    pub num_reviews_total: u64,
    /// Positive review count; absent when the column is missing from the
    /// extract.
    pub num_reviews_positive: Option<u64>,
    /// Ordered genre labels; the first is the record's primary genre.
    pub genres: Vec<String>,
    pub year: Option<i32>,
    /// 1-12
    pub month: Option<u32>,
    /// `"<year> S1"` (Jan-Jun) or `"<year> S2"` (Jul-Dec).
    pub semester: Option<String>,
}

impl GameRecord {
    fn from_raw(raw: RawRow) -> Self {
        let release_date = raw.release_date.as_deref().and_then(parse_release_date);

        let (year, month, semester) = match release_date {
            Some(date) => (
                Some(date.year()),
                Some(date.month()),
                Some(semester_label(date.year(), date.month())),
            ),
            None => (None, None, None),
        };

        Self {
            name: raw.name.trim().to_string(),
            release_date,
            price: raw
                .price
                .and_then(|p| p.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
                .max(0.0),
            num_reviews_total: raw
                .num_reviews_total
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or(0),
            num_reviews_positive: raw
                .num_reviews_positive
                .and_then(|n| n.trim().parse().ok()),
            genres: raw
                .genres
                .map(|g| parse_genre_list(&g))
                .unwrap_or_default(),
            year,
            month,
            semester,
        }
    }

    /// First genre label, if the record has any.
    pub fn primary_genre(&self) -> Option<&str> {
        crate::genres::primary_genre(&self.genres)
    }
}

/// Semester bucket for a release month: S1 = Jan-Jun, S2 = Jul-Dec.
pub fn semester_label(year: i32, month: u32) -> String {
    let half = if month <= 6 { 1 } else { 2 };
    format!("{} S{}", year, half)
}

/// Parse a release-date string in the forms the extract actually contains:
/// ISO (`2024-03-15`) and the storefront's long forms (`Mar 15, 2024`,
/// `15 Mar, 2024`). Anything else coerces to unknown.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%b %d, %Y", "%d %b, %Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// The loaded catalog: every record plus where it came from.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub records: Vec<GameRecord>,
    pub source: PathBuf,
    /// Whether the extract carries the positive-review column at all.
    /// Analyses that need it degrade gracefully when it is absent.
    pub has_positive_reviews: bool,
}

static CACHE: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Read and parse the catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let has_positive_reviews = reader
            .headers()?
            .iter()
            .any(|h| h.trim() == "num_reviews_positive");

        let mut records = Vec::new();
        for row in reader.deserialize::<RawRow>() {
            records.push(GameRecord::from_raw(row?));
        }

        Ok(Self {
            records,
            source: path.to_path_buf(),
            has_positive_reviews,
        })
    }

    /// Load-once accessor: the first successful load is memoized for the
    /// rest of the process. Subsequent calls return the cached catalog
    /// without touching the filesystem, regardless of the path argument.
    pub fn cached<P: AsRef<Path>>(path: P) -> Result<&'static Catalog, CatalogError> {
        if let Some(catalog) = CACHE.get() {
            return Ok(catalog);
        }
        let loaded = Catalog::load(path)?;
        Ok(CACHE.get_or_init(|| loaded))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
