//! Price aggregations: the paid-price histogram behind the slider view and
//! the price/review-count correlation.

use crate::catalog::GameRecord;
use serde::Serialize;

/// Default and ceiling for the price-distribution slider.
pub const DEFAULT_MAX_PRICE: u32 = 50;
pub const MAX_PRICE_CEILING: u32 = 100;

/// Fixed bin count for the histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Correlation only considers games priced in (0, 80].
pub const CORRELATION_PRICE_CAP: f64 = 80.0;

/// Clamp a requested slider value into the supported range.
pub fn clamp_max_price(requested: u32) -> u32 {
    requested.min(MAX_PRICE_CEILING)
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceHistogram {
    /// Threshold the histogram was computed for, after clamping.
    pub max_price: u32,
    /// How many paid games fell at or under the threshold.
    pub paid_games: usize,
    pub bins: Vec<PriceBin>,
}

/// Distribution of paid-game prices up to `max_price`.
///
/// Filters to `0 < price <= max_price` and buckets the survivors into
/// [`HISTOGRAM_BINS`] equal-width bins spanning the filtered range. Bin
/// counts always sum to `paid_games`. An empty filter result yields an empty
/// histogram rather than an error; a single distinct price yields one bin.
pub fn price_histogram(records: &[GameRecord], max_price: u32) -> PriceHistogram {
    let max_price = clamp_max_price(max_price);
    let ceiling = f64::from(max_price);

    let prices: Vec<f64> = records
        .iter()
        .map(|r| r.price)
        .filter(|&p| p > 0.0 && p <= ceiling)
        .collect();

    if prices.is_empty() {
        return PriceHistogram {
            max_price,
            paid_games: 0,
            bins: Vec::new(),
        };
    }

    let lowest = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if highest == lowest {
        return PriceHistogram {
            max_price,
            paid_games: prices.len(),
            bins: vec![PriceBin {
                lower: lowest,
                upper: highest,
                count: prices.len(),
            }],
        };
    }

    let width = (highest - lowest) / HISTOGRAM_BINS as f64;
    let mut counts = [0usize; HISTOGRAM_BINS];
    for price in &prices {
        let index = (((price - lowest) / width) as usize).min(HISTOGRAM_BINS - 1);
        counts[index] += 1;
    }

    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| PriceBin {
            lower: lowest + i as f64 * width,
            upper: lowest + (i + 1) as f64 * width,
            count,
        })
        .collect();

    PriceHistogram {
        max_price,
        paid_games: prices.len(),
        bins,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PricePoint {
    pub price: f64,
    pub reviews_total: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceReviewCorrelation {
    /// Pearson coefficient over (price, review count); `None` with fewer
    /// than two points or zero variance in either series.
    pub pearson_r: Option<f64>,
    /// Least-squares fit for the scatter's trend line.
    pub trend: Option<TrendLine>,
    pub points: Vec<PricePoint>,
}

/// Relationship between price and review volume.
///
/// Considers games priced in (0, [`CORRELATION_PRICE_CAP`]] with at least one
/// review. Returns the paired series for the scatter plot (rendered on a
/// logarithmic review axis) alongside the correlation coefficient.
pub fn price_review_correlation(records: &[GameRecord]) -> PriceReviewCorrelation {
    let points: Vec<PricePoint> = records
        .iter()
        .filter(|r| r.price > 0.0 && r.price <= CORRELATION_PRICE_CAP && r.num_reviews_total > 0)
        .map(|r| PricePoint {
            price: r.price,
            reviews_total: r.num_reviews_total,
        })
        .collect();

    let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
    let reviews: Vec<f64> = points.iter().map(|p| p.reviews_total as f64).collect();

    PriceReviewCorrelation {
        pearson_r: pearson(&prices, &reviews),
        trend: least_squares(&prices, &reviews),
        points,
    }
}

/// Pearson correlation coefficient of two equal-length series. `None` when
/// the series are shorter than two or either has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some(covariance / (variance_x * variance_y).sqrt())
}

fn least_squares(xs: &[f64], ys: &[f64]) -> Option<TrendLine> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        covariance += (x - mean_x) * (y - mean_y);
        variance_x += (x - mean_x) * (x - mean_x);
    }

    if variance_x == 0.0 {
        return None;
    }
    let slope = covariance / variance_x;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
