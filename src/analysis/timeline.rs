//! Time-bucketed launch aggregations: the semester series and monthly
//! seasonality.

use crate::catalog::GameRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Final catalog year; its extract is incomplete. The semester series
/// annotates it and seasonality excludes it outright.
pub const PARTIAL_YEAR: i32 = 2025;

/// Footnote the presentation layer shows under the semester chart.
pub const PARTIAL_YEAR_NOTE: &str = "2025 launch counts are partial.";

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize)]
pub struct SemesterCount {
    pub semester: String,
    pub count: usize,
}

/// Launches per semester, ordered by label ascending. The `"<year> S<1|2>"`
/// format makes the lexicographic order chronological. Records with an
/// unknown release date carry no semester and are excluded.
pub fn launch_evolution(records: &[GameRecord]) -> Vec<SemesterCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(semester) = record.semester.as_deref() {
            *counts.entry(semester).or_insert(0) += 1;
        }
    }

    let mut series: Vec<SemesterCount> = counts
        .into_iter()
        .map(|(semester, count)| SemesterCount {
            semester: semester.to_string(),
            count,
        })
        .collect();
    series.sort_by(|a, b| a.semester.cmp(&b.semester));
    series
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCount {
    /// 1-12
    pub month: u32,
    pub label: &'static str,
    pub count: usize,
}

/// Launches per calendar month across the complete years only (year <
/// [`PARTIAL_YEAR`]). Always returns 12 entries in calendar order, zeros
/// included, so the chart keeps a fixed axis.
pub fn monthly_seasonality(records: &[GameRecord]) -> Vec<MonthCount> {
    let mut counts = [0usize; 12];
    for record in records {
        let (Some(year), Some(month)) = (record.year, record.month) else {
            continue;
        };
        if year >= PARTIAL_YEAR {
            continue;
        }
        if (1..=12).contains(&month) {
            counts[(month - 1) as usize] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| MonthCount {
            month: i as u32 + 1,
            label: MONTH_NAMES[i],
            count,
        })
        .collect()
}
