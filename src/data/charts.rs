//! Small derived tables shaped for the dashboard's four charts.
//!
//! Every function here is a pure function of the filtered table: calling it
//! twice on the same input yields the same output.

use std::collections::BTreeMap;

use super::filter::FilteredTable;
use super::model::{CellValue, Column};

/// Mean salary of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

/// One equal-width salary bin, `[lower, upper)` except the last which is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bucket {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Rows per distinct value of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Fraction of the table in this category, in `[0, 1]`.
    pub share: f64,
}

/// Per-country salary means for one job title.
#[derive(Debug, Clone, PartialEq)]
pub enum CountryMeans {
    /// The chosen title has no rows in the filtered table.
    NoMatch { job_title: String },
    Means {
        job_title: String,
        countries: Vec<GroupMean>,
    },
}

/// Group salaries by `column` and average them; result ordered by group.
fn group_means(table: &FilteredTable<'_>, column: Column) -> Vec<GroupMean> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in table.records() {
        let entry = groups.entry(r.text(column)).or_insert((0.0, 0));
        entry.0 += r.salary_usd;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// The `n` job titles with the highest mean salary, ascending for display.
pub fn top_job_titles_by_mean(table: &FilteredTable<'_>, n: usize) -> Vec<GroupMean> {
    let mut means = group_means(table, Column::JobTitle);
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.group.cmp(&b.group)));
    means.truncate(n);
    means.sort_by(|a, b| a.mean.total_cmp(&b.mean).then_with(|| a.group.cmp(&b.group)));
    means
}

/// Split the salary range into `bins` equal-width buckets and count rows.
///
/// An empty table yields no buckets; a range of zero width, or `bins == 0`,
/// yields a single bucket holding every row.
pub fn salary_histogram(table: &FilteredTable<'_>, bins: usize) -> Vec<Bucket> {
    let salaries: Vec<f64> = table.records().map(|r| r.salary_usd).collect();
    if salaries.is_empty() {
        return Vec::new();
    }

    let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
    let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min || bins == 0 {
        return vec![Bucket {
            lower: min,
            upper: max,
            count: salaries.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for s in salaries {
        let idx = (((s - min) / width) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }
    buckets
}

/// Rows per remote-work type, most frequent first (ties by value).
pub fn remote_type_counts(table: &FilteredTable<'_>) -> Vec<CategoryCount> {
    category_counts(table, Column::RemoteType)
}

pub fn category_counts(table: &FilteredTable<'_>, column: Column) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for r in table.records() {
        *counts.entry(r.value(column)).or_default() += 1;
    }
    let total = table.len().max(1) as f64;
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    // Stable sort keeps the BTreeMap's value order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Mean salary per residence country for rows holding `job_title`.
pub fn country_means_for_title(table: &FilteredTable<'_>, job_title: &str) -> CountryMeans {
    let subset = table.narrow(Column::JobTitle, &CellValue::from(job_title));
    if subset.is_empty() {
        return CountryMeans::NoMatch {
            job_title: job_title.to_string(),
        };
    }
    CountryMeans::Means {
        job_title: job_title.to_string(),
        countries: group_means(&subset, Column::ResidenceIso3),
    }
}
