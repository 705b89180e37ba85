use std::collections::BTreeMap;

use super::filter::FilteredTable;
use super::model::NumericColumn;

/// Scalar statistics over a non-empty filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub count: usize,
    /// Most frequent job title; ties go to the lexicographically smallest.
    pub most_common_job_title: String,
}

/// Outcome of [`summarize`]. An empty table never reaches the arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    NoData,
    Stats(AggregateSummary),
}

impl Summary {
    #[cfg(test)]
    pub(crate) fn stats(&self) -> Option<&AggregateSummary> {
        match self {
            Summary::NoData => None,
            Summary::Stats(s) => Some(s),
        }
    }
}

/// Compute mean, median, max and count over `value`, plus the modal job title.
pub fn summarize(table: &FilteredTable<'_>, value: NumericColumn) -> Summary {
    if table.is_empty() {
        return Summary::NoData;
    }

    let mut values: Vec<f64> = table.records().map(|r| r.numeric(value)).collect();
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let median = median_in_place(&mut values);

    let mut frequencies: BTreeMap<&str, usize> = BTreeMap::new();
    for r in table.records() {
        *frequencies.entry(r.job_title.as_str()).or_default() += 1;
    }
    // BTreeMap iterates in key order, so the first maximum is the smallest title.
    let most_common_job_title = frequencies
        .iter()
        .fold(None::<(&str, usize)>, |best, (&title, &n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((title, n)),
        })
        .map(|(title, _)| title.to_string())
        .unwrap_or_default();

    Summary::Stats(AggregateSummary {
        mean,
        median,
        max,
        count,
        most_common_job_title,
    })
}

/// Median of a non-empty slice; averages the two middle values for even lengths.
fn median_in_place(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterSelection};
    use crate::data::model::tests::record;
    use crate::data::model::{CellValue, Column, SalaryDataset};

    fn dataset() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record(2023, "senior", "A", "BRA", 100.0),
            record(2023, "junior", "A", "USA", 200.0),
            record(2024, "senior", "B", "BRA", 300.0),
            record(2024, "pleno", "C", "DEU", 400.0),
            record(2025, "senior", "B", "USA", 500.0),
        ])
    }

    #[test]
    fn empty_table_is_no_data() {
        let ds = dataset();
        let mut selection = FilterSelection::new();
        selection.insert(Column::JobTitle, Default::default());
        let table = filter(&ds, &selection);
        assert_eq!(summarize(&table, NumericColumn::SalaryUsd), Summary::NoData);
    }

    #[test]
    fn summary_of_one_title() {
        let ds = dataset();
        let mut selection = FilterSelection::new();
        selection.insert(Column::JobTitle, [CellValue::from("A")].into_iter().collect());
        let table = filter(&ds, &selection);

        let summary = summarize(&table, NumericColumn::SalaryUsd);
        let stats = summary.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 150.0);
        assert_eq!(stats.median, 150.0);
        assert_eq!(stats.max, 200.0);
        assert_eq!(stats.most_common_job_title, "A");
    }

    #[test]
    fn odd_count_median_and_count() {
        let ds = dataset();
        let table = FilteredTable::all(&ds);
        let summary = summarize(&table, NumericColumn::SalaryUsd);
        let stats = summary.stats().unwrap();
        assert_eq!(stats.count, ds.len());
        assert_eq!(stats.median, 300.0);
        assert_eq!(stats.mean, 300.0);
        assert_eq!(stats.max, 500.0);
    }

    #[test]
    fn mode_ties_resolve_to_smallest_title() {
        // A and B both appear twice; source order must not matter.
        let forward = dataset();
        let mut reversed = forward.records.clone();
        reversed.reverse();
        let reversed = SalaryDataset::from_records(reversed);

        for ds in [&forward, &reversed] {
            let summary = summarize(&FilteredTable::all(ds), NumericColumn::SalaryUsd);
            assert_eq!(summary.stats().unwrap().most_common_job_title, "A");
        }
    }

    #[test]
    fn summarizes_other_numeric_columns() {
        let ds = dataset();
        let summary = summarize(&FilteredTable::all(&ds), NumericColumn::WorkYear);
        assert_eq!(summary.stats().unwrap().max, 2025.0);
        assert_eq!(summary.stats().unwrap().median, 2024.0);
    }
}
