use std::collections::BTreeSet;

use super::charts::{
    country_means_for_title, remote_type_counts, salary_histogram, top_job_titles_by_mean,
    Bucket, CategoryCount, CountryMeans, GroupMean,
};
use super::filter::{filter, FilterSelection};
use super::metrics::{summarize, AggregateSummary, Summary};
use super::model::{NumericColumn, SalaryDataset};
use crate::config::DashboardConfig;

/// Everything the main panel shows when at least one row passes the filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Panels {
    pub summary: AggregateSummary,
    pub top_job_titles: Vec<GroupMean>,
    pub histogram: Vec<Bucket>,
    pub remote_counts: Vec<CategoryCount>,
    /// Sorted job titles present in the filtered table (country chart options).
    pub job_titles: Vec<String>,
    pub country_means: CountryMeans,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// The filters exclude every row; nothing else was computed.
    NoData,
    Ready(Box<Panels>),
}

/// Result of one recomputation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Rows of the dataset passing the filters, for the table view.
    pub visible_indices: Vec<usize>,
    pub view: DashboardView,
}

/// Run filter → summarize → chart derivations.
///
/// `job_title` picks the country chart; `None` falls back to the first title
/// present in the filtered table.
pub fn build_dashboard(
    dataset: &SalaryDataset,
    selection: &FilterSelection,
    job_title: Option<&str>,
    config: &DashboardConfig,
) -> Dashboard {
    let table = filter(dataset, selection);

    let summary = match summarize(&table, NumericColumn::SalaryUsd) {
        Summary::NoData => {
            log::debug!("filters exclude all {} rows", dataset.len());
            return Dashboard {
                visible_indices: table.into_indices(),
                view: DashboardView::NoData,
            };
        }
        Summary::Stats(stats) => stats,
    };

    let job_titles: Vec<String> = table
        .records()
        .map(|r| r.job_title.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let chosen = job_title
        .or_else(|| job_titles.first().map(String::as_str))
        .unwrap_or_default();
    let country_means = country_means_for_title(&table, chosen);
    if let CountryMeans::NoMatch { job_title } = &country_means {
        log::debug!("job title '{job_title}' not present after filtering");
    }

    let panels = Panels {
        summary,
        top_job_titles: top_job_titles_by_mean(&table, config.top_n),
        histogram: salary_histogram(&table, config.histogram_bins),
        remote_counts: remote_type_counts(&table),
        job_titles,
        country_means,
    };

    Dashboard {
        visible_indices: table.into_indices(),
        view: DashboardView::Ready(Box::new(panels)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::init_filter_selection;
    use crate::data::model::tests::record;
    use crate::data::model::{CellValue, Column};

    fn dataset() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record(2023, "senior", "Data Engineer", "BRA", 100.0),
            record(2023, "junior", "Data Engineer", "USA", 200.0),
            record(2024, "senior", "Analyst", "BRA", 300.0),
        ])
    }

    #[test]
    fn no_data_short_circuits() {
        let ds = dataset();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::Seniority, Default::default());

        let dashboard = build_dashboard(&ds, &selection, None, &DashboardConfig::default());
        assert_eq!(dashboard.view, DashboardView::NoData);
        assert!(dashboard.visible_indices.is_empty());
    }

    #[test]
    fn defaults_to_first_job_title() {
        let ds = dataset();
        let selection = init_filter_selection(&ds);
        let dashboard = build_dashboard(&ds, &selection, None, &DashboardConfig::default());

        let DashboardView::Ready(panels) = dashboard.view else {
            panic!("expected data");
        };
        assert_eq!(panels.job_titles, vec!["Analyst", "Data Engineer"]);
        assert!(matches!(
            &panels.country_means,
            CountryMeans::Means { job_title, .. } if job_title == "Analyst"
        ));
        assert_eq!(panels.summary.count, 3);
        assert_eq!(dashboard.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn stale_job_title_only_affects_country_chart() {
        let ds = dataset();
        let mut selection = init_filter_selection(&ds);
        selection.insert(Column::WorkYear, [CellValue::Integer(2023)].into_iter().collect());

        let dashboard =
            build_dashboard(&ds, &selection, Some("Analyst"), &DashboardConfig::default());
        let DashboardView::Ready(panels) = dashboard.view else {
            panic!("expected data");
        };
        assert!(matches!(panels.country_means, CountryMeans::NoMatch { .. }));
        assert_eq!(panels.top_job_titles.len(), 1);
        assert_eq!(panels.summary.most_common_job_title, "Data Engineer");
        assert_eq!(panels.histogram.iter().map(|b| b.count).sum::<usize>(), 2);
    }
}
