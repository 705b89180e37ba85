use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::data::filter::{init_filter_selection, FilterSelection};
use crate::data::loader::DatasetSource;
use crate::data::model::{CellValue, Column, SalaryDataset};

/// Salary survey published alongside the original dashboard.
pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/UnniecornCatST/teste-para-o-dash/refs/heads/main/treinamento-imersao.csv";

/// Knobs of the chart derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Job titles shown in the top-N chart.
    pub top_n: usize,
    /// Equal-width bins in the salary histogram.
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 30,
        }
    }
}

/// Interactive dashboard of data-career salaries.
#[derive(Debug, Parser)]
#[command(name = "salary-dash", version, about)]
pub struct Cli {
    /// CSV location to fetch over HTTP(S).
    #[arg(long, env = "SALARY_DASH_URL", default_value = DEFAULT_DATASET_URL)]
    pub url: String,

    /// Local .csv, .json or .parquet file; takes precedence over --url.
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Number of job titles in the top-salary chart.
    #[arg(long, default_value = "10")]
    pub top_n: NonZeroUsize,

    /// Number of salary histogram bins.
    #[arg(long, default_value = "30")]
    pub bins: NonZeroUsize,

    /// Print metrics and chart tables to stdout instead of opening a window.
    #[arg(long)]
    pub summary: bool,

    /// Keep only these work years (repeatable).
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i64>,

    /// Keep only these seniority levels (repeatable).
    #[arg(long, value_name = "LEVEL")]
    pub seniority: Vec<String>,

    /// Keep only these contract types (repeatable).
    #[arg(long, value_name = "TYPE")]
    pub contract: Vec<String>,

    /// Keep only these company sizes (repeatable).
    #[arg(long, value_name = "SIZE")]
    pub company_size: Vec<String>,

    /// Job title for the per-country chart; defaults to the first available.
    #[arg(long)]
    pub job_title: Option<String>,
}

impl Cli {
    pub fn source(&self) -> DatasetSource {
        match &self.file {
            Some(path) => DatasetSource::File(path.clone()),
            None => DatasetSource::parse(&self.url),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            top_n: self.top_n.get(),
            histogram_bins: self.bins.get(),
        }
    }

    /// Start from "everything selected" and replace the columns given on the
    /// command line.
    pub fn selection(&self, dataset: &SalaryDataset) -> FilterSelection {
        let mut selection = init_filter_selection(dataset);
        let text = |values: &[String]| -> BTreeSet<CellValue> {
            values.iter().map(|v| CellValue::Text(v.clone())).collect()
        };

        if !self.years.is_empty() {
            let years = self.years.iter().map(|&y| CellValue::Integer(y)).collect();
            selection.insert(Column::WorkYear, years);
        }
        for (column, values) in [
            (Column::Seniority, &self.seniority),
            (Column::Contract, &self.contract),
            (Column::CompanySize, &self.company_size),
        ] {
            if !values.is_empty() {
                selection.insert(column, text(values));
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dashboard::{build_dashboard, DashboardView};
    use crate::data::model::tests::record;

    #[test]
    fn defaults_point_at_the_published_dataset() {
        let cli = Cli::parse_from(["salary-dash"]);
        assert_eq!(cli.source(), DatasetSource::Url(DEFAULT_DATASET_URL.to_string()));
        assert_eq!(cli.dashboard_config(), DashboardConfig::default());
        assert_eq!(cli.timeout(), Duration::from_secs(30));
        assert!(!cli.summary);
    }

    #[test]
    fn zero_bins_or_top_n_are_rejected() {
        assert!(Cli::try_parse_from(["salary-dash", "--bins", "0"]).is_err());
        assert!(Cli::try_parse_from(["salary-dash", "--top-n", "0"]).is_err());

        let cli = Cli::try_parse_from(["salary-dash", "--bins", "1", "--top-n", "1"]).unwrap();
        let ds = SalaryDataset::from_records(vec![
            record(2023, "senior", "A", "BRA", 1.0),
            record(2024, "junior", "B", "USA", 2.0),
        ]);
        let dashboard = build_dashboard(&ds, &cli.selection(&ds), None, &cli.dashboard_config());
        let DashboardView::Ready(panels) = dashboard.view else {
            panic!("expected data");
        };
        assert_eq!(panels.histogram.len(), 1);
        assert_eq!(panels.histogram[0].count, ds.len());
        assert_eq!(panels.top_job_titles.len(), 1);
    }

    #[test]
    fn file_overrides_url() {
        let cli = Cli::parse_from(["salary-dash", "--file", "local.parquet", "--url", "https://x/y.csv"]);
        assert_eq!(cli.source(), DatasetSource::File(PathBuf::from("local.parquet")));
    }

    #[test]
    fn filter_flags_replace_column_defaults() {
        let ds = SalaryDataset::from_records(vec![
            record(2023, "senior", "A", "BRA", 1.0),
            record(2024, "junior", "B", "USA", 2.0),
        ]);
        let cli = Cli::parse_from([
            "salary-dash",
            "--year",
            "2024",
            "--seniority",
            "junior",
            "--seniority",
            "senior",
        ]);
        let selection = cli.selection(&ds);

        assert_eq!(
            selection[&Column::WorkYear],
            [CellValue::Integer(2024)].into_iter().collect::<BTreeSet<_>>()
        );
        assert_eq!(selection[&Column::Seniority].len(), 2);
        assert_eq!(selection[&Column::Contract], ds.unique_values[&Column::Contract]);
    }
}
