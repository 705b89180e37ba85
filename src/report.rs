use std::fmt;

use crate::data::charts::CountryMeans;
use crate::data::dashboard::{Dashboard, DashboardView};
use crate::format::{thousands, usd};

/// Plain-text rendition of a dashboard for `--summary`.
pub fn render(dashboard: &Dashboard) -> String {
    Report(dashboard).to_string()
}

struct Report<'a>(&'a Dashboard);

impl fmt::Display for Report<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(out, self.0)
    }
}

fn write_report(out: &mut fmt::Formatter<'_>, dashboard: &Dashboard) -> fmt::Result {
    let panels = match &dashboard.view {
        DashboardView::NoData => {
            writeln!(out, "No data found for the selected filters.")?;
            return Ok(());
        }
        DashboardView::Ready(panels) => panels,
    };

    let s = &panels.summary;
    writeln!(out, "General metrics (annual salary in USD)")?;
    writeln!(out, "  Mean salary          {}", usd(s.mean))?;
    writeln!(out, "  Median salary        {}", usd(s.median))?;
    writeln!(out, "  Maximum salary       {}", usd(s.max))?;
    writeln!(out, "  Records              {}", thousands(s.count as u64))?;
    writeln!(out, "  Most frequent title  {}", s.most_common_job_title)?;

    writeln!(out, "\nTop {} job titles by mean salary", panels.top_job_titles.len())?;
    for g in panels.top_job_titles.iter().rev() {
        writeln!(out, "  {:<40} {:>12}", g.group, usd(g.mean))?;
    }

    writeln!(out, "\nSalary distribution")?;
    for b in &panels.histogram {
        writeln!(out, "  {:>12} – {:<12} {:>6}", usd(b.lower), usd(b.upper), b.count)?;
    }

    writeln!(out, "\nRemote work")?;
    for c in &panels.remote_counts {
        writeln!(out, "  {:<20} {:>6} ({:.1}%)", c.value, c.count, c.share * 100.0)?;
    }

    match &panels.country_means {
        CountryMeans::NoMatch { job_title } => {
            writeln!(out, "\nJob title '{job_title}' not found for the selected filters.")?;
        }
        CountryMeans::Means { job_title, countries } => {
            writeln!(out, "\nMean salary of {job_title} by country")?;
            for c in countries {
                writeln!(out, "  {:<6} {:>12}", c.group, usd(c.mean))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::dashboard::build_dashboard;
    use crate::data::filter::{init_filter_selection, FilterSelection};
    use crate::data::model::tests::record;
    use crate::data::model::{Column, SalaryDataset};

    fn dataset() -> SalaryDataset {
        SalaryDataset::from_records(vec![
            record(2023, "senior", "Data Engineer", "BRA", 100_000.0),
            record(2024, "junior", "Data Engineer", "USA", 200_000.0),
        ])
    }

    #[test]
    fn renders_metrics() {
        let ds = dataset();
        let dashboard = build_dashboard(&ds, &init_filter_selection(&ds), None, &DashboardConfig::default());
        let text = render(&dashboard);
        assert!(text.contains("Mean salary          $150,000"));
        assert!(text.contains("Maximum salary       $200,000"));
        assert!(text.contains("Most frequent title  Data Engineer"));
        assert!(text.contains("Mean salary of Data Engineer by country"));
        assert!(text.contains("remoto"));
    }

    #[test]
    fn renders_every_section_in_order() {
        let ds = dataset();
        let config = DashboardConfig {
            top_n: 10,
            histogram_bins: 2,
        };
        let dashboard = build_dashboard(&ds, &init_filter_selection(&ds), None, &config);
        let text = render(&dashboard);

        let headings = [
            "General metrics",
            "Top 1 job titles",
            "Salary distribution",
            "Remote work",
            "Mean salary of Data Engineer by country",
        ];
        let positions: Vec<usize> = headings.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("  BRA        $100,000\n"));
        assert!(text.ends_with("  USA        $200,000\n"));
    }

    #[test]
    fn renders_no_data_warning() {
        let ds = dataset();
        let mut selection = FilterSelection::new();
        selection.insert(Column::Seniority, Default::default());
        let dashboard = build_dashboard(&ds, &selection, None, &DashboardConfig::default());
        assert_eq!(render(&dashboard), "No data found for the selected filters.\n");
    }
}
