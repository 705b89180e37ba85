use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;

use salary_dash::config::DashboardConfig;
use salary_dash::data::charts::{salary_histogram, top_job_titles_by_mean, CountryMeans};
use salary_dash::data::dashboard::{build_dashboard, DashboardView};
use salary_dash::data::filter::{filter, init_filter_selection, matches, FilterSelection};
use salary_dash::data::loader::{DatasetLoader, DatasetSource};
use salary_dash::data::metrics::{summarize, Summary};
use salary_dash::data::model::{CellValue, Column, NumericColumn};

const CSV: &str = "\
ano_de_trabalho,senioridade,contrato,tamanho_da_empresa,remoto,cargo,residencia_iso3,usd
2023,senior,integral,media,remoto,A,BRA,100
2023,junior,integral,grande,hibrido,A,USA,200
2024,senior,parcial,media,remoto,B,BRA,300
2024,pleno,integral,pequena,presencial,B,DEU,400
2025,senior,integral,media,remoto,C,USA,500
";

fn loader() -> (tempfile::TempDir, DatasetLoader) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("salaries.csv");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(CSV.as_bytes())
        .unwrap();
    let loader = DatasetLoader::new(DatasetSource::File(path), Duration::from_secs(1));
    (dir, loader)
}

fn only(column: Column, values: &[CellValue]) -> FilterSelection {
    let mut selection = FilterSelection::new();
    selection.insert(column, values.iter().cloned().collect::<BTreeSet<_>>());
    selection
}

#[test]
fn filtering_to_one_title_gives_the_documented_summary() {
    let (_dir, loader) = loader();
    let ds = loader.load().unwrap();

    let table = filter(&ds, &only(Column::JobTitle, &["A".into()]));
    let salaries: Vec<f64> = table.records().map(|r| r.salary_usd).collect();
    assert_eq!(salaries, vec![100.0, 200.0]);

    let Summary::Stats(stats) = summarize(&table, NumericColumn::SalaryUsd) else {
        panic!("expected statistics");
    };
    assert_eq!(stats.mean, 150.0);
    assert_eq!(stats.median, 150.0);
    assert_eq!(stats.max, 200.0);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.most_common_job_title, "A");
}

#[test]
fn every_filtered_row_satisfies_every_constraint() {
    let (_dir, loader) = loader();
    let ds = loader.load().unwrap();

    let mut selection = init_filter_selection(&ds);
    selection.insert(
        Column::Seniority,
        [CellValue::from("senior"), CellValue::from("pleno")].into_iter().collect(),
    );
    selection.insert(Column::Contract, [CellValue::from("integral")].into_iter().collect());

    let table = filter(&ds, &selection);
    assert_eq!(table.indices(), &[0, 3, 4]);
    for r in table.records() {
        assert!(matches(r, &selection));
    }
}

#[test]
fn derived_charts_are_consistent_with_the_table() {
    let (_dir, loader) = loader();
    let ds = loader.load().unwrap();
    let table = filter(&ds, &init_filter_selection(&ds));

    let buckets = salary_histogram(&table, 30);
    assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), table.len());

    let top = top_job_titles_by_mean(&table, 10);
    assert!(top.len() <= 10);
    let order: Vec<&str> = top.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert_eq!(top, top_job_titles_by_mean(&table, 10));
}

#[test]
fn dashboard_handles_empty_and_stale_selections() {
    let (_dir, loader) = loader();
    let ds = loader.load().unwrap();
    let config = DashboardConfig::default();

    let mut selection = init_filter_selection(&ds);
    selection.insert(Column::CompanySize, BTreeSet::new());
    assert_eq!(build_dashboard(&ds, &selection, None, &config).view, DashboardView::NoData);

    let selection = only(Column::WorkYear, &[CellValue::Integer(2023)]);
    let dashboard = build_dashboard(&ds, &selection, Some("C"), &config);
    let DashboardView::Ready(panels) = dashboard.view else {
        panic!("expected data");
    };
    assert_eq!(
        panels.country_means,
        CountryMeans::NoMatch {
            job_title: "C".to_string()
        }
    );
    assert_eq!(panels.summary.count, 2);
    assert_eq!(panels.remote_counts.len(), 2);
}
