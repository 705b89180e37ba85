use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::charts::CountryMeans;
use crate::data::dashboard::{Dashboard, DashboardView};
use crate::data::loader::{DatasetLoader, DatasetSource};
use crate::data::metrics::AggregateSummary;
use crate::data::model::{Column, SalaryDataset};
use crate::format::{thousands, usd};
use crate::state::AppState;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in Column::SIDEBAR {
                let Some(all_values) = dataset.unique_values.get(&col) else {
                    continue;
                };

                // Show count of selected / total in the header
                let n_selected = state.filters.get(&col).map_or(0, |s| s.len());
                let n_total = all_values.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", col.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col.header())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(col);
                            }
                        });

                        for val in all_values {
                            let mut checked = state
                                .filters
                                .get(&col)
                                .is_some_and(|selected| selected.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open local file…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                reload(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                thousands(ds.len() as u64),
                thousands(state.visible_count() as u64)
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – metrics, charts, table
// ---------------------------------------------------------------------------

/// Render the dashboard body.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("💰 Data career salary dashboard");
    ui.label("Explore salaries in the data field over recent years. Use the filters on the left to refine the analysis.");

    let picked = match (&state.dataset, &state.dashboard) {
        (Some(dataset), Some(dashboard)) => {
            dashboard_body(ui, dataset, dashboard, state.remote_colors.as_ref())
        }
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to begin  (File → Open local file…)");
            });
            return;
        }
    };

    if let Some(title) = picked {
        state.set_job_title(title);
    }
}

/// Metrics, charts and table of one dashboard; returns a newly picked job title.
fn dashboard_body(
    ui: &mut Ui,
    dataset: &SalaryDataset,
    dashboard: &Dashboard,
    remote_colors: Option<&ColorMap>,
) -> Option<String> {
    let panels = match &dashboard.view {
        DashboardView::NoData => {
            warning(ui, "No data found for the selected filters.");
            return None;
        }
        DashboardView::Ready(panels) => panels,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_space(8.0);
            ui.strong("General metrics (annual salary in USD)");
            metric_cards(ui, &panels.summary);
            ui.separator();

            ui.strong("Charts");
            ui.columns(2, |cols| {
                super::plot::top_job_titles(&mut cols[0], &panels.top_job_titles);
                super::plot::salary_histogram(&mut cols[1], &panels.histogram);
            });
            ui.add_space(8.0);
            let picked = ui.columns(2, |cols| {
                super::plot::remote_donut(&mut cols[0], &panels.remote_counts, remote_colors);
                let picked = job_title_picker(&mut cols[1], &panels.job_titles, &panels.country_means);
                super::plot::country_means(&mut cols[1], &panels.country_means);
                picked
            });
            ui.separator();

            ui.strong("Detailed data");
            super::table::records_table(ui, dataset, &dashboard.visible_indices);
            picked
        })
        .inner
}

pub fn warning(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(format!("⚠ {text}")).color(Color32::from_rgb(0xE0, 0xA0, 0x00)));
}

fn metric_cards(ui: &mut Ui, summary: &AggregateSummary) {
    let cards = [
        ("Mean salary", usd(summary.mean)),
        ("Median salary", usd(summary.median)),
        ("Maximum salary", usd(summary.max)),
        ("Total records", thousands(summary.count as u64)),
        ("Most frequent title", summary.most_common_job_title.clone()),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.label(RichText::new(label).weak());
            col.label(RichText::new(value).size(22.0).strong());
        }
    });
}

/// Combo box over the job titles present after filtering; returns a new pick.
fn job_title_picker(
    ui: &mut Ui,
    titles: &[String],
    current: &CountryMeans,
) -> Option<String> {
    let current = match current {
        CountryMeans::NoMatch { job_title } | CountryMeans::Means { job_title, .. } => job_title,
    };
    let mut picked = None;
    ui.strong("Salary by country for one job title");
    egui::ComboBox::from_id_salt("job_title")
        .selected_text(current.as_str())
        .width(ui.available_width() * 0.9)
        .show_ui(ui, |ui: &mut Ui| {
            for title in titles {
                if ui.selectable_label(title == current, title.as_str()).clicked() && title != current {
                    picked = Some(title.clone());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file: Option<PathBuf> = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let timeout = state
            .loader
            .as_ref()
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DatasetLoader::timeout);
        let loader = DatasetLoader::new(DatasetSource::File(path), timeout);
        state.load_from(loader);
    }
}

/// Re-read the current source, bypassing the loader's cache.
fn reload(state: &mut AppState) {
    let Some(loader) = &state.loader else {
        return;
    };
    let fresh = DatasetLoader::new(loader.source().clone(), loader.timeout());
    state.load_from(fresh);
}
