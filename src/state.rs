use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::dashboard::{build_dashboard, Dashboard, DashboardView};
use crate::data::filter::{init_filter_selection, FilterSelection};
use crate::data::loader::DatasetLoader;
use crate::data::model::{CellValue, Column, SalaryDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loader of the currently shown dataset; kept for File → Reload.
    pub loader: Option<DatasetLoader>,

    /// Shared read-only table (None until a dataset is loaded).
    pub dataset: Option<Arc<SalaryDataset>>,

    /// Per-column filter selections.
    pub filters: FilterSelection,

    /// Job title picked for the country chart.
    pub job_title: Option<String>,

    /// Output of the last recomputation.
    pub dashboard: Option<Dashboard>,

    /// Stable colours for the remote-type chart.
    pub remote_colors: Option<ColorMap>,

    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            loader: None,
            dataset: None,
            filters: FilterSelection::default(),
            job_title: None,
            dashboard: None,
            remote_colors: None,
            config,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset filters and recompute.
    pub fn set_dataset(&mut self, loader: DatasetLoader, dataset: Arc<SalaryDataset>) {
        self.filters = init_filter_selection(&dataset);
        self.job_title = None;
        self.remote_colors = dataset
            .unique_values
            .get(&Column::RemoteType)
            .map(ColorMap::new);

        self.dataset = Some(dataset);
        self.loader = Some(loader);
        self.status_message = None;
        self.recompute();
    }

    /// Load from `loader` and adopt the result; failures keep the current
    /// dataset and surface in the status bar.
    pub fn load_from(&mut self, loader: DatasetLoader) {
        match loader.load() {
            Ok(dataset) => {
                log::info!("showing {} records from {}", dataset.len(), loader.source());
                self.set_dataset(loader, dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", loader.source());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Full recomputation after any filter or job-title change.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.dashboard = None;
            return;
        };

        let mut dashboard = build_dashboard(ds, &self.filters, self.job_title.as_deref(), &self.config);

        // A title that vanished from the options falls back to the first one,
        // the way a select box resets when its current value disappears.
        let stale = match &dashboard.view {
            DashboardView::Ready(panels) => self
                .job_title
                .as_ref()
                .is_some_and(|t| !panels.job_titles.contains(t)),
            DashboardView::NoData => false,
        };
        if stale {
            self.job_title = None;
            dashboard = build_dashboard(ds, &self.filters, None, &self.config);
        }
        self.dashboard = Some(dashboard);
    }

    /// Number of rows passing the current filters.
    pub fn visible_count(&self) -> usize {
        self.dashboard
            .as_ref()
            .map_or(0, |d| d.visible_indices.len())
    }

    pub fn set_job_title(&mut self, title: String) {
        self.job_title = Some(title);
        self.recompute();
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &CellValue) {
        let selected = self.filters.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.recompute();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: Column) {
        if let Some(ds) = &self.dataset {
            if let Some(all_vals) = ds.unique_values.get(&column) {
                self.filters.insert(column, all_vals.clone());
                self.recompute();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: Column) {
        self.filters.insert(column, BTreeSet::new());
        self.recompute();
    }
}
