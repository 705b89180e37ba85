use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use salary_dash::app::SalaryDashApp;
use salary_dash::config::Cli;
use salary_dash::data::dashboard::build_dashboard;
use salary_dash::data::loader::DatasetLoader;
use salary_dash::report;
use salary_dash::state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let loader = DatasetLoader::new(cli.source(), cli.timeout());
    let dataset = loader
        .load()
        .with_context(|| format!("loading salary dataset from {}", loader.source()))?;

    if cli.summary {
        let dashboard = build_dashboard(
            &dataset,
            &cli.selection(&dataset),
            cli.job_title.as_deref(),
            &cli.dashboard_config(),
        );
        print!("{}", report::render(&dashboard));
        return Ok(());
    }

    let mut state = AppState::new(cli.dashboard_config());
    state.set_dataset(loader, dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
