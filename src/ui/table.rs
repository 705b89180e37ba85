use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, Record, SalaryDataset};
use crate::format::usd;

const ROW_HEIGHT: f32 = 18.0;

/// Header labels, in display order. The salary goes last.
fn headers() -> impl Iterator<Item = &'static str> {
    Column::ALL
        .iter()
        .map(|c| c.label())
        .chain(std::iter::once("Salary (USD)"))
}

fn cells(record: &Record) -> [String; 8] {
    [
        record.work_year.to_string(),
        record.seniority.clone(),
        record.contract.clone(),
        record.company_size.clone(),
        record.remote_type.clone(),
        record.job_title.clone(),
        record.residence_iso3.clone(),
        usd(record.salary_usd),
    ]
}

/// Scrollable table of the records passing the filters.
pub fn records_table(ui: &mut Ui, dataset: &SalaryDataset, visible: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(TableColumn::auto().at_least(60.0), Column::ALL.len() + 1)
        .min_scrolled_height(0.0)
        .max_scroll_height(360.0)
        .header(20.0, |mut header| {
            for name in headers() {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                let record = &dataset.records[visible[row.index()]];
                for text in cells(record) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn one_header_per_cell() {
        let r = record(2024, "senior", "Data Engineer", "BRA", 123_456.0);
        let row = cells(&r);
        assert_eq!(headers().count(), row.len());
        assert_eq!(row[0], "2024");
        assert_eq!(row[6], "BRA");
        assert_eq!(row[7], "$123,456");
    }
}
