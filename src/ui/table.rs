use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Dataset;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable table of the filtered rows, every column in source order.
pub fn filtered_table(ui: &mut Ui, filtered: &Dataset) {
    let headers = filtered.column_headers();
    let extra = filtered.extra_columns();
    let records = filtered.records();

    ui.label(format!("Filtered Data Table ({} rows)", records.len()));
    ui.push_id("filtered_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), headers.len())
            .max_scroll_height(360.0)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for name in &headers {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let cells = records[row.index()].display_cells(extra);
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}
