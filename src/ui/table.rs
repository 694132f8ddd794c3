use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use sleepscope::view::TableArtifact;

// ---------------------------------------------------------------------------
// Data table (central panel, Table tab)
// ---------------------------------------------------------------------------

/// Render every column of the filtered rows.
pub fn data_table(ui: &mut Ui, table: &TableArtifact) {
    if table.records.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(20.0, |mut header| {
                for name in &table.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.records.len(), |mut row| {
                    let record = &table.records[row.index()];
                    for (_, value) in &record.fields {
                        row.col(|ui| {
                            ui.label(value.to_string());
                        });
                    }
                });
            });
    });
}
