use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use session_analyzer::data::filter::{filter_options, RowFilter};

use crate::state::AppState;
use crate::ui::panels::unavailable;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw-data table with an equality filter and sortable headers
// ---------------------------------------------------------------------------

pub fn service_table(ui: &mut Ui, state: &mut AppState) {
    let Some(filter_column) = state.filter_column().map(str::to_string) else {
        let reason = state
            .report
            .as_ref()
            .and_then(|r| r.service_filter.as_ref().err())
            .map(|e| e.to_string())
            .unwrap_or_default();
        return unavailable(ui, "Service Table", &reason);
    };
    let Some(dataset) = state.dataset.as_ref() else {
        return;
    };

    // ---- Filter dropdown ----
    let options = filter_options(dataset, &filter_column);
    let mut selected: Option<RowFilter> = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{filter_column}:"));
        egui::ComboBox::from_id_salt("service_filter")
            .selected_text(state.table.filter.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in &options {
                    let is_current = *option == state.table.filter;
                    if ui.selectable_label(is_current, option.label()).clicked() {
                        selected = Some(option.clone());
                    }
                }
            });
        ui.label(format!("{} of {} rows", state.table.view.len(), dataset.len()));
    });
    ui.separator();

    // ---- Table ----
    let columns = dataset.column_names.clone();
    let mut clicked_header: Option<String> = None;

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(80.0).resizable(true), columns.len())
            .header(22.0, |mut header| {
                for name in &columns {
                    header.col(|ui: &mut Ui| {
                        let arrow = match &state.table.sort.column {
                            Some(c) if c == name => {
                                if state.table.sort.ascending {
                                    " ▲"
                                } else {
                                    " ▼"
                                }
                            }
                            _ => "",
                        };
                        let label = RichText::new(format!("{name}{arrow}")).strong();
                        if ui.button(label).clicked() {
                            clicked_header = Some(name.clone());
                        }
                    });
                }
            })
            .body(|body| {
                let view = &state.table.view.indices;
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let source_row = view[row.index()];
                    for col in 0..columns.len() {
                        row.col(|ui: &mut Ui| {
                            ui.label(dataset.cell(source_row, col).to_string());
                        });
                    }
                });
            });
    });

    if let Some(filter) = selected {
        state.set_filter(filter);
    }
    if let Some(column) = clicked_header {
        state.request_sort(&column);
    }
}
