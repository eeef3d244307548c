use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – view selector and dataset summary
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Views");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let columns = dataset.column_names.clone();
    let unavailable = state
        .report
        .as_ref()
        .map(|r| r.unavailable_views())
        .unwrap_or(0);

    for tab in Tab::ALL {
        ui.selectable_value(&mut state.active_tab, tab, tab.title());
    }
    if unavailable > 0 {
        ui.label(
            RichText::new(format!("{unavailable} view(s) without data"))
                .small()
                .color(Color32::GRAY),
        );
    }
    ui.separator();

    egui::CollapsingHeader::new(RichText::new(format!("Columns ({})", columns.len())).strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical()
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    for col in &columns {
                        ui.label(col);
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows, {} columns",
                ds.len(),
                ds.column_names.len()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select CSV")
        .add_filter("CSV files", &["csv", "tsv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

/// Placeholder shown in place of a chart that has no data.
pub fn unavailable(ui: &mut Ui, title: &str, reason: &str) {
    ui.heading(title);
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(reason).color(Color32::GRAY).size(14.0));
    });
}
